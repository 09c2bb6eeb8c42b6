// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary sensor platform.

use crate::client::AgatarkApi;

use super::{EntityBase, impl_entity};

/// Binary sensor that is on while the title reads `"foo"`.
#[derive(Debug)]
pub struct AgatarkBinarySensor<A> {
    base: EntityBase<A>,
}

impl<A: AgatarkApi> AgatarkBinarySensor<A> {
    pub(super) fn from_base(base: EntityBase<A>) -> Self {
        Self { base }
    }

    /// Returns `true` if the title is `"foo"`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.base.title_is_on()
    }
}

impl_entity!(AgatarkBinarySensor);
