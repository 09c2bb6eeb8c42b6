// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch platform.

use crate::client::AgatarkApi;
use crate::error::Result;

use super::{EntityBase, ON_TITLE, TURN_ON_TITLE, impl_entity};

/// Switch backed by the data point's title.
///
/// It reads as on while the title is `"foo"`. Turning it on writes `"bar"`
/// and turning it off writes `"foo"`, so the reported state is the inverse
/// of the last command.
#[derive(Debug)]
pub struct AgatarkSwitch<A> {
    base: EntityBase<A>,
}

impl<A: AgatarkApi> AgatarkSwitch<A> {
    pub(super) fn from_base(base: EntityBase<A>) -> Self {
        Self { base }
    }

    /// Returns `true` if the title is `"foo"`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.base.title_is_on()
    }

    /// Writes `"bar"` and refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error if the title cannot be written.
    pub async fn turn_on(&self) -> Result<()> {
        self.write_title(TURN_ON_TITLE).await
    }

    /// Writes `"foo"` and refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error if the title cannot be written.
    pub async fn turn_off(&self) -> Result<()> {
        self.write_title(ON_TITLE).await
    }

    async fn write_title(&self, title: &str) -> Result<()> {
        let coordinator = &self.base.coordinator;
        coordinator.api().set_title(title).await?;
        coordinator.request_refresh().await;
        Ok(())
    }
}

impl_entity!(AgatarkSwitch);
