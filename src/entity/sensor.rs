// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor platform.

use crate::client::AgatarkApi;

use super::{EntityBase, impl_entity};

/// Sensor showing the data point's body.
#[derive(Debug)]
pub struct AgatarkSensor<A> {
    base: EntityBase<A>,
}

impl<A: AgatarkApi> AgatarkSensor<A> {
    pub(super) fn from_base(base: EntityBase<A>) -> Self {
        Self { base }
    }

    /// Returns the body, or `None` before the first payload arrived.
    #[must_use]
    pub fn native_value(&self) -> Option<String> {
        self.base.data().and_then(|data| data.body)
    }
}

impl_entity!(AgatarkSensor);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::coordinator::DataUpdateCoordinator;
    use crate::coordinator::tests::FakeApi;
    use crate::entity::{Entities, Platform};

    #[tokio::test]
    async fn value_is_body() {
        let coordinator = Arc::new(DataUpdateCoordinator::new(
            Arc::new(FakeApi::with_title("foo")),
            "test",
        ));
        let entities = Entities::for_platforms(&[Platform::Sensor], &coordinator, Uuid::new_v4());
        assert!(entities.sensors[0].native_value().is_none());

        coordinator.refresh().await.unwrap();
        // The fake API never produces a body.
        assert!(entities.sensors[0].native_value().is_none());
    }
}
