// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entities exposed to the host.
//!
//! Every entity reads the coordinator's latest [`DeviceData`]; none of them
//! talks to the controller for reads. The switch writes through the API and
//! then asks the coordinator for a refresh.
//!
//! | Platform | Entity | Value |
//! |----------|--------|-------|
//! | sensor | [`AgatarkSensor`] | `body` |
//! | binary sensor | [`AgatarkBinarySensor`] | `title == "foo"` |
//! | switch | [`AgatarkSwitch`] | `title == "foo"` |

mod binary_sensor;
mod sensor;
mod switch;

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

pub use binary_sensor::AgatarkBinarySensor;
pub use sensor::AgatarkSensor;
pub use switch::AgatarkSwitch;

use crate::client::AgatarkApi;
use crate::config::ATTRIBUTION;
use crate::coordinator::DataUpdateCoordinator;
use crate::model::DeviceData;

/// Title value that reads as "on".
pub(crate) const ON_TITLE: &str = "foo";
/// Title written when a switch is turned on.
pub(crate) const TURN_ON_TITLE: &str = "bar";

/// Entity platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Value sensor.
    Sensor,
    /// On/off sensor.
    BinarySensor,
    /// Controllable on/off entity.
    Switch,
}

impl Platform {
    /// Returns the host's name for this platform.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::BinarySensor => "binary_sensor",
            Self::Switch => "switch",
        }
    }

    /// Returns the entity descriptions provided on this platform.
    #[must_use]
    pub fn descriptions(&self) -> &'static [EntityDescription] {
        match self {
            Self::Sensor => &SENSOR_DESCRIPTIONS,
            Self::BinarySensor => &BINARY_SENSOR_DESCRIPTIONS,
            Self::Switch => &SWITCH_DESCRIPTIONS,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platforms set up for every config entry.
pub const PLATFORMS: [Platform; 3] = [Platform::Sensor, Platform::BinarySensor, Platform::Switch];

/// Static description of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescription {
    /// Key, unique within the platform.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Icon identifier.
    pub icon: Option<&'static str>,
    /// Device class understood by the host.
    pub device_class: Option<&'static str>,
}

const SENSOR_DESCRIPTIONS: [EntityDescription; 1] = [EntityDescription {
    key: "agatark",
    name: "Integration Sensor",
    icon: Some("mdi:format-quote-close"),
    device_class: None,
}];

const BINARY_SENSOR_DESCRIPTIONS: [EntityDescription; 1] = [EntityDescription {
    key: "agatark",
    name: "Agatark integration Binary Sensor",
    icon: None,
    device_class: Some("connectivity"),
}];

const SWITCH_DESCRIPTIONS: [EntityDescription; 1] = [EntityDescription {
    key: "agatark",
    name: "Integration Switch",
    icon: Some("mdi:format-quote-close"),
    device_class: None,
}];

/// State shared by all entity kinds.
#[derive(Debug)]
pub(crate) struct EntityBase<A> {
    coordinator: Arc<DataUpdateCoordinator<A>>,
    description: EntityDescription,
    unique_id: String,
}

impl<A: AgatarkApi> EntityBase<A> {
    fn new(
        coordinator: Arc<DataUpdateCoordinator<A>>,
        entry_id: Uuid,
        platform: Platform,
        description: EntityDescription,
    ) -> Self {
        Self {
            coordinator,
            unique_id: format!("{entry_id}_{}_{}", platform.as_str(), description.key),
            description,
        }
    }

    fn data(&self) -> Option<DeviceData> {
        self.coordinator.data()
    }

    fn title_is_on(&self) -> bool {
        self.data().is_some_and(|data| data.title == ON_TITLE)
    }
}

/// Behaviour common to all entities.
pub trait Entity {
    /// Returns the static description.
    fn description(&self) -> &EntityDescription;

    /// Returns an identifier stable across restarts.
    fn unique_id(&self) -> &str;

    /// Returns `true` while the coordinator's last refresh succeeded.
    fn available(&self) -> bool;

    /// Returns the display name.
    fn name(&self) -> &'static str {
        self.description().name
    }

    /// Returns the attribution shown with the entity's state.
    fn attribution(&self) -> &'static str {
        ATTRIBUTION
    }
}

macro_rules! impl_entity {
    ($ty:ident) => {
        impl<A: AgatarkApi> $crate::entity::Entity for $ty<A> {
            fn description(&self) -> &$crate::entity::EntityDescription {
                &self.base.description
            }

            fn unique_id(&self) -> &str {
                &self.base.unique_id
            }

            fn available(&self) -> bool {
                self.base.coordinator.last_update_success()
            }
        }
    };
}
pub(crate) use impl_entity;

/// All entities of one config entry.
#[derive(Debug)]
pub struct Entities<A> {
    /// Sensor platform entities.
    pub sensors: Vec<AgatarkSensor<A>>,
    /// Binary sensor platform entities.
    pub binary_sensors: Vec<AgatarkBinarySensor<A>>,
    /// Switch platform entities.
    pub switches: Vec<AgatarkSwitch<A>>,
}

impl<A: AgatarkApi> Entities<A> {
    /// Creates the entities of the given platforms.
    #[must_use]
    pub fn for_platforms(
        platforms: &[Platform],
        coordinator: &Arc<DataUpdateCoordinator<A>>,
        entry_id: Uuid,
    ) -> Self {
        let mut entities = Self {
            sensors: Vec::new(),
            binary_sensors: Vec::new(),
            switches: Vec::new(),
        };

        for platform in platforms {
            for description in platform.descriptions() {
                let base = EntityBase::new(
                    Arc::clone(coordinator),
                    entry_id,
                    *platform,
                    *description,
                );
                match platform {
                    Platform::Sensor => entities.sensors.push(AgatarkSensor::from_base(base)),
                    Platform::BinarySensor => entities
                        .binary_sensors
                        .push(AgatarkBinarySensor::from_base(base)),
                    Platform::Switch => entities.switches.push(AgatarkSwitch::from_base(base)),
                }
            }
            tracing::debug!(platform = %platform, "Set up platform");
        }

        entities
    }

    /// Returns the total number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensors.len() + self.binary_sensors.len() + self.switches.len()
    }

    /// Returns `true` if no entity was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::tests::FakeApi;

    #[test]
    fn every_platform_has_one_description() {
        for platform in PLATFORMS {
            assert_eq!(platform.descriptions().len(), 1);
            assert_eq!(platform.descriptions()[0].key, "agatark");
        }
        assert_eq!(
            Platform::BinarySensor.descriptions()[0].device_class,
            Some("connectivity")
        );
    }

    #[tokio::test]
    async fn entities_for_all_platforms() {
        let coordinator = Arc::new(DataUpdateCoordinator::new(
            Arc::new(FakeApi::with_title("foo")),
            "test",
        ));
        let entry_id = Uuid::new_v4();
        let entities = Entities::for_platforms(&PLATFORMS, &coordinator, entry_id);

        assert_eq!(entities.len(), 3);
        assert_eq!(
            entities.sensors[0].unique_id(),
            format!("{entry_id}_sensor_agatark")
        );
        assert_ne!(
            entities.switches[0].unique_id(),
            entities.binary_sensors[0].unique_id()
        );
    }

    #[tokio::test]
    async fn availability_follows_coordinator() {
        let api = Arc::new(FakeApi::with_title("foo"));
        let coordinator = Arc::new(DataUpdateCoordinator::new(Arc::clone(&api), "test"));
        let entities = Entities::for_platforms(&[Platform::Sensor], &coordinator, Uuid::new_v4());

        assert!(!entities.sensors[0].available());
        coordinator.refresh().await.unwrap();
        assert!(entities.sensors[0].available());
        assert_eq!(entities.sensors[0].name(), "Integration Sensor");
        assert_eq!(entities.sensors[0].attribution(), ATTRIBUTION);
    }
}
