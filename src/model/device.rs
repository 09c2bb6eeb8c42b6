// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Devices as listed by the controller's `/devices` endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a device attached to the controller.
///
/// Kinds the library does not know are kept verbatim in [`DeviceType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    /// Temperature / humidity / CO2 sensor.
    ClimateSensor,
    /// Door, window or motion detector.
    SecurityDetector,
    /// Lock or access controller.
    Access,
    /// Blind or curtain motor.
    Blind,
    /// On/off output.
    Output,
    /// PWM output.
    OutputPwm,
    /// Dimmable light.
    Light,
    /// Wall switch.
    Switch,
    /// Digital input.
    Input,
    /// Power supply monitor.
    PowerSupply,
    /// Generic device.
    Generic,
    /// Any other kind reported by the controller.
    Other(String),
}

impl DeviceType {
    /// Returns the wire name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClimateSensor => "climateSensor",
            Self::SecurityDetector => "securityDetector",
            Self::Access => "access",
            Self::Blind => "blind",
            Self::Output => "output",
            Self::OutputPwm => "outputPwm",
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Input => "input",
            Self::PowerSupply => "powerSupply",
            Self::Generic => "generic",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for kinds that accept an output command.
    #[must_use]
    pub fn is_controllable(&self) -> bool {
        matches!(
            self,
            Self::Output | Self::OutputPwm | Self::Light | Self::Blind | Self::Access
        )
    }
}

impl From<String> for DeviceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "climateSensor" => Self::ClimateSensor,
            // The 24h variant behaves like a regular detector.
            "securityDetector" | "securityDetector24" => Self::SecurityDetector,
            "access" => Self::Access,
            "blind" => Self::Blind,
            "output" => Self::Output,
            "outputPwm" => Self::OutputPwm,
            "light" => Self::Light,
            "switch" => Self::Switch,
            "input" => Self::Input,
            "powerSupply" => Self::PowerSupply,
            "generic" => Self::Generic,
            _ => Self::Other(value),
        }
    }
}

impl From<DeviceType> for String {
    fn from(value: DeviceType) -> Self {
        match value {
            DeviceType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status block of a device.
///
/// Only the commonly shared fields are typed; everything else the
/// controller reports is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    /// Whether the device is reachable by the controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
    /// Temperature in degrees Celsius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rh: Option<f64>,
    /// CO2 concentration in ppm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
    /// Door or window open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    /// Detector triggered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Lock engaged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Output energized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<bool>,
    /// Output level (lights, PWM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    /// Blind position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<f64>,
    /// Input state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<bool>,
    /// Remaining, untyped status fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceStatus {
    /// Returns `true` unless the controller explicitly reports the device offline.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.unwrap_or(true)
    }
}

/// A device attached to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Controller-assigned identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Device kind.
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Whether the device is enabled on the controller.
    #[serde(default)]
    pub enabled: bool,
    /// Room the device belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<u64>,
    /// Site the device belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<u64>,
    /// Controller UUID of the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Current status.
    #[serde(default)]
    pub status: DeviceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_device_listing_entry() {
        let json = r#"{
            "id": 42,
            "created": 1700000000,
            "name": "Hall light",
            "type": "light",
            "enabled": true,
            "roomId": 3,
            "siteId": 1,
            "uuid": "abc-123",
            "status": {"online": true, "output": true, "level": 80, "fadeTime": 2}
        }"#;

        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.id, 42);
        assert_eq!(device.device_type, DeviceType::Light);
        assert_eq!(device.room_id, Some(3));
        assert_eq!(device.status.output, Some(true));
        assert_eq!(device.status.level, Some(80.0));
        assert_eq!(device.status.extra.get("fadeTime"), Some(&Value::from(2)));
    }

    #[test]
    fn unknown_type_is_preserved() {
        let ty: DeviceType = serde_json::from_str(r#""huumSauna""#).unwrap();
        assert_eq!(ty, DeviceType::Other("huumSauna".to_string()));
        assert_eq!(serde_json::to_string(&ty).unwrap(), r#""huumSauna""#);
    }

    #[test]
    fn detector_variants_collapse() {
        let ty: DeviceType = serde_json::from_str(r#""securityDetector24""#).unwrap();
        assert_eq!(ty, DeviceType::SecurityDetector);
    }

    #[test]
    fn missing_status_defaults_online() {
        let device: Device =
            serde_json::from_str(r#"{"id": 1, "type": "input"}"#).unwrap();
        assert!(device.status.is_online());
        assert!(!device.device_type.is_controllable());
    }
}
