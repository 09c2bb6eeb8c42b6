// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The data point shared by all entities.

use serde::{Deserialize, Serialize};

/// Title used until something else is set.
pub(crate) const DEFAULT_TITLE: &str = "example";

/// The single data point the integration exposes.
///
/// Sensors read `body`, binary sensors and switches compare `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceData {
    /// Free-form title; switches toggle it between `"foo"` and `"bar"`.
    pub title: String,
    /// JSON text of the latest event payload, if any arrived yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl DeviceData {
    /// Creates a data point with the given title and no body.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
        }
    }
}

impl Default for DeviceData {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_title() {
        let data = DeviceData::default();
        assert_eq!(data.title, "example");
        assert!(data.body.is_none());
    }

    #[test]
    fn body_is_omitted_when_empty() {
        let json = serde_json::to_string(&DeviceData::new("foo")).unwrap();
        assert_eq!(json, r#"{"title":"foo"}"#);
    }
}
