// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Payloads delivered by the `/events` long-poll endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A batch of status updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    /// Updates in the order the controller produced them.
    pub events: Vec<DeviceEvent>,
}

impl EventsResponse {
    /// Tries to read a raw payload as an event batch.
    ///
    /// Returns `None` when the payload has a different shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    /// Returns `true` if the batch carries no updates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Status update for a single device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Identifier of the device that changed.
    pub id: u64,
    /// Changed status fields.
    #[serde(default)]
    pub status: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_event_batch() {
        let value = json!({"events": [{"id": 5, "status": {"output": true}}]});
        let batch = EventsResponse::from_value(&value).unwrap();
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.events[0].id, 5);
        assert_eq!(batch.events[0].status["output"], json!(true));
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert!(EventsResponse::from_value(&json!({"ok": true})).is_none());
        assert!(EventsResponse::from_value(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn empty_batch() {
        let batch = EventsResponse::from_value(&json!({"events": []})).unwrap();
        assert!(batch.is_empty());
    }
}
