// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client event types.

use serde_json::Value;

use crate::model::EventsResponse;

/// Events emitted by an [`AgatarkClient`](crate::client::AgatarkClient).
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A login succeeded and a bearer token is held.
    Authenticated,

    /// The long-poll endpoint delivered a batch of device updates.
    EventsReceived(EventsResponse),

    /// The long-poll endpoint delivered a payload of another shape.
    RawPayload(Value),

    /// The long-poll loop ended.
    PollStopped {
        /// Why the loop ended.
        reason: String,
    },
}

impl ClientEvent {
    /// Returns `true` for payloads delivered by the long-poll endpoint.
    #[must_use]
    pub fn is_payload(&self) -> bool {
        matches!(self, Self::EventsReceived(_) | Self::RawPayload(_))
    }

    /// Wraps a raw long-poll payload, decoding it as an event batch when
    /// it has that shape.
    #[must_use]
    pub fn from_payload(payload: Value) -> Self {
        match EventsResponse::from_value(&payload) {
            Some(batch) => Self::EventsReceived(batch),
            None => Self::RawPayload(payload),
        }
    }
}
