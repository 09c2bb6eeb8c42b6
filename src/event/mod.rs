// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for client activity.
//!
//! The [`EventBus`] uses tokio's broadcast channel so that several
//! consumers can follow what the long-poll loop receives.
//!
//! # Examples
//!
//! ```
//! use agatark_lib::event::{ClientEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(ClientEvent::Authenticated);
//! ```

mod client_event;
mod event_bus;

pub use client_event::ClientEvent;
pub use event_bus::EventBus;
