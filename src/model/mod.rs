// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data types exchanged with the Agatark controller.
//!
//! - [`DeviceData`]: the `title`/`body` data point surfaced to entities
//! - [`LoginResponse`]: body of a successful `/hello` call
//! - [`EventsResponse`]: body of a `/events` long-poll answer
//! - [`Device`]: an entry of the `/devices` listing

mod data;
mod device;
mod events;
mod login;

pub use data::DeviceData;
pub use device::{Device, DeviceStatus, DeviceType};
pub use events::{DeviceEvent, EventsResponse};
pub use login::{LoginResponse, LoginUser, Site};
