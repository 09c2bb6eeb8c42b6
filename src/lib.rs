// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Agatark Lib - A Rust library to integrate Agatark smart-home controllers.
//!
//! The controller is reached over its local HTTP API. The library logs in
//! with a PBKDF2-derived token, follows the controller's event stream
//! through a long-poll loop, and exposes a small data point to a
//! home-automation host through a data-update coordinator and three
//! entities.
//!
//! # Layers
//!
//! - [`client`]: token derivation, login, long-poll, device listing/control
//! - [`coordinator`]: periodic refresh shared by all entities
//! - [`entity`]: sensor, binary sensor and switch
//! - [`config`]: stored config entries and the setup/options flows
//! - [`integration`]: setup, unload and reload of a config entry
//!
//! # Quick Start
//!
//! ```no_run
//! use agatark_lib::client::AgatarkClient;
//!
//! #[tokio::main]
//! async fn main() -> agatark_lib::Result<()> {
//!     let client = AgatarkClient::new("192.168.1.20", "me@example.com", "secret")?;
//!     let login = client.authenticate().await?;
//!     println!("Logged in to {:?}", login.node_name);
//!
//!     for device in client.devices().await? {
//!         println!("{} ({})", device.name, device.device_type);
//!     }
//!
//!     // Follow events until the controller goes away.
//!     let exit = client.long_poll_events().await?;
//!     println!("Long-poll ended: {exit}");
//!     Ok(())
//! }
//! ```
//!
//! ## Running a Config Entry
//!
//! ```no_run
//! use agatark_lib::config::{ConfigEntry, Credentials};
//! use agatark_lib::integration::Integration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), agatark_lib::integration::SetupError> {
//!     let entry = ConfigEntry::new(Credentials::new("192.168.1.20", "me@example.com", "secret"));
//!     let runtime = Integration::new().setup_entry(&entry).await?;
//!
//!     let switch = &runtime.entities().switches[0];
//!     switch.turn_off().await.ok();
//!     println!("switch on: {}", switch.is_on());
//!
//!     runtime.unload().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod event;
pub mod integration;
pub mod model;

pub use client::{AgatarkApi, AgatarkClient, ClientConfig, PollExit, generate_token};
pub use config::{ConfigEntry, Credentials, EntryOptions};
pub use coordinator::{DataUpdateCoordinator, UpdateError};
pub use error::{CommunicationError, ConfigError, Error, ErrorKind, ParseError, Result};
pub use event::{ClientEvent, EventBus};
pub use integration::{EntryRuntime, Integration, SetupError};
pub use model::{Device, DeviceData, DeviceStatus, DeviceType, LoginResponse};
