// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for Agatark controllers.
//!
//! The controller speaks a small JSON API:
//!
//! - `PUT /hello` logs in with a PBKDF2 token and returns a bearer credential
//! - `GET /events` is held open until something happens (long-poll)
//! - `GET /devices` and `PATCH /devices?id=<id>` list and control devices
//!
//! [`AgatarkClient`] wraps all of it. Clones share the same credentials,
//! token and event bus, so one clone can run
//! [`long_poll_events`](AgatarkClient::long_poll_events) in a background task
//! while another serves the coordinator.
//!
//! # Examples
//!
//! ```no_run
//! use agatark_lib::client::ClientConfig;
//!
//! # async fn example() -> agatark_lib::Result<()> {
//! let client = ClientConfig::new("192.168.1.20", "me@example.com", "secret").into_client()?;
//! client.authenticate().await?;
//!
//! let poller = client.clone();
//! let handle = tokio::spawn(async move { poller.long_poll_events().await });
//!
//! // ...
//! client.close();
//! let _exit = handle.await;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
mod long_poll;
mod token;

use std::future::Future;

pub use config::ClientConfig;
pub use http::AgatarkClient;
pub use long_poll::PollExit;
pub use token::{TOKEN_ITERATIONS, TOKEN_KEY_LEN, generate_token};

use crate::error::Result;
use crate::model::DeviceData;

/// Access to the integration's data point.
///
/// Implemented by [`AgatarkClient`]; the coordinator and entities only
/// depend on this trait.
pub trait AgatarkApi: Send + Sync + 'static {
    /// Returns the current data point.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be obtained.
    fn fetch_data(&self) -> impl Future<Output = Result<DeviceData>> + Send;

    /// Replaces the data point's title.
    ///
    /// # Errors
    ///
    /// Returns an error if the title cannot be set.
    fn set_title(&self, title: &str) -> impl Future<Output = Result<()>> + Send;
}
