// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client implementation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, watch};

use crate::config::Credentials;
use crate::error::{CommunicationError, Error, ParseError, Result};
use crate::event::{ClientEvent, EventBus};
use crate::model::{Device, DeviceData, LoginResponse};

use super::config::{ClientConfig, endpoint};
use super::{AgatarkApi, generate_token};

/// Login action code expected by `/hello`.
const LOGIN_ACTION: &str = "1lp";

/// Client for a single Agatark controller.
///
/// Cloning is cheap; every clone talks to the same controller with the
/// same credentials and bearer token.
#[derive(Debug, Clone)]
pub struct AgatarkClient {
    pub(super) inner: Arc<Inner>,
}

#[derive(Debug)]
pub(super) struct Inner {
    pub(super) http: Client,
    pub(super) credentials: RwLock<Credentials>,
    pub(super) authorization: RwLock<Option<String>>,
    pub(super) data: RwLock<DeviceData>,
    pub(super) request_timeout: Duration,
    pub(super) poll_timeout: Duration,
    pub(super) closed: watch::Sender<bool>,
    pub(super) events: EventBus,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    a: &'static str,
    email: &'a str,
    token: &'a str,
    remember: &'static str,
}

#[derive(Serialize)]
struct ControlRequest<'a> {
    status: &'a Map<String, Value>,
}

impl AgatarkClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are incomplete or the HTTP client
    /// cannot be created.
    pub fn new(
        host: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        ClientConfig::new(host, email, password).into_client()
    }

    pub(super) fn from_config(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent())
            .build()?;
        let (closed, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                request_timeout: config.request_timeout(),
                poll_timeout: config.poll_timeout(),
                credentials: RwLock::new(config.credentials().clone()),
                authorization: RwLock::new(None),
                data: RwLock::new(DeviceData::default()),
                closed,
                events: EventBus::new(),
            }),
        })
    }

    // =========================================================================
    // Credentials and session
    // =========================================================================

    /// Logs in to the controller and keeps the returned bearer token.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if the controller answers 401 or 403
    /// - [`Error::Communication`] on network failure, timeout or any other
    ///   error status
    /// - [`Error::Parse`] if a successful answer has no `authorization`; a
    ///   previously held token is dropped
    pub async fn authenticate(&self) -> Result<LoginResponse> {
        self.ensure_open()?;
        let credentials = self.credentials();
        let url = endpoint(&credentials.host, "/hello")?;
        let token = generate_token(&credentials.password, &credentials.email);
        let request = LoginRequest {
            a: LOGIN_ACTION,
            email: &credentials.email,
            token: &token,
            remember: "on",
        };

        tracing::debug!(url = %url, email = %credentials.email, "Authenticating with Agatark controller");

        let response = self
            .inner
            .http
            .put(&url)
            .timeout(self.inner.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error communicating with Agatark controller");
                Error::from(e)
            })?;

        tracing::debug!(status = response.status().as_u16(), "Authentication response");

        let body = check_status(response)?.text().await?;
        let login = parse_login(&body).inspect_err(|_| {
            // A successful login without a token replaces the held one.
            self.inner.authorization.write().take();
        })?;

        *self.inner.authorization.write() = Some(login.authorization.clone());
        tracing::info!(
            node = login.node_name.as_deref().unwrap_or("unknown"),
            "Successfully authenticated with Agatark controller"
        );
        self.inner.events.publish(ClientEvent::Authenticated);

        Ok(login)
    }

    /// Replaces host, email and password for subsequent requests.
    ///
    /// A bearer token obtained earlier stays in place; call
    /// [`authenticate`](Self::authenticate) again to refresh it.
    pub fn update_credentials(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
    ) {
        *self.inner.credentials.write() = Credentials::new(host, email, password);
        tracing::info!("Updated API client credentials");
    }

    /// Returns a snapshot of the current credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        self.inner.credentials.read().clone()
    }

    /// Returns the base URL requests currently go to.
    #[must_use]
    pub fn base_url(&self) -> String {
        super::config::base_url(&self.inner.credentials.read().host)
    }

    /// Returns the held bearer token, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.inner.authorization.read().clone()
    }

    /// Returns `true` if a bearer token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.authorization.read().is_some()
    }

    /// Drops the held bearer token.
    pub fn disconnect(&self) {
        self.inner.authorization.write().take();
        tracing::info!("Disconnected from Agatark controller");
    }

    /// Closes the client.
    ///
    /// A running long-poll loop returns [`PollExit::Closed`](super::PollExit::Closed)
    /// and further requests fail with [`Error::Closed`]. Closing twice is a no-op.
    pub fn close(&self) {
        if !self.inner.closed.send_replace(true) {
            tracing::debug!("Agatark client closed");
        }
    }

    /// Returns `true` once [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.inner.closed.borrow()
    }

    /// Subscribes to client events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.events.subscribe()
    }

    /// Returns the long-poll timeout.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.inner.poll_timeout
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Lists the devices attached to the controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] without a bearer token, otherwise
    /// the same errors as [`authenticate`](Self::authenticate).
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let token = self.require_authorization()?;
        let url = endpoint(&self.inner.credentials.read().host, "/devices")?;

        tracing::debug!(url = %url, "Fetching devices");

        let response = self
            .inner
            .http
            .get(&url)
            .timeout(self.inner.request_timeout)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, token)
            .send()
            .await?;

        let body = check_status(response)?.text().await?;
        let devices: Vec<Device> = serde_json::from_str(&body).map_err(ParseError::from)?;

        tracing::debug!(count = devices.len(), "Fetched devices");
        Ok(devices)
    }

    /// Sends new status values to a device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] without a bearer token, otherwise
    /// the same errors as [`authenticate`](Self::authenticate).
    pub async fn control_device(&self, device_id: u64, status: &Map<String, Value>) -> Result<()> {
        let token = self.require_authorization()?;
        let url = endpoint(&self.inner.credentials.read().host, "/devices")?;

        let response = self
            .inner
            .http
            .patch(&url)
            .timeout(self.inner.request_timeout)
            .query(&[("id", device_id)])
            .header(AUTHORIZATION, token)
            .json(&ControlRequest { status })
            .send()
            .await?;

        check_status(response)?;
        tracing::info!(device_id, "Controlled device");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    pub(super) fn require_authorization(&self) -> Result<String> {
        self.ensure_open()?;
        self.authorization().ok_or(Error::NotAuthenticated)
    }

    /// Stores the JSON text of a long-poll payload as the data point's body.
    pub(super) fn store_body(&self, payload: &Value) {
        self.inner.data.write().body = Some(payload.to_string());
    }
}

impl AgatarkApi for AgatarkClient {
    async fn fetch_data(&self) -> Result<DeviceData> {
        self.require_authorization()?;
        Ok(self.inner.data.read().clone())
    }

    async fn set_title(&self, title: &str) -> Result<()> {
        self.ensure_open()?;
        self.inner.data.write().title = title.to_string();
        tracing::debug!(title, "Title updated");
        Ok(())
    }
}

/// Maps 401/403 to an authentication error and any other non-2xx status to
/// a communication error.
pub(super) fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown").to_string();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::error!(status = status.as_u16(), "Authentication failed: invalid credentials");
        return Err(Error::Authentication {
            status: status.as_u16(),
            reason,
        });
    }

    if !status.is_success() {
        return Err(CommunicationError::Status {
            status: status.as_u16(),
            reason,
        }
        .into());
    }

    Ok(response)
}

fn parse_login(body: &str) -> Result<LoginResponse> {
    let value: Value = serde_json::from_str(body).map_err(ParseError::from)?;

    let has_token = value
        .get("authorization")
        .and_then(Value::as_str)
        .is_some_and(|token| !token.is_empty());
    if !has_token {
        tracing::error!("Authorization token missing in response");
        return Err(ParseError::MissingField("authorization".to_string()).into());
    }

    Ok(serde_json::from_value(value).map_err(ParseError::from)?)
}
