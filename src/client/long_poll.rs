// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Long-poll loop on the `/events` endpoint.

use std::fmt;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use crate::error::{Error, ParseError, Result};
use crate::event::ClientEvent;

use super::AgatarkClient;
use super::config::endpoint;
use super::http::check_status;

/// Why a long-poll loop ended.
#[derive(Debug)]
pub enum PollExit {
    /// The client was closed.
    Closed,
    /// The controller became unreachable (refused, reset, DNS failure).
    ConnectionLost(Error),
    /// Any other failure, including a rejected token.
    Failed(Error),
}

impl PollExit {
    /// Returns the error that ended the loop, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Closed => None,
            Self::ConnectionLost(err) | Self::Failed(err) => Some(err),
        }
    }
}

impl fmt::Display for PollExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("client closed"),
            Self::ConnectionLost(err) => write!(f, "connection lost: {err}"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

impl AgatarkClient {
    /// Long-polls `/events` until the client is closed or a request fails.
    ///
    /// Each attempt is bounded by the configured poll timeout; an attempt
    /// that times out is retried at once. Any other failure ends the loop.
    /// There is no backoff and no re-authentication: a token rejected
    /// mid-loop ends it like any other error.
    ///
    /// Received payloads are published on the event bus and stored as the
    /// data point's body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] if no bearer token is held when
    /// the loop starts. Once running, the loop reports how it ended through
    /// [`PollExit`] instead of an error.
    pub async fn long_poll_events(&self) -> Result<PollExit> {
        if !self.is_authenticated() {
            return Err(Error::NotAuthenticated);
        }

        let timeout = self.inner.poll_timeout;
        let mut closed = self.inner.closed.subscribe();

        let exit = loop {
            if *closed.borrow_and_update() {
                tracing::debug!("Client closed; ending long-poll loop");
                break PollExit::Closed;
            }

            tracing::debug!("Start polling /events");

            let outcome = tokio::select! {
                () = async {
                    let _ = closed.wait_for(|closed| *closed).await;
                } => {
                    tracing::debug!("Client closed during poll; ending long-poll loop");
                    break PollExit::Closed;
                }
                outcome = tokio::time::timeout(timeout, self.poll_once()) => outcome,
            };

            match outcome {
                Err(_) => {
                    tracing::warn!(
                        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        "Timeout while polling /events, retrying"
                    );
                }
                Ok(Ok(payload)) => self.dispatch_payload(payload),
                Ok(Err(err)) if err.is_connection_failure() => {
                    tracing::error!(error = %err, "Error during long polling /events");
                    break PollExit::ConnectionLost(err);
                }
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "Unexpected error during long polling /events");
                    break PollExit::Failed(err);
                }
            }
        };

        self.inner.events.publish(ClientEvent::PollStopped {
            reason: exit.to_string(),
        });
        Ok(exit)
    }

    /// Issues a single `/events` request.
    async fn poll_once(&self) -> Result<Value> {
        let token = self.require_authorization()?;
        let url = endpoint(&self.inner.credentials.read().host, "/events")?;

        let response = self
            .inner
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, token)
            .send()
            .await?;

        let body = check_status(response)?.text().await?;
        Ok(serde_json::from_str(&body).map_err(ParseError::from)?)
    }

    fn dispatch_payload(&self, payload: Value) {
        tracing::debug!(payload = %payload, "Received events");
        self.store_body(&payload);
        self.inner.events.publish(ClientEvent::from_payload(payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn requires_token() {
        let client = AgatarkClient::new("192.168.1.20", "me@example.com", "secret").unwrap();
        assert!(matches!(
            client.long_poll_events().await,
            Err(Error::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn closed_client_exits_immediately() {
        let client = AgatarkClient::new("192.168.1.20", "me@example.com", "secret").unwrap();
        *client.inner.authorization.write() = Some("S abc".to_string());
        client.close();

        let exit = client.long_poll_events().await.unwrap();
        assert!(matches!(exit, PollExit::Closed));
        assert!(exit.error().is_none());
    }

    #[test]
    fn exit_display() {
        assert_eq!(PollExit::Closed.to_string(), "client closed");
        let exit = PollExit::Failed(Error::NotAuthenticated);
        assert_eq!(exit.to_string(), "failed: not authenticated, login first");
    }
}
