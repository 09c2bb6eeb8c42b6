// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Config entry lifecycle: setup, option updates, unload and reload.
//!
//! # Examples
//!
//! ```no_run
//! use agatark_lib::config::{ConfigEntry, Credentials};
//! use agatark_lib::integration::Integration;
//!
//! # async fn example() -> Result<(), agatark_lib::integration::SetupError> {
//! let entry = ConfigEntry::new(Credentials::new("192.168.1.20", "me@example.com", "secret"));
//!
//! let runtime = Integration::new().setup_entry(&entry).await?;
//! println!("{} entities", runtime.entities().len());
//!
//! let _exit = runtime.unload().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::client::{AgatarkClient, ClientConfig, PollExit};
use crate::config::{ConfigEntry, DEFAULT_UPDATE_INTERVAL, DOMAIN};
use crate::coordinator::{DataUpdateCoordinator, UpdateError};
use crate::entity::{Entities, PLATFORMS};
use crate::error::{Error, ErrorKind, Result};

/// Why an entry could not be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Credentials were rejected; the host should start re-authentication.
    #[error("authentication failed: {0}")]
    AuthFailed(#[source] Error),

    /// The controller is not usable right now; the host may retry later.
    #[error("setup failed: {0}")]
    NotReady(#[source] Error),
}

impl From<Error> for SetupError {
    fn from(err: Error) -> Self {
        match err.kind() {
            ErrorKind::Authentication => Self::AuthFailed(err),
            ErrorKind::Communication | ErrorKind::Other => Self::NotReady(err),
        }
    }
}

impl From<UpdateError> for SetupError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::AuthFailed(err) => Self::AuthFailed(err),
            UpdateError::UpdateFailed(err) => Self::NotReady(err),
        }
    }
}

/// Settings applied to every entry set up through this integration.
#[derive(Debug, Clone)]
pub struct Integration {
    update_interval: Duration,
    request_timeout: Duration,
    poll_timeout: Duration,
}

impl Integration {
    /// Creates an integration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            request_timeout: ClientConfig::DEFAULT_REQUEST_TIMEOUT,
            poll_timeout: ClientConfig::DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Sets the coordinator refresh interval.
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Sets the timeout for login and device requests.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the bound on a single long-poll attempt.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets up a config entry.
    ///
    /// Logs in, starts the long-poll task, performs the first refresh,
    /// starts periodic refreshes and creates the entities of every platform.
    /// On failure nothing is left running.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AuthFailed`] if the controller rejects the
    /// credentials and [`SetupError::NotReady`] for any other failure.
    pub async fn setup_entry(
        &self,
        entry: &ConfigEntry,
    ) -> std::result::Result<EntryRuntime, SetupError> {
        tracing::info!(
            entry_id = %entry.entry_id,
            host = %entry.title,
            "Setting up Agatark integration"
        );

        let result = self.try_setup(entry).await;
        match &result {
            Ok(_) => tracing::info!(
                entry_id = %entry.entry_id,
                "Agatark integration setup completed successfully"
            ),
            Err(err) => tracing::error!(
                entry_id = %entry.entry_id,
                error = %err,
                "Error setting up Agatark integration"
            ),
        }
        result
    }

    async fn try_setup(
        &self,
        entry: &ConfigEntry,
    ) -> std::result::Result<EntryRuntime, SetupError> {
        let client = ClientConfig::from_credentials(entry.effective_credentials())
            .with_request_timeout(self.request_timeout)
            .with_poll_timeout(self.poll_timeout)
            .into_client()?;

        if let Err(err) = client.authenticate().await {
            client.close();
            return Err(err.into());
        }

        let poller = client.clone();
        let poll_task = tokio::spawn(async move { poller.long_poll_events().await });

        let coordinator = Arc::new(DataUpdateCoordinator::with_interval(
            client.clone(),
            DOMAIN,
            self.update_interval,
        ));
        if let Err(err) = coordinator.first_refresh().await {
            client.close();
            let _ = poll_task.await;
            return Err(err.into());
        }
        let refresh_task = coordinator.start();

        let entities = Entities::for_platforms(&PLATFORMS, &coordinator, entry.entry_id);

        Ok(EntryRuntime {
            entry_id: entry.entry_id,
            client,
            coordinator,
            entities,
            poll_task,
            refresh_task,
        })
    }

    /// Unloads the running entry and sets it up again from `entry`.
    ///
    /// # Errors
    ///
    /// Same as [`setup_entry`](Self::setup_entry).
    pub async fn reload_entry(
        &self,
        runtime: EntryRuntime,
        entry: &ConfigEntry,
    ) -> std::result::Result<EntryRuntime, SetupError> {
        runtime.unload().await;
        self.setup_entry(entry).await
    }
}

impl Default for Integration {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything running for one set-up entry.
#[derive(Debug)]
pub struct EntryRuntime {
    entry_id: Uuid,
    client: AgatarkClient,
    coordinator: Arc<DataUpdateCoordinator<AgatarkClient>>,
    entities: Entities<AgatarkClient>,
    poll_task: JoinHandle<Result<PollExit>>,
    refresh_task: JoinHandle<()>,
}

impl EntryRuntime {
    /// Returns the id of the entry this runtime belongs to.
    #[must_use]
    pub fn entry_id(&self) -> Uuid {
        self.entry_id
    }

    /// Returns the client.
    #[must_use]
    pub fn client(&self) -> &AgatarkClient {
        &self.client
    }

    /// Returns the coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<DataUpdateCoordinator<AgatarkClient>> {
        &self.coordinator
    }

    /// Returns the entities.
    #[must_use]
    pub fn entities(&self) -> &Entities<AgatarkClient> {
        &self.entities
    }

    /// Returns `true` while the long-poll task is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        !self.poll_task.is_finished()
    }

    /// Applies changed options to the live client.
    ///
    /// The held bearer token is kept; new credentials take effect at the
    /// next login.
    pub fn update_options(&self, entry: &ConfigEntry) {
        tracing::info!(entry_id = %self.entry_id, "Updating options for Agatark integration");
        let credentials = entry.effective_credentials();
        self.client
            .update_credentials(credentials.email, credentials.password, credentials.host);
    }

    /// Stops the long-poll and refresh tasks and closes the client.
    ///
    /// Returns how the long-poll loop ended, or `None` if it never ran to
    /// completion.
    pub async fn unload(self) -> Option<PollExit> {
        tracing::info!(entry_id = %self.entry_id, "Unloading Agatark integration");

        self.client.close();
        self.coordinator.shutdown();

        if let Err(err) = self.refresh_task.await {
            tracing::error!(error = %err, "Refresh task panicked");
        }

        match self.poll_task.await {
            Ok(Ok(exit)) => Some(exit),
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "Long-poll loop did not start");
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "Long-poll task panicked");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommunicationError;

    #[test]
    fn setup_error_from_kinds() {
        let auth = Error::Authentication {
            status: 403,
            reason: "Forbidden".into(),
        };
        assert!(matches!(SetupError::from(auth), SetupError::AuthFailed(_)));

        let comm: Error = CommunicationError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
        }
        .into();
        assert!(matches!(SetupError::from(comm), SetupError::NotReady(_)));

        assert!(matches!(
            SetupError::from(UpdateError::UpdateFailed(Error::NotAuthenticated)),
            SetupError::NotReady(_)
        ));
    }

    #[tokio::test]
    async fn setup_rejects_incomplete_entry() {
        let entry = ConfigEntry::new(crate::config::Credentials::new("", "e", "p"));
        let err = Integration::new().setup_entry(&entry).await.unwrap_err();
        assert!(matches!(err, SetupError::NotReady(Error::Config(_))));
    }

    #[test]
    fn builder_settings() {
        let integration = Integration::default()
            .with_update_interval(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(2))
            .with_poll_timeout(Duration::from_secs(1));
        assert_eq!(integration.update_interval, Duration::from_secs(5));
        assert_eq!(integration.request_timeout, Duration::from_secs(2));
        assert_eq!(integration.poll_timeout, Duration::from_secs(1));
    }
}
