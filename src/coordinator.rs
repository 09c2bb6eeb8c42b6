// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data-update coordinator.
//!
//! The coordinator fetches the data point on a fixed interval and shares
//! the latest value with every entity, so entities never hit the client
//! themselves.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use agatark_lib::client::AgatarkClient;
//! use agatark_lib::coordinator::DataUpdateCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AgatarkClient::new("192.168.1.20", "me@example.com", "secret")?;
//! client.authenticate().await?;
//!
//! let coordinator = Arc::new(DataUpdateCoordinator::new(client, "agatark"));
//! coordinator.first_refresh().await?;
//! let _task = coordinator.start();
//!
//! let mut updates = coordinator.subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("{:?}", *updates.borrow());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::AgatarkApi;
use crate::config::DEFAULT_UPDATE_INTERVAL;
use crate::error::{Error, ErrorKind};
use crate::model::DeviceData;

/// Why a refresh failed.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Credentials were rejected; the user has to re-enter them.
    #[error("authentication failed: {0}")]
    AuthFailed(#[source] Error),

    /// Any other failure; the next refresh may succeed.
    #[error("update failed: {0}")]
    UpdateFailed(#[source] Error),
}

impl UpdateError {
    fn classify(err: Error) -> Self {
        match err.kind() {
            ErrorKind::Authentication => Self::AuthFailed(err),
            ErrorKind::Communication | ErrorKind::Other => Self::UpdateFailed(err),
        }
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn inner(&self) -> &Error {
        match self {
            Self::AuthFailed(err) | Self::UpdateFailed(err) => err,
        }
    }
}

#[derive(Debug, Default)]
struct RefreshStatus {
    success: bool,
    time: Option<DateTime<Utc>>,
}

/// Periodically fetches the data point and shares it with entities.
#[derive(Debug)]
pub struct DataUpdateCoordinator<A> {
    api: A,
    name: String,
    update_interval: Duration,
    data_tx: watch::Sender<Option<DeviceData>>,
    status: RwLock<RefreshStatus>,
    shutdown_tx: watch::Sender<bool>,
}

impl<A: AgatarkApi> DataUpdateCoordinator<A> {
    /// Creates a coordinator with the default hourly interval.
    #[must_use]
    pub fn new(api: A, name: impl Into<String>) -> Self {
        Self::with_interval(api, name, DEFAULT_UPDATE_INTERVAL)
    }

    /// Creates a coordinator with a custom interval.
    #[must_use]
    pub fn with_interval(api: A, name: impl Into<String>, update_interval: Duration) -> Self {
        let (data_tx, _) = watch::channel(None);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            api,
            name: name.into(),
            update_interval,
            data_tx,
            status: RwLock::new(RefreshStatus::default()),
            shutdown_tx,
        }
    }

    /// Returns the coordinator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Returns the API the coordinator fetches from.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns the latest data, if any refresh succeeded yet.
    #[must_use]
    pub fn data(&self) -> Option<DeviceData> {
        self.data_tx.borrow().clone()
    }

    /// Watches the data; the receiver wakes after every successful refresh.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<DeviceData>> {
        self.data_tx.subscribe()
    }

    /// Returns `true` if the last refresh succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.status.read().success
    }

    /// Returns when the last successful refresh finished.
    #[must_use]
    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.status.read().time
    }

    /// Fetches the data point once.
    ///
    /// On failure the previous data is kept and the coordinator is marked
    /// unsuccessful until the next good refresh.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::AuthFailed`] for rejected credentials and
    /// [`UpdateError::UpdateFailed`] for everything else.
    pub async fn refresh(&self) -> Result<(), UpdateError> {
        match self.api.fetch_data().await {
            Ok(data) => {
                {
                    let mut status = self.status.write();
                    status.success = true;
                    status.time = Some(Utc::now());
                }
                self.data_tx.send_replace(Some(data));
                tracing::debug!(name = %self.name, "Refreshed data");
                Ok(())
            }
            Err(err) => {
                self.status.write().success = false;
                let err = UpdateError::classify(err);
                tracing::warn!(name = %self.name, error = %err, "Error fetching data");
                Err(err)
            }
        }
    }

    /// Performs the refresh that setup depends on.
    ///
    /// # Errors
    ///
    /// Same as [`refresh`](Self::refresh); setup should abort on error.
    pub async fn first_refresh(&self) -> Result<(), UpdateError> {
        self.refresh().await
    }

    /// Refreshes now, e.g. after an entity changed something.
    ///
    /// Failures are logged and reflected in
    /// [`last_update_success`](Self::last_update_success).
    pub async fn request_refresh(&self) {
        if let Err(err) = self.refresh().await {
            tracing::debug!(name = %self.name, error = %err, "Requested refresh failed");
        }
    }

    /// Spawns the periodic refresh task.
    ///
    /// The first tick happens one interval from now. The task ends on
    /// [`shutdown`](Self::shutdown).
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let mut shutdown = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let period = coordinator.update_interval;
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::debug!(name = %coordinator.name, interval_secs = period.as_secs(), "Starting periodic refresh");

            loop {
                tokio::select! {
                    () = async {
                        let _ = shutdown.wait_for(|stop| *stop).await;
                    } => break,
                    _ = ticker.tick() => {
                        // Errors are already logged and recorded by refresh.
                        let _ = coordinator.refresh().await;
                    }
                }
            }

            tracing::debug!(name = %coordinator.name, "Periodic refresh stopped");
        })
    }

    /// Stops the periodic refresh task.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{CommunicationError, Result};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted API for coordinator and entity tests.
    #[derive(Debug, Default)]
    pub(crate) struct FakeApi {
        pub title: RwLock<String>,
        pub failures: parking_lot::Mutex<VecDeque<Error>>,
        pub fetches: AtomicUsize,
    }

    impl FakeApi {
        pub(crate) fn with_title(title: &str) -> Self {
            Self {
                title: RwLock::new(title.to_string()),
                ..Self::default()
            }
        }

        pub(crate) fn fail_next(&self, err: Error) {
            self.failures.lock().push_back(err);
        }
    }

    impl AgatarkApi for Arc<FakeApi> {
        async fn fetch_data(&self) -> Result<DeviceData> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.failures.lock().pop_front() {
                return Err(err);
            }
            Ok(DeviceData::new(self.title.read().clone()))
        }

        async fn set_title(&self, title: &str) -> Result<()> {
            *self.title.write() = title.to_string();
            Ok(())
        }
    }

    fn auth_error() -> Error {
        Error::Authentication {
            status: 401,
            reason: "Unauthorized".into(),
        }
    }

    fn comm_error() -> Error {
        CommunicationError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        }
        .into()
    }

    #[tokio::test]
    async fn refresh_stores_data() {
        let api = Arc::new(FakeApi::with_title("foo"));
        let coordinator = DataUpdateCoordinator::new(Arc::clone(&api), "test");
        assert!(coordinator.data().is_none());
        assert!(!coordinator.last_update_success());

        coordinator.first_refresh().await.unwrap();
        assert_eq!(coordinator.data().unwrap().title, "foo");
        assert!(coordinator.last_update_success());
        assert!(coordinator.last_update_time().is_some());
        assert_eq!(coordinator.update_interval(), Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn auth_error_maps_to_auth_failed() {
        let api = Arc::new(FakeApi::with_title("foo"));
        api.fail_next(auth_error());
        let coordinator = DataUpdateCoordinator::new(Arc::clone(&api), "test");

        let err = coordinator.refresh().await.unwrap_err();
        assert!(matches!(err, UpdateError::AuthFailed(_)));
        assert!(err.inner().is_authentication());
    }

    #[tokio::test]
    async fn other_errors_map_to_update_failed() {
        let api = Arc::new(FakeApi::with_title("foo"));
        api.fail_next(comm_error());
        api.fail_next(Error::NotAuthenticated);
        let coordinator = DataUpdateCoordinator::new(Arc::clone(&api), "test");

        assert!(matches!(
            coordinator.refresh().await,
            Err(UpdateError::UpdateFailed(_))
        ));
        assert!(matches!(
            coordinator.refresh().await,
            Err(UpdateError::UpdateFailed(_))
        ));
    }

    #[tokio::test]
    async fn failure_keeps_previous_data() {
        let api = Arc::new(FakeApi::with_title("foo"));
        let coordinator = DataUpdateCoordinator::new(Arc::clone(&api), "test");
        coordinator.refresh().await.unwrap();

        api.fail_next(comm_error());
        coordinator.request_refresh().await;

        assert!(!coordinator.last_update_success());
        assert_eq!(coordinator.data().unwrap().title, "foo");
    }

    #[tokio::test]
    async fn subscribers_see_refreshes() {
        let api = Arc::new(FakeApi::with_title("foo"));
        let coordinator = DataUpdateCoordinator::new(Arc::clone(&api), "test");
        let mut rx = coordinator.subscribe();

        coordinator.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().title, "foo");
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_task_refreshes_until_shutdown() {
        let api = Arc::new(FakeApi::with_title("foo"));
        let coordinator = Arc::new(DataUpdateCoordinator::with_interval(
            Arc::clone(&api),
            "test",
            Duration::from_secs(60),
        ));

        let task = coordinator.start();
        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);

        coordinator.shutdown();
        task.await.unwrap();

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }
}
