// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Agatark library.
//!
//! Every failure falls into one of three kinds (see [`ErrorKind`]):
//! bad credentials, communication trouble, or anything else. Hosts use the
//! kind to decide between asking the user for new credentials and simply
//! reporting that an update failed.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The controller rejected the credentials (HTTP 401 or 403).
    #[error("authentication failed: HTTP {status} - {reason}")]
    Authentication {
        /// HTTP status code returned by the controller.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// The controller could not be reached or answered with an error status.
    #[error("communication error: {0}")]
    Communication(#[from] CommunicationError),

    /// A response could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An operation needs a bearer token but none is held.
    #[error("not authenticated, login first")]
    NotAuthenticated,

    /// The client has been closed.
    #[error("client is closed")]
    Closed,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad credentials; the user has to re-enter them.
    Authentication,
    /// Network failure, timeout or unexpected HTTP status.
    Communication,
    /// Anything else.
    Other,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Communication(_) => ErrorKind::Communication,
            Self::Parse(_) | Self::Config(_) | Self::NotAuthenticated | Self::Closed => {
                ErrorKind::Other
            }
        }
    }

    /// Returns `true` for authentication errors.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// Returns `true` for communication errors.
    #[must_use]
    pub fn is_communication(&self) -> bool {
        self.kind() == ErrorKind::Communication
    }

    /// Returns `true` when the connection itself failed: refused, reset,
    /// unresolvable host or unusable address.
    ///
    /// Timeouts and error statuses are communication errors but not
    /// connection failures.
    #[must_use]
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Communication(CommunicationError::Http(err)) => {
                err.is_connect() || err.is_request() || err.is_body() || err.is_builder()
            }
            Self::Communication(CommunicationError::InvalidAddress(_)) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Communication(CommunicationError::Http(err))
    }
}

/// Errors raised while talking to the controller.
#[derive(Debug, Error)]
pub enum CommunicationError {
    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The controller answered with an unexpected status.
    #[error("unexpected HTTP status {status} - {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// The configured host cannot form a valid URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to decoding controller responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// Errors related to integration configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
