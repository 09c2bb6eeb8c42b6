// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stored configuration of one controller.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;

/// Host and account used to reach a controller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Controller host, bare or with scheme.
    pub host: String,
    /// Login email; also the PBKDF2 salt.
    pub email: String,
    /// Login password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential set.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks that no field is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField("host"));
        }
        if self.email.trim().is_empty() {
            return Err(ConfigError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::MissingField("password"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Options changed after setup. Unset fields fall back to the entry data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOptions {
    /// Replacement host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Replacement email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl EntryOptions {
    /// Returns `true` if no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// A configured controller.
///
/// # Examples
///
/// ```
/// use agatark_lib::config::{ConfigEntry, Credentials, EntryOptions};
///
/// let mut entry = ConfigEntry::new(Credentials::new("10.0.0.5", "me@example.com", "secret"));
/// entry.options = EntryOptions {
///     host: Some("10.0.0.6".into()),
///     ..EntryOptions::default()
/// };
///
/// assert_eq!(entry.effective_credentials().host, "10.0.0.6");
/// assert_eq!(entry.effective_credentials().email, "me@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique identifier of this entry.
    pub entry_id: Uuid,
    /// Display title (the host at creation time).
    pub title: String,
    /// Identifier used to reject duplicate setups of the same controller.
    pub unique_id: String,
    /// Credentials entered during setup.
    pub data: Credentials,
    /// Options changed after setup.
    #[serde(default)]
    pub options: EntryOptions,
}

impl ConfigEntry {
    /// Creates an entry for the given credentials.
    #[must_use]
    pub fn new(data: Credentials) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            title: data.host.clone(),
            unique_id: super::slugify(&data.host),
            data,
            options: EntryOptions::default(),
        }
    }

    /// Returns the credentials to use: each option over the stored value.
    #[must_use]
    pub fn effective_credentials(&self) -> Credentials {
        Credentials {
            host: pick(self.options.host.as_ref(), &self.data.host),
            email: pick(self.options.email.as_ref(), &self.data.email),
            password: pick(self.options.password.as_ref(), &self.data.password),
        }
    }
}

// Blank options (an untouched form field) do not override.
fn pick(option: Option<&String>, fallback: &str) -> String {
    match option {
        Some(value) if !value.is_empty() => value.clone(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ConfigEntry {
        ConfigEntry::new(Credentials::new("10.0.0.5", "me@example.com", "secret"))
    }

    #[test]
    fn validate_reports_first_blank_field() {
        assert!(Credentials::new("h", "e", "p").validate().is_ok());
        assert_eq!(
            Credentials::new(" ", "e", "p").validate(),
            Err(ConfigError::MissingField("host"))
        );
        assert_eq!(
            Credentials::new("h", "", "p").validate(),
            Err(ConfigError::MissingField("email"))
        );
        assert_eq!(
            Credentials::new("h", "e", "").validate(),
            Err(ConfigError::MissingField("password"))
        );
    }

    #[test]
    fn debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("h", "e", "hunter2"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn new_entry_derives_title_and_unique_id() {
        let entry = entry();
        assert_eq!(entry.title, "10.0.0.5");
        assert_eq!(entry.unique_id, "10-0-0-5");
        assert!(entry.options.is_empty());
    }

    #[test]
    fn options_override_data() {
        let mut entry = entry();
        entry.options.email = Some("new@example.com".into());
        entry.options.password = Some(String::new());

        let creds = entry.effective_credentials();
        assert_eq!(creds.host, "10.0.0.5");
        assert_eq!(creds.email, "new@example.com");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn entry_serde_round_trip() {
        let entry = entry();
        let json = serde_json::to_string(&entry).unwrap();
        let back: ConfigEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
