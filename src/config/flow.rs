// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setup and options flows.
//!
//! The flows decide what a host shows and stores; rendering the forms is
//! left to the host.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::{ErrorKind, Result};

use super::{ConfigEntry, Credentials, EntryOptions};

/// Input widget for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text.
    Text,
    /// Masked text.
    Password,
}

/// A field of a form the host should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Key under which the value is returned.
    pub name: &'static str,
    /// Input widget.
    pub kind: FieldKind,
    /// Whether the field must be filled.
    pub required: bool,
    /// Pre-filled value.
    pub default: Option<String>,
}

impl FormField {
    fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    fn optional(name: &'static str, default: Option<&String>) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            default: Some(default.cloned().unwrap_or_default()),
        }
    }
}

/// Form-level error shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    /// The controller rejected the credentials.
    Auth,
    /// The controller could not be reached.
    Connection,
    /// A required field was left blank.
    InvalidInput,
    /// Anything else.
    Unknown,
}

impl FlowError {
    /// Returns the translation key of this error.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Connection => "connection",
            Self::InvalidInput => "invalid_input",
            Self::Unknown => "unknown",
        }
    }

    fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Authentication => Self::Auth,
            ErrorKind::Communication => Self::Connection,
            ErrorKind::Other => Self::Unknown,
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a flow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowResult {
    /// Show (or re-show) a form.
    ShowForm {
        /// Step that handles the submitted form.
        step_id: &'static str,
        /// Fields to render.
        fields: Vec<FormField>,
        /// Error from the previous submission.
        error: Option<FlowError>,
    },
    /// Store a new config entry.
    CreateEntry(ConfigEntry),
    /// Store new options for an existing entry.
    UpdateOptions(EntryOptions),
    /// Stop the flow.
    Abort {
        /// Translation key of the reason.
        reason: &'static str,
    },
}

/// Flow that sets up a new controller.
#[derive(Debug, Clone)]
pub struct ConfigFlow {
    configured: HashSet<String>,
    request_timeout: Duration,
}

impl ConfigFlow {
    /// Version of the stored entry format.
    pub const VERSION: u32 = 1;

    /// Creates a flow with no existing entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            configured: HashSet::new(),
            request_timeout: ClientConfig::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Registers the unique ids of entries that already exist.
    #[must_use]
    pub fn with_configured<I, S>(mut self, unique_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.configured.extend(unique_ids.into_iter().map(Into::into));
        self
    }

    /// Sets the timeout for the credential check.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Handles the user step.
    ///
    /// Without input the empty form is returned. With input the
    /// credentials are checked by logging in; on success a new entry is
    /// created unless the controller is already configured.
    pub async fn step_user(&self, input: Option<Credentials>) -> FlowResult {
        let Some(input) = input else {
            return Self::user_form(None);
        };

        if let Err(err) = input.validate() {
            tracing::warn!(error = %err, "Invalid setup input");
            return Self::user_form(Some(FlowError::InvalidInput));
        }

        if let Err(err) = self.test_credentials(&input).await {
            let flow_error = FlowError::from_kind(err.kind());
            match flow_error {
                FlowError::Auth => tracing::warn!(error = %err, "Credential check rejected"),
                _ => tracing::error!(error = %err, "Credential check failed"),
            }
            return Self::user_form(Some(flow_error));
        }

        let entry = ConfigEntry::new(input);
        if self.configured.contains(&entry.unique_id) {
            return FlowResult::Abort {
                reason: "already_configured",
            };
        }

        tracing::info!(host = %entry.title, "Creating config entry");
        FlowResult::CreateEntry(entry)
    }

    async fn test_credentials(&self, credentials: &Credentials) -> Result<()> {
        let client = ClientConfig::from_credentials(credentials.clone())
            .with_request_timeout(self.request_timeout)
            .into_client()?;
        let outcome = client.authenticate().await;
        client.close();
        outcome.map(|_| ())
    }

    fn user_form(error: Option<FlowError>) -> FlowResult {
        FlowResult::ShowForm {
            step_id: "user",
            fields: vec![
                FormField::required("host", FieldKind::Text),
                FormField::required("email", FieldKind::Text),
                FormField::required("password", FieldKind::Password),
            ],
            error,
        }
    }
}

impl Default for ConfigFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Flow that edits the options of an existing entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsFlow;

impl OptionsFlow {
    /// Handles the init step.
    ///
    /// Without input a form pre-filled from the current options is
    /// returned; with input the new options are returned for storage.
    /// Blank values are stored as unset.
    #[must_use]
    pub fn step_init(entry: &ConfigEntry, input: Option<EntryOptions>) -> FlowResult {
        match input {
            Some(options) => FlowResult::UpdateOptions(EntryOptions {
                host: non_blank(options.host),
                email: non_blank(options.email),
                password: non_blank(options.password),
            }),
            None => FlowResult::ShowForm {
                step_id: "init",
                fields: vec![
                    FormField::optional("host", entry.options.host.as_ref()),
                    FormField::optional("email", entry.options.email.as_ref()),
                    FormField::optional("password", entry.options.password.as_ref()),
                ],
                error: None,
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reduces a host to an identifier: transliterated to ASCII, lowercase
/// alphanumerics joined by single dashes.
///
/// # Examples
///
/// ```
/// use agatark_lib::config::slugify;
///
/// assert_eq!(slugify("192.168.1.20"), "192-168-1-20");
/// assert_eq!(slugify("http://Controller.LAN:8080/"), "http-controller-lan-8080");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    slug::slugify(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  a..b//c "), "a-b-c");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Ågatark"), "agatark");
        assert_eq!(slugify("Contrôleur Salon"), "controleur-salon");
    }

    #[tokio::test]
    async fn user_step_without_input_shows_form() {
        let result = ConfigFlow::new().step_user(None).await;
        let FlowResult::ShowForm {
            step_id,
            fields,
            error,
        } = result
        else {
            panic!("expected form, got {result:?}");
        };
        assert_eq!(step_id, "user");
        assert!(error.is_none());
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[2].kind, FieldKind::Password);
        assert!(fields.iter().all(|f| f.required));
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_network() {
        let result = ConfigFlow::new()
            .step_user(Some(Credentials::new("", "me@example.com", "pw")))
            .await;
        assert!(matches!(
            result,
            FlowResult::ShowForm {
                error: Some(FlowError::InvalidInput),
                ..
            }
        ));
    }

    #[test]
    fn flow_error_codes() {
        assert_eq!(FlowError::from_kind(ErrorKind::Authentication).as_str(), "auth");
        assert_eq!(FlowError::from_kind(ErrorKind::Communication).as_str(), "connection");
        assert_eq!(FlowError::from_kind(ErrorKind::Other).to_string(), "unknown");
    }

    #[test]
    fn options_form_prefills_current_options() {
        let mut entry = ConfigEntry::new(Credentials::new("h", "e", "p"));
        entry.options.host = Some("10.0.0.9".into());

        let FlowResult::ShowForm { step_id, fields, .. } = OptionsFlow::step_init(&entry, None)
        else {
            panic!("expected form");
        };
        assert_eq!(step_id, "init");
        assert_eq!(fields[0].default.as_deref(), Some("10.0.0.9"));
        assert_eq!(fields[1].default.as_deref(), Some(""));
        assert!(fields.iter().all(|f| !f.required));
    }

    #[test]
    fn options_submission_drops_blank_values() {
        let entry = ConfigEntry::new(Credentials::new("h", "e", "p"));
        let result = OptionsFlow::step_init(
            &entry,
            Some(EntryOptions {
                host: Some("10.0.0.9".into()),
                email: Some("  ".into()),
                password: None,
            }),
        );
        assert_eq!(
            result,
            FlowResult::UpdateOptions(EntryOptions {
                host: Some("10.0.0.9".into()),
                email: None,
                password: None,
            })
        );
    }
}
