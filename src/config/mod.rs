// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration configuration.
//!
//! A [`ConfigEntry`] is what a host stores for one configured controller:
//! the credentials entered during setup plus any options changed later.
//! [`ConfigFlow`] validates new credentials against the controller before an
//! entry is created; [`OptionsFlow`] edits the options of an existing one.

mod entry;
mod flow;

use std::time::Duration;

pub use entry::{ConfigEntry, Credentials, EntryOptions};
pub use flow::{ConfigFlow, FieldKind, FlowError, FlowResult, FormField, OptionsFlow, slugify};

/// Integration domain.
pub const DOMAIN: &str = "agatark";

/// Attribution shown alongside entity values.
pub const ATTRIBUTION: &str = "Data provided by the Agatark controller";

/// How often the coordinator refreshes when nothing else triggers it.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60 * 60);
