// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response of the `/hello` login endpoint.

use serde::{Deserialize, Serialize};

/// Body returned by a successful login.
///
/// Only `authorization` is needed by the client; the rest is informational
/// and may be absent on older firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer credential for subsequent requests.
    pub authorization: String,
    /// Name of the controller node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// Logged-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<LoginUser>,
    /// Sites the user has access to.
    #[serde(default)]
    pub sites: Vec<Site>,
}

/// User details returned on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    /// User identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
}

/// A site managed by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Site identifier.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Site kind.
    #[serde(rename = "type", default)]
    pub site_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_response() {
        let json = r#"{
            "authorization": "S abc",
            "nodeName": "home",
            "user": {"id": 7, "name": "Kim", "email": "kim@example.com"},
            "sites": [{"id": 1, "name": "House", "type": "home"}]
        }"#;
        let login: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(login.authorization, "S abc");
        assert_eq!(login.node_name.as_deref(), Some("home"));
        assert_eq!(login.user.unwrap().id, 7);
        assert_eq!(login.sites[0].site_type, "home");
    }

    #[test]
    fn parse_minimal_response() {
        let login: LoginResponse = serde_json::from_str(r#"{"authorization": "X"}"#).unwrap();
        assert_eq!(login.authorization, "X");
        assert!(login.user.is_none());
        assert!(login.sites.is_empty());
    }
}
