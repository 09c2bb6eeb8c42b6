// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login token derivation.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

/// Number of PBKDF2 rounds the controller expects.
pub const TOKEN_ITERATIONS: u32 = 10_000;

/// Length of the derived key in bytes (before hex encoding).
pub const TOKEN_KEY_LEN: usize = 32;

/// Derives the login token sent to `/hello`.
///
/// PBKDF2-HMAC-SHA256 with the password as input and the email as salt,
/// hex encoded. The controller never sees the password itself.
///
/// # Examples
///
/// ```
/// use agatark_lib::client::generate_token;
///
/// let token = generate_token("secret", "user@example.com");
/// assert_eq!(token.len(), 64);
/// assert_eq!(token, generate_token("secret", "user@example.com"));
/// ```
#[must_use]
pub fn generate_token(password: &str, email: &str) -> String {
    let mut key = [0u8; TOKEN_KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        email.as_bytes(),
        TOKEN_ITERATIONS,
        &mut key,
    );
    hex::encode(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer() {
        assert_eq!(
            generate_token("secret", "user@example.com"),
            "751926b0e176ebd4204b2397ac737f0bc1d424df2747ed3d8a30f5e04cf46928"
        );
        assert_eq!(
            generate_token("password", "salt"),
            "5ec02b91a4b59c6f59dd5fbe4ca649ece4fa8568cdb8ba36cf41426e8805522b"
        );
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(
            generate_token("", ""),
            "0d60c695f7e95db4f9557f5b2410e77b296801a818bd99ffb8d3dd4972b28c50"
        );
    }

    #[test]
    fn deterministic_lowercase_hex() {
        let a = generate_token("hunter2", "me@home.lan");
        let b = generate_token("hunter2", "me@home.lan");
        assert_eq!(a, b);
        assert_eq!(a.len(), TOKEN_KEY_LEN * 2);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn inputs_change_token() {
        let base = generate_token("hunter2", "me@home.lan");
        assert_ne!(base, generate_token("hunter3", "me@home.lan"));
        assert_ne!(base, generate_token("hunter2", "you@home.lan"));
        // Swapping password and salt is not the same derivation.
        assert_ne!(base, generate_token("me@home.lan", "hunter2"));
    }
}
