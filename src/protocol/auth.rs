// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PJLink greeting parsing and challenge-response authentication.

use md5::{Digest, Md5};

/// Greeting sent by a projector as soon as a connection is accepted.
///
/// # Examples
///
/// ```
/// use epson_pjlink::protocol::Greeting;
///
/// let greeting = Greeting::parse("PJLINK 1 498e328\r");
/// assert_eq!(greeting, Greeting::Authenticated { nonce: "498e328".to_string() });
///
/// assert_eq!(Greeting::parse("PJLINK 0"), Greeting::Open);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Greeting {
    /// `PJLINK 1 <nonce>`: every command must carry the authentication hash.
    Authenticated {
        /// One-time token seeding the hash.
        nonce: String,
    },
    /// `PJLINK 0`: authentication is disabled on the projector.
    Open,
    /// Anything else. Commands are sent without a hash.
    Unrecognized,
}

impl Greeting {
    /// Parses the greeting text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("PJLINK"), Some("1"), Some(nonce)) => Self::Authenticated {
                nonce: nonce.to_string(),
            },
            (Some("PJLINK"), Some("0"), _) => Self::Open,
            _ => Self::Unrecognized,
        }
    }

    /// Returns `true` if the projector issued an authentication challenge.
    #[must_use]
    pub fn is_challenge(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Builds the terminated frame for `command` under this greeting.
    ///
    /// Challenged connections get the authentication hash prepended;
    /// otherwise the command is sent as is. A missing password hashes as
    /// the empty string.
    #[must_use]
    pub fn frame(&self, command: &str, password: Option<&str>) -> String {
        match self {
            Self::Authenticated { nonce } => {
                let hash = auth_digest(password.unwrap_or_default(), nonce);
                format!("{hash}{command}\r")
            }
            Self::Open | Self::Unrecognized => format!("{command}\r"),
        }
    }
}

/// Computes the PJLink authentication hash: lowercase hex `MD5(password || nonce)`.
///
/// # Examples
///
/// ```
/// use epson_pjlink::protocol::auth_digest;
///
/// assert_eq!(auth_digest("secret", "498e328"), "b4578c28b7d74a8422d32d1d8b605bff");
/// ```
#[must_use]
pub fn auth_digest(password: &str, nonce: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}
