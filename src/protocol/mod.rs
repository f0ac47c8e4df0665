// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementation for communicating with PJLink projectors.
//!
//! PJLink is not a persistent protocol here: every command costs one TCP
//! connection, an optional authentication challenge, one write, one read and
//! a teardown. [`PjLinkClient`] performs exactly one such exchange per call.
//!
//! The [`Protocol`] trait is the seam between the transport and the
//! [`Projector`](crate::Projector), so tests can substitute an in-memory
//! double for the TCP client.

mod auth;
mod pjlink;

pub use auth::{Greeting, auth_digest};
pub use pjlink::{PjLinkClient, PjLinkConfig};

use std::future::Future;

use crate::error::ProtocolError;

/// Reply to a single PJLink command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    /// The reply text with surrounding whitespace removed.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the reply text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the response and returns the reply text.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }

    /// Returns `true` if the projector answered with a PJLink error code
    /// (`ERR1` to `ERR4`).
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.body
            .split_once('=')
            .is_some_and(|(_, value)| value.starts_with("ERR"))
    }
}

/// Trait for transports that can carry one PJLink exchange.
///
/// Implementations perform one complete round trip per call and must be
/// safe to share between the polling task and user-issued commands.
pub trait Protocol: Send + Sync + 'static {
    /// Sends a command body to the projector and returns its reply.
    ///
    /// # Arguments
    ///
    /// * `command` - The command body without terminator
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if connecting, writing or reading fails.
    fn send_raw(
        &self,
        command: &str,
    ) -> impl Future<Output = Result<CommandResponse, ProtocolError>> + Send;
}
