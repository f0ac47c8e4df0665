// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `epson_pjlink` library.
//!
//! Network faults never leave a [`Projector`](crate::Projector): they are
//! represented here as [`ProtocolError`] inside the transport, logged, and
//! collapsed into an absent response. The remaining variants cover
//! configuration validation and the device manager.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Device was not found in the manager.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// The device address is not a valid IP address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device name is empty.
    #[error("device name must not be empty")]
    EmptyName,

    /// The device identifier is empty or contains forbidden characters.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Errors raised by a single PJLink exchange.
///
/// These are never returned to users of [`Projector`](crate::Projector);
/// they only exist so the transport can report *why* an exchange failed
/// before the failure is collapsed into "no response".
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection to the device failed (refused, unreachable).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connecting or reading timed out.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// I/O failure on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device sent bytes that are not a valid PJLink frame.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// The device rejected the authentication hash (`PJLINK ERRA`).
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
