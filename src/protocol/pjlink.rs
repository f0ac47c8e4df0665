// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport for PJLink projectors.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::ProtocolError;
use crate::protocol::auth::Greeting;
use crate::protocol::{CommandResponse, Protocol};

/// Size of the buffer used for the greeting and for the reply.
const READ_BUFFER_SIZE: usize = 128;

/// Reply sent by the projector when the authentication hash is wrong.
const AUTH_ERROR_REPLY: &str = "PJLINK ERRA";

// ============================================================================
// PjLinkConfig - Connection parameters for one projector
// ============================================================================

/// Configuration for a PJLink connection.
///
/// # Examples
///
/// ```
/// use epson_pjlink::protocol::PjLinkConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = PjLinkConfig::new("192.168.1.20");
/// assert_eq!(config.port(), 4352);
///
/// // With all options
/// let config = PjLinkConfig::new("192.168.1.20")
///     .with_port(14352)
///     .with_password("secret")
///     .with_connect_timeout(Duration::from_secs(1))
///     .with_read_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct PjLinkConfig {
    host: String,
    port: u16,
    password: Option<String>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl PjLinkConfig {
    /// Default PJLink port.
    pub const DEFAULT_PORT: u16 = 4352;
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
    /// Default timeout for each read.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);

    /// Creates a new configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the projector
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            password: None,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the PJLink password. An empty password means none.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the timeout applied to each read.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the password if set.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Creates a `PjLinkClient` from this configuration.
    #[must_use]
    pub fn into_client(self) -> PjLinkClient {
        PjLinkClient { config: self }
    }
}

// ============================================================================
// PjLinkClient - One TCP exchange per command
// ============================================================================

/// PJLink client performing one connect/write/read/close exchange per command.
///
/// The socket is always shut down before `send_raw` returns, whether the
/// exchange succeeded or not.
///
/// # Examples
///
/// ```no_run
/// use epson_pjlink::protocol::{PjLinkClient, Protocol};
///
/// # async fn example() -> Result<(), epson_pjlink::ProtocolError> {
/// let client = PjLinkClient::new("192.168.1.20");
/// let response = client.send_raw("%1POWR ?").await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PjLinkClient {
    config: PjLinkConfig,
}

impl PjLinkClient {
    /// Creates a client for the specified host with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        PjLinkConfig::new(host).into_client()
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn config(&self) -> &PjLinkConfig {
        &self.config
    }

    async fn connect(&self) -> Result<TcpStream, ProtocolError> {
        let host = self.config.host();
        let port = self.config.port();
        let timeout = self.config.connect_timeout();

        tokio::time::timeout(timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| ProtocolError::Timeout(millis(timeout)))?
            .map_err(|e| ProtocolError::ConnectionFailed(format!("{host}:{port}: {e}")))
    }

    /// Runs the greeting, write and reply steps on an open connection.
    async fn converse(
        &self,
        stream: &mut TcpStream,
        command: &str,
    ) -> Result<CommandResponse, ProtocolError> {
        let mut buffer = [0u8; READ_BUFFER_SIZE];

        let len = self.read_frame(stream, &mut buffer).await?;
        let greeting = Greeting::parse(decode(&buffer[..len])?);
        tracing::trace!(host = %self.config.host(), ?greeting, "Received PJLink greeting");

        let frame = greeting.frame(command, self.config.password());
        stream.write_all(frame.as_bytes()).await?;
        stream.flush().await?;

        let len = self.read_frame(stream, &mut buffer).await?;
        let reply = decode(&buffer[..len])?.trim();

        if greeting.is_challenge() && reply == AUTH_ERROR_REPLY {
            return Err(ProtocolError::AuthenticationFailed);
        }

        Ok(CommandResponse::new(reply.to_string()))
    }

    async fn read_frame(
        &self,
        stream: &mut TcpStream,
        buffer: &mut [u8],
    ) -> Result<usize, ProtocolError> {
        let timeout = self.config.read_timeout();
        let len = tokio::time::timeout(timeout, stream.read(buffer))
            .await
            .map_err(|_| ProtocolError::Timeout(millis(timeout)))??;

        if len == 0 {
            return Err(ProtocolError::ConnectionFailed(
                "connection closed by projector".to_string(),
            ));
        }
        Ok(len)
    }
}

impl Protocol for PjLinkClient {
    async fn send_raw(&self, command: &str) -> Result<CommandResponse, ProtocolError> {
        let mut stream = self.connect().await?;

        let result = self.converse(&mut stream, command).await;

        if let Err(e) = stream.shutdown().await {
            tracing::debug!(
                host = %self.config.host(),
                error = %e,
                "PJLink socket shutdown failed"
            );
        }
        drop(stream);

        result
    }
}

fn decode(bytes: &[u8]) -> Result<&str, ProtocolError> {
    std::str::from_utf8(bytes).map_err(|e| ProtocolError::MalformedReply(e.to_string()))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
