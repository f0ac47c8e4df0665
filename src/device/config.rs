// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types for a projector.

use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ValueError;
use crate::protocol::PjLinkConfig;

/// Configuration of one projector, as handed over by the configuration store.
///
/// The `identifier` is the projector's identity. [`DeviceConfig::new`]
/// derives it from the display name: whitespace runs become `-`, letters
/// are lowercased and everything except ASCII letters, digits and `-` is
/// dropped.
///
/// # Examples
///
/// ```
/// use epson_pjlink::DeviceConfig;
///
/// let config = DeviceConfig::new("Living Room", "192.168.1.20")
///     .with_password("secret");
///
/// assert_eq!(config.identifier, "living-room");
/// assert_eq!(config.password.as_deref(), Some("secret"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceConfig {
    /// Stable identity of the projector.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// IP address of the projector.
    pub address: String,
    /// Optional PJLink password.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub password: Option<String>,
}

impl DeviceConfig {
    /// Creates a configuration, deriving the identifier from `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            identifier: identifier_from_name(&name),
            name,
            address: address.into(),
            password: None,
        }
    }

    /// Overrides the derived identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Sets the PJLink password. An empty password means none.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the name is blank, the identifier is empty or
    /// contains characters other than ASCII letters, digits, `-` and `_`, or
    /// the address is not an IP address.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.name.trim().is_empty() {
            return Err(ValueError::EmptyName);
        }

        let valid_identifier = !self.identifier.is_empty()
            && self
                .identifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_identifier {
            return Err(ValueError::InvalidIdentifier(self.identifier.clone()));
        }

        self.address
            .parse::<IpAddr>()
            .map_err(|_| ValueError::InvalidAddress(self.address.clone()))?;

        Ok(())
    }

    /// Builds the transport configuration for this projector.
    #[must_use]
    pub fn pjlink_config(&self) -> PjLinkConfig {
        let config = PjLinkConfig::new(self.address.clone());
        match &self.password {
            Some(password) => config.with_password(password.clone()),
            None => config,
        }
    }
}

/// Derives a projector identifier from its display name.
///
/// # Examples
///
/// ```
/// use epson_pjlink::device::identifier_from_name;
///
/// assert_eq!(identifier_from_name("Home Cinema  EH-TW9400"), "home-cinema-eh-tw9400");
/// ```
#[must_use]
pub fn identifier_from_name(name: &str) -> String {
    let mut identifier = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                identifier.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        for lower in c.to_lowercase() {
            if lower.is_ascii_alphanumeric() || lower == '-' {
                identifier.push(lower);
            }
        }
    }

    identifier
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let password = Option::<String>::deserialize(deserializer)?;
    Ok(password.filter(|p| !p.is_empty()))
}

/// Timing of the background refresh loop.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use epson_pjlink::PollingConfig;
///
/// let polling = PollingConfig::default();
/// assert_eq!(polling.interval(), Duration::from_secs(15));
///
/// let fast = PollingConfig::new().with_interval(Duration::from_secs(5));
/// assert_eq!(fast.interval(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    interval: Duration,
    settle_delay: Duration,
}

impl PollingConfig {
    /// Default time between two refreshes.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
    /// Default wait between a power command and the refresh confirming it.
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

    /// Creates a polling configuration with default timings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time between two refreshes.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the wait between a power command and its confirming refresh.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Returns the time between two refreshes.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the settle delay.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
        }
    }
}
