// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a projector.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Last-known power state of a projector.
///
/// A freshly created [`Projector`](crate::Projector) always starts in
/// [`PowerState::Unknown`]. Refreshing the state only ever produces
/// [`PowerState::On`] or [`PowerState::Standby`]: Epson projectors answer the
/// power query with `POWR=1` when lit and never report a hard off.
/// [`PowerState::Off`] is kept for hubs that map inputs onto it.
///
/// # Examples
///
/// ```
/// use epson_pjlink::types::PowerState;
///
/// assert_eq!(PowerState::default(), PowerState::Unknown);
/// assert_eq!(PowerState::Standby.as_str(), "STANDBY");
/// assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerState {
    /// Projector is fully off.
    Off,
    /// Lamp is lit.
    On,
    /// Projector is in standby (or could not be reached).
    Standby,
    /// No state has been observed yet.
    #[default]
    Unknown,
}

impl PowerState {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Standby => "STANDBY",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` if the lamp is lit.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Decodes the reply to a power query.
    ///
    /// A reply carrying power register value 1 means [`PowerState::On`].
    /// Anything else, including no reply at all, means
    /// [`PowerState::Standby`]. An unreachable projector is therefore
    /// indistinguishable from one that confirmed it is in standby.
    ///
    /// # Examples
    ///
    /// ```
    /// use epson_pjlink::types::PowerState;
    ///
    /// assert_eq!(PowerState::from_query_reply(Some("%1POWR=1")), PowerState::On);
    /// assert_eq!(PowerState::from_query_reply(Some("%1POWR=0")), PowerState::Standby);
    /// assert_eq!(PowerState::from_query_reply(None), PowerState::Standby);
    /// ```
    #[must_use]
    pub fn from_query_reply(reply: Option<&str>) -> Self {
        match reply {
            Some(body) if body.contains(POWER_ON_MARKER) => Self::On,
            _ => Self::Standby,
        }
    }
}

/// Substring of a power query reply that means the lamp is lit.
const POWER_ON_MARKER: &str = "POWR=1";

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "ON" => Ok(Self::On),
            "STANDBY" => Ok(Self::Standby),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unknown() {
        assert_eq!(PowerState::default(), PowerState::Unknown);
    }

    #[test]
    fn as_str_matches_display() {
        for state in [
            PowerState::Off,
            PowerState::On,
            PowerState::Standby,
            PowerState::Unknown,
        ] {
            assert_eq!(state.to_string(), state.as_str());
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("standby".parse::<PowerState>().unwrap(), PowerState::Standby);
        assert_eq!("On".parse::<PowerState>().unwrap(), PowerState::On);
    }

    #[test]
    fn from_str_invalid() {
        let result = "warming".parse::<PowerState>();
        assert!(matches!(result, Err(ValueError::InvalidPowerState(_))));
    }

    #[test]
    fn decode_lit_reply() {
        assert_eq!(
            PowerState::from_query_reply(Some("%1POWR=1")),
            PowerState::On
        );
    }

    #[test]
    fn decode_standby_reply() {
        assert_eq!(
            PowerState::from_query_reply(Some("%1POWR=0")),
            PowerState::Standby
        );
    }

    #[test]
    fn decode_cooling_and_warming_as_standby() {
        assert_eq!(
            PowerState::from_query_reply(Some("%1POWR=2")),
            PowerState::Standby
        );
        assert_eq!(
            PowerState::from_query_reply(Some("%1POWR=3")),
            PowerState::Standby
        );
    }

    #[test]
    fn decode_error_reply_as_standby() {
        assert_eq!(
            PowerState::from_query_reply(Some("%1POWR=ERR3")),
            PowerState::Standby
        );
    }

    #[test]
    fn decode_missing_reply_as_standby() {
        assert_eq!(PowerState::from_query_reply(None), PowerState::Standby);
    }

    #[test]
    fn decode_never_yields_off_or_unknown() {
        for reply in [None, Some(""), Some("%1POWR=0"), Some("%1POWR=1"), Some("garbage")] {
            let state = PowerState::from_query_reply(reply);
            assert!(matches!(state, PowerState::On | PowerState::Standby));
        }
    }

    #[test]
    fn serializes_upper_case() {
        let json = serde_json::to_string(&PowerState::Standby).unwrap();
        assert_eq!(json, "\"STANDBY\"");
    }
}
