// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control commands.

use crate::command::Command;

/// Command to switch or query lamp power (`POWR`).
///
/// # Examples
///
/// ```
/// use epson_pjlink::command::{Command, PowerCommand};
///
/// assert_eq!(PowerCommand::On.to_pjlink_command(), "%1POWR 1");
/// assert_eq!(PowerCommand::Off.to_pjlink_command(), "%1POWR 0");
/// assert_eq!(PowerCommand::Query.to_pjlink_command(), "%1POWR ?");
///
/// assert_eq!(PowerCommand::set(true), PowerCommand::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerCommand {
    /// Turn the lamp on.
    On,
    /// Put the projector into standby.
    Off,
    /// Ask for the current power status.
    Query,
}

impl PowerCommand {
    /// Creates the command that switches power on or off.
    #[must_use]
    pub const fn set(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl Command for PowerCommand {
    fn name(&self) -> String {
        "POWR".to_string()
    }

    fn payload(&self) -> Option<String> {
        let value = match self {
            Self::On => "1",
            Self::Off => "0",
            Self::Query => "?",
        };
        Some(value.to_string())
    }
}
