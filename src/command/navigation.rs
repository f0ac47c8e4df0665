// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input selection and remote-key commands.
//!
//! Both are pass-through helpers: they render a fixed body and are sent like
//! any raw command, without touching the projector state.

use crate::command::Command;
use crate::types::{InputSource, RemoteKey};

/// Command to select a video input (`INPT`).
///
/// # Examples
///
/// ```
/// use epson_pjlink::command::{Command, InputCommand};
/// use epson_pjlink::types::InputSource;
///
/// let cmd = InputCommand(InputSource::Hdmi2);
/// assert_eq!(cmd.to_pjlink_command(), "%1INPT 33");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputCommand(pub InputSource);

impl Command for InputCommand {
    fn name(&self) -> String {
        "INPT".to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(self.0.code().to_string())
    }
}

/// Command to press a remote-control key (`RCKEY`).
///
/// # Examples
///
/// ```
/// use epson_pjlink::command::{Command, RemoteKeyCommand};
/// use epson_pjlink::types::RemoteKey;
///
/// assert_eq!(RemoteKeyCommand(RemoteKey::Up).to_pjlink_command(), "%1RCKEY 38");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteKeyCommand(pub RemoteKey);

impl Command for RemoteKeyCommand {
    fn name(&self) -> String {
        "RCKEY".to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(self.0.code().to_string())
    }
}
