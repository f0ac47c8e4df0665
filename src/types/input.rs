// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed input-select and remote-key codes.
//!
//! These are the Epson-specific parameter codes for the `INPT` and `RCKEY`
//! commands. They are sent through the raw pass-through path; the projector
//! state is not affected.

use std::fmt;

/// Video input source.
///
/// # Examples
///
/// ```
/// use epson_pjlink::types::InputSource;
///
/// assert_eq!(InputSource::Hdmi1.code(), "32");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InputSource {
    /// First HDMI input.
    Hdmi1,
    /// Second HDMI input.
    Hdmi2,
}

impl InputSource {
    /// Returns the `INPT` parameter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Hdmi1 => "32",
            Self::Hdmi2 => "33",
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hdmi1 => f.write_str("HDMI 1"),
            Self::Hdmi2 => f.write_str("HDMI 2"),
        }
    }
}

/// Remote-control key for menu navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RemoteKey {
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Confirm.
    Enter,
    /// Open the on-screen menu.
    Menu,
    /// Back / escape.
    Esc,
}

impl RemoteKey {
    /// Returns the `RCKEY` parameter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Up => "38",
            Self::Down => "39",
            Self::Left => "3A",
            Self::Right => "3B",
            Self::Enter => "3C",
            Self::Menu => "3D",
            Self::Esc => "3E",
        }
    }
}
