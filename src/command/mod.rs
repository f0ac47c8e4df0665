// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PJLink command definitions.
//!
//! This module maps logical operations onto the exact PJLink command bodies
//! written to the wire. The carriage-return terminator and the optional
//! authentication prefix are added by the transport, not here.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Example |
//! |-------------|---------|---------|
//! | [`PowerCommand`] | Switch or query lamp power | `%1POWR 1` |
//! | [`InputCommand`] | Select a video input | `%1INPT 32` |
//! | [`RemoteKeyCommand`] | Press a menu navigation key | `%1RCKEY 3D` |
//! | [`RawCommand`] | Arbitrary pass-through | anything |
//!
//! # Command Structure
//!
//! A class 1 PJLink command is `%1`, a four-to-five letter name, a space and
//! a parameter. Queries use `?` as the parameter.
//!
//! # Examples
//!
//! ```
//! use epson_pjlink::command::{Command, PowerCommand, RawCommand};
//!
//! assert_eq!(PowerCommand::On.to_pjlink_command(), "%1POWR 1");
//! assert_eq!(PowerCommand::Query.to_pjlink_command(), "%1POWR ?");
//!
//! // Raw commands are sent exactly as given.
//! let raw = RawCommand::new("%1LAMP ?");
//! assert_eq!(raw.to_pjlink_command(), "%1LAMP ?");
//! ```

mod navigation;
mod power;

pub use navigation::{InputCommand, RemoteKeyCommand};
pub use power::PowerCommand;

/// Prefix of every class 1 PJLink command.
pub const CLASS_1_PREFIX: &str = "%1";

/// A command that can be sent to a PJLink projector.
pub trait Command {
    /// Returns the command name without the class prefix.
    ///
    /// For example, `"POWR"`, `"INPT"`, `"RCKEY"`.
    fn name(&self) -> String;

    /// Returns the command parameter, if any.
    fn payload(&self) -> Option<String>;

    /// Returns the full command body as written to the wire.
    ///
    /// Format: `%1<name> <payload>` or `%1<name>` if no payload.
    fn to_pjlink_command(&self) -> String {
        match self.payload() {
            Some(p) => format!("{CLASS_1_PREFIX}{} {p}", self.name()),
            None => format!("{CLASS_1_PREFIX}{}", self.name()),
        }
    }
}

/// An arbitrary command body passed through unchanged.
///
/// No syntax checking is performed; the caller is responsible for sending
/// something the projector understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawCommand(String);

impl RawCommand {
    /// Wraps a raw command body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Returns the raw command body.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RawCommand {
    /// Splits the body into name and parameter, skipping a `%<class>` prefix.
    fn parts(&self) -> (&str, Option<&str>) {
        let body = self.0.trim_start();
        let body = match body.as_bytes() {
            [b'%', class, ..] if class.is_ascii_digit() => &body[2..],
            _ => body,
        };
        match body.split_once(char::is_whitespace) {
            Some((name, rest)) => {
                let rest = rest.trim();
                (name, (!rest.is_empty()).then_some(rest))
            }
            None => (body.trim_end(), None),
        }
    }
}

impl Command for RawCommand {
    /// Returns the name token of the body, e.g. `"LAMP"` for `%1LAMP ?`.
    /// Empty if the body is blank.
    fn name(&self) -> String {
        self.parts().0.to_string()
    }

    fn payload(&self) -> Option<String> {
        self.parts().1.map(str::to_string)
    }

    /// Returns the body exactly as given.

    fn to_pjlink_command(&self) -> String {
        self.0.clone()
    }
}

impl From<&str> for RawCommand {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RawCommand {
    fn from(value: String) -> Self {
        Self(value)
    }
}
