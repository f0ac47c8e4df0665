// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for projector control.
//!
//! # Types
//!
//! - [`PowerState`] - Last-known power state (On/Standby/Off/Unknown)
//! - [`InputSource`] - Video input selectable through `INPT`
//! - [`RemoteKey`] - Menu navigation key sent through `RCKEY`

mod input;
mod power;

pub use input::{InputSource, RemoteKey};
pub use power::PowerState;
