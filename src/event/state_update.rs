// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Payload of a projector state change.

use crate::types::PowerState;

/// Attributes that changed on a projector.
///
/// Serializes as `{"state": "ON"}`, the attribute map the hub's entity
/// layer expects.
///
/// # Examples
///
/// ```
/// use epson_pjlink::event::StateUpdate;
/// use epson_pjlink::types::PowerState;
///
/// let update = StateUpdate::new(PowerState::On);
/// assert_eq!(update.state, PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateUpdate {
    /// The newly observed power state.
    pub state: PowerState,
}

impl StateUpdate {
    /// Creates an update carrying a new power state.
    #[must_use]
    pub const fn new(state: PowerState) -> Self {
        Self { state }
    }
}
