// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::types::PowerState;

use super::StateUpdate;

/// Events emitted by the projector manager.
///
/// These events notify subscribers about projectors being added or removed
/// and about observed power state transitions. Every event carries the
/// identifier of the projector it concerns.
///
/// # Examples
///
/// ```
/// use epson_pjlink::event::{DeviceEvent, StateUpdate};
/// use epson_pjlink::types::PowerState;
///
/// let added = DeviceEvent::device_added("living-room");
/// assert!(added.is_lifecycle());
///
/// let changed = DeviceEvent::state_changed("living-room", StateUpdate::new(PowerState::On));
/// assert_eq!(changed.identifier(), "living-room");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeviceEvent {
    /// A projector was added to the manager.
    DeviceAdded {
        /// The identifier of the added projector.
        identifier: String,
    },

    /// A projector was removed from the manager.
    DeviceRemoved {
        /// The identifier of the removed projector.
        identifier: String,
    },

    /// A projector's power state changed.
    StateChanged {
        /// The identifier of the projector.
        identifier: String,
        /// The changed attributes.
        update: StateUpdate,
    },
}

impl DeviceEvent {
    /// Returns the identifier of the projector this event concerns.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::DeviceAdded { identifier }
            | Self::DeviceRemoved { identifier }
            | Self::StateChanged { identifier, .. } => identifier,
        }
    }

    /// Returns `true` if this is a lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns the new power state if this is a state change event.
    #[must_use]
    pub fn power_state(&self) -> Option<PowerState> {
        match self {
            Self::StateChanged { update, .. } => Some(update.state),
            _ => None,
        }
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(identifier: impl Into<String>) -> Self {
        Self::DeviceAdded {
            identifier: identifier.into(),
        }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(identifier: impl Into<String>) -> Self {
        Self::DeviceRemoved {
            identifier: identifier.into(),
        }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(identifier: impl Into<String>, update: StateUpdate) -> Self {
        Self::StateChanged {
            identifier: identifier.into(),
            update,
        }
    }
}
