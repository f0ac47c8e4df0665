// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event types for projector state changes.
//!
//! A single [`Projector`](crate::Projector) reports transitions through
//! callbacks (see [`subscription`](crate::subscription)) carrying a
//! [`StateUpdate`]. The [`ProjectorManager`](crate::manager::ProjectorManager)
//! republishes them, together with lifecycle events, as [`DeviceEvent`]s on
//! an [`EventBus`] backed by tokio's broadcast channel.
//!
//! # Examples
//!
//! ```
//! use epson_pjlink::event::{DeviceEvent, EventBus, StateUpdate};
//! use epson_pjlink::types::PowerState;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::state_changed("hall", StateUpdate::new(PowerState::On)));
//! ```

mod device_event;
mod event_bus;
mod state_update;

pub use device_event::DeviceEvent;
pub use event_bus::EventBus;
pub use state_update::StateUpdate;
