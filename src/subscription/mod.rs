// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for projector state changes.
//!
//! Each [`Projector`](crate::Projector) owns a [`CallbackRegistry`]. When a
//! refresh observes a new power state, every registered callback is called
//! synchronously, in subscription order, before the refresh returns.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches changes
//! - [`Subscribable`] - Trait for types that support subscriptions

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
