// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that report state changes.

use crate::event::StateUpdate;
use crate::subscription::SubscriptionId;

/// Trait for types that support state-change subscriptions.
///
/// # Examples
///
/// ```no_run
/// use epson_pjlink::{DeviceConfig, Projector};
/// use epson_pjlink::subscription::Subscribable;
///
/// let projector = Projector::new(DeviceConfig::new("Living Room", "192.168.1.20"));
///
/// let sub_id = projector.on_state_changed(|identifier, update| {
///     println!("{identifier} is now {}", update.state);
/// });
///
/// projector.unsubscribe(sub_id);
/// ```
pub trait Subscribable {
    /// Subscribes to power state transitions.
    ///
    /// The callback receives the projector identifier and the changed
    /// attributes. It is only called when the state actually changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &StateUpdate) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
