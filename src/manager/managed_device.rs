// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Internal projector wrapper for the projector manager.

use crate::device::Projector;
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::Protocol;
use crate::subscription::{Subscribable, SubscriptionId};

/// A projector owned by the manager, together with the subscription that
/// forwards its state changes onto the manager's event bus.
pub(crate) struct ManagedProjector<P: Protocol> {
    projector: Projector<P>,
    forwarding: SubscriptionId,
}

impl<P: Protocol> ManagedProjector<P> {
    /// Wraps a projector and forwards its state changes to `event_bus`.
    pub fn new(projector: Projector<P>, event_bus: &EventBus) -> Self {
        let event_bus = event_bus.clone();
        let forwarding = projector.on_state_changed(move |identifier, update| {
            event_bus.publish(DeviceEvent::state_changed(identifier, *update));
        });

        Self {
            projector,
            forwarding,
        }
    }

    pub fn projector(&self) -> &Projector<P> {
        &self.projector
    }

    /// Stops polling and detaches from the event bus.
    pub fn shutdown(&self) {
        self.projector.stop_polling();
        self.projector.unsubscribe(self.forwarding);
    }
}
