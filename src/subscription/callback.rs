// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for projector state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::event::StateUpdate;

/// Unique identifier for a subscription.
///
/// Returned when creating a subscription and used to unsubscribe later.
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback receiving the projector identifier and the changed attributes.
type StateChangedCallback = Arc<dyn Fn(&str, &StateUpdate) + Send + Sync>;

/// Registry for projector state-change callbacks.
///
/// Callbacks are kept in registration order and invoked synchronously, in
/// that order, by [`dispatch`](Self::dispatch). The callback list is
/// snapshotted before invoking, so a callback may subscribe or unsubscribe
/// without deadlocking; such changes apply from the next dispatch on.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_changed_callbacks: RwLock<Vec<(SubscriptionId, StateChangedCallback)>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for power state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &StateUpdate) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .push((id, Arc::new(callback)));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.state_changed_callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(sub_id, _)| *sub_id != id);
        callbacks.len() != before
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_changed_callbacks.write().clear();
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state_changed_callbacks.read().is_empty()
    }

    /// Dispatches a state change to every callback in subscription order.
    pub fn dispatch(&self, identifier: &str, update: &StateUpdate) {
        let callbacks: Vec<StateChangedCallback> = self
            .state_changed_callbacks
            .read()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(identifier, update);
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("state_changed_callbacks", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscription_ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_state_changed(|_, _| {});
        let b = registry.on_state_changed(|_, _| {});
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn dispatch_passes_identifier_and_update() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        registry.on_state_changed(move |identifier, update| {
            seen_clone.lock().push((identifier.to_string(), update.state));
        });

        registry.dispatch("hall", &StateUpdate::new(PowerState::On));

        assert_eq!(*seen.lock(), vec![("hall".to_string(), PowerState::On)]);
    }

    #[test]
    fn dispatch_follows_subscription_order() {
        let registry = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..5 {
            let order = Arc::clone(&order);
            registry.on_state_changed(move |_, _| order.lock().push(n));
        }

        registry.dispatch("hall", &StateUpdate::new(PowerState::Standby));

        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let id = registry.on_state_changed(move |_, _| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));

        registry.dispatch("hall", &StateUpdate::new(PowerState::On));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let count = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let registry_clone = Arc::clone(&registry);
        let count_clone = Arc::clone(&count);
        let own_id_clone = Arc::clone(&own_id);
        let id = registry.on_state_changed(move |_, _| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *own_id_clone.lock() {
                registry_clone.unsubscribe(id);
            }
        });
        *own_id.lock() = Some(id);

        registry.dispatch("hall", &StateUpdate::new(PowerState::On));
        registry.dispatch("hall", &StateUpdate::new(PowerState::Standby));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let registry = CallbackRegistry::new();
        registry.on_state_changed(|_, _| {});
        registry.on_state_changed(|_, _| {});
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(7).to_string(), "Sub(7)");
        assert_eq!(SubscriptionId::new(7).value(), 7);
    }
}
