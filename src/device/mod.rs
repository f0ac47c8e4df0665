// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-projector runtime object.
//!
//! A [`Projector`] wraps one transport and adds three things on top of it:
//!
//! - a command lock, so the poller and user commands never overlap on the wire
//! - the last known [`PowerState`], refreshed by [`Projector::update`]
//! - a background poller started by [`Projector::start_polling`]
//!
//! Network faults never escape a `Projector`. A failed exchange is logged and
//! reported as `None`; a failed power query reads as [`PowerState::Standby`].
//!
//! # Examples
//!
//! ```no_run
//! use epson_pjlink::{DeviceConfig, Projector};
//! use epson_pjlink::subscription::Subscribable;
//!
//! # async fn example() {
//! let config = DeviceConfig::new("Living Room", "192.168.1.20").with_password("secret");
//! let projector = Projector::new(config);
//!
//! projector.on_state_changed(|identifier, update| {
//!     println!("{identifier} is now {}", update.state);
//! });
//!
//! projector.start_polling();
//! let state = projector.switch_power(true).await;
//! println!("confirmed: {state}");
//! projector.stop_polling();
//! # }
//! ```

mod config;

pub use config::{DeviceConfig, PollingConfig, identifier_from_name};

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::command::{Command, InputCommand, PowerCommand, RemoteKeyCommand};
use crate::error::ProtocolError;
use crate::event::StateUpdate;
use crate::protocol::{CommandResponse, PjLinkClient, Protocol};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{InputSource, PowerState, RemoteKey};

/// A PJLink projector with serialized commands, cached power state and a
/// background poller.
///
/// `Projector` is cheap to clone; clones share the same lock, state and
/// subscriptions.
///
/// # Type Parameter
///
/// `P` is the transport. It defaults to [`PjLinkClient`]; tests and custom
/// transports use [`Projector::from_parts`].
pub struct Projector<P: Protocol = PjLinkClient> {
    inner: Arc<Inner<P>>,
}

struct Inner<P> {
    config: DeviceConfig,
    polling: PollingConfig,
    protocol: P,
    command_lock: Mutex<()>,
    state: RwLock<PowerState>,
    poller: RwLock<PollerState>,
    callbacks: CallbackRegistry,
}

impl Projector<PjLinkClient> {
    /// Creates a projector talking PJLink over TCP with default polling.
    #[must_use]
    pub fn new(config: DeviceConfig) -> Self {
        Self::with_polling(config, PollingConfig::default())
    }

    /// Creates a projector talking PJLink over TCP with custom polling.
    #[must_use]
    pub fn with_polling(config: DeviceConfig, polling: PollingConfig) -> Self {
        let client = config.pjlink_config().into_client();
        Self::from_parts(config, client, polling)
    }
}

impl<P: Protocol> Projector<P> {
    /// Creates a projector over an arbitrary transport.
    ///
    /// The state starts as [`PowerState::Unknown`] and polling is stopped.
    #[must_use]
    pub fn from_parts(config: DeviceConfig, protocol: P, polling: PollingConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                polling,
                protocol,
                command_lock: Mutex::new(()),
                state: RwLock::new(PowerState::Unknown),
                poller: RwLock::new(PollerState::default()),
                callbacks: CallbackRegistry::new(),
            }),
        }
    }

    /// Returns the projector identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.inner.config.identifier
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Returns the configuration this projector was built from.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    /// Returns the polling configuration.
    #[must_use]
    pub fn polling_config(&self) -> &PollingConfig {
        &self.inner.polling
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.inner.protocol
    }

    /// Returns the last known power state.
    #[must_use]
    pub fn state(&self) -> PowerState {
        *self.inner.state.read()
    }

    /// Returns `true` while the background poller is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner.poller.read().running
    }

    // ========== Command Exchange ==========

    /// Runs one exchange while holding the command lock.
    async fn exchange(&self, command: &str) -> Option<CommandResponse> {
        let _serial = self.inner.command_lock.lock().await;
        self.transact(command).await
    }

    /// Runs one exchange. The caller must hold the command lock.
    async fn transact(&self, command: &str) -> Option<CommandResponse> {
        let device = &self.inner.config.name;

        match self.inner.protocol.send_raw(command).await {
            Ok(response) => {
                tracing::debug!(
                    device = %device,
                    command,
                    reply = response.body(),
                    "Exchange completed"
                );
                if response.is_error() {
                    tracing::debug!(device = %device, command, "Projector reported an error code");
                }
                Some(response)
            }
            Err(ProtocolError::AuthenticationFailed) => {
                tracing::warn!(
                    device = %device,
                    command,
                    "Projector rejected the authentication hash, check the configured password"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    device = %device,
                    command,
                    error = %e,
                    "No response from projector"
                );
                None
            }
        }
    }

    /// Sends a typed command through the command lock.
    ///
    /// Returns `None` if the exchange failed. The cached state is untouched.
    pub async fn send_command<C: Command + ?Sized>(
        &self,
        command: &C,
    ) -> Option<CommandResponse> {
        self.exchange(&command.to_pjlink_command()).await
    }

    /// Sends a command body verbatim through the command lock.
    ///
    /// Returns `None` if the exchange failed. The cached state is untouched.
    pub async fn send_raw(&self, command: &str) -> Option<CommandResponse> {
        self.exchange(command).await
    }

    // ========== Power Control ==========

    /// Sends a power on or off command.
    ///
    /// The cached state is not changed; call [`update`](Self::update)
    /// afterwards, or use [`switch_power`](Self::switch_power).
    pub async fn set_power(&self, on: bool) -> Option<CommandResponse> {
        self.send_command(&PowerCommand::set(on)).await
    }

    /// Sends the power on command.
    pub async fn power_on(&self) -> Option<CommandResponse> {
        self.set_power(true).await
    }

    /// Sends the power off command.
    pub async fn power_off(&self) -> Option<CommandResponse> {
        self.set_power(false).await
    }

    /// Sends a power command, waits for the projector to settle and then
    /// refreshes the cached state.
    ///
    /// Returns the state observed by the refresh.
    pub async fn switch_power(&self, on: bool) -> PowerState {
        self.set_power(on).await;
        tokio::time::sleep(self.inner.polling.settle_delay()).await;
        self.update().await
    }

    // ========== Pass-through ==========

    /// Selects a video input.
    pub async fn select_input(&self, input: InputSource) -> Option<CommandResponse> {
        self.send_command(&InputCommand(input)).await
    }

    /// Presses a remote-control key.
    pub async fn press_key(&self, key: RemoteKey) -> Option<CommandResponse> {
        self.send_command(&RemoteKeyCommand(key)).await
    }

    // ========== State ==========

    /// Queries the power state and stores it.
    ///
    /// Subscribers are notified, in subscription order and before this
    /// returns, only if the state differs from the previously held one. A
    /// failed query yields [`PowerState::Standby`].
    pub async fn update(&self) -> PowerState {
        let _serial = self.inner.command_lock.lock().await;

        let reply = self
            .transact(&PowerCommand::Query.to_pjlink_command())
            .await;
        let new_state = PowerState::from_query_reply(reply.as_ref().map(CommandResponse::body));

        let previous = {
            let mut state = self.inner.state.write();
            std::mem::replace(&mut *state, new_state)
        };

        if previous != new_state {
            tracing::debug!(
                device = %self.inner.config.name,
                from = %previous,
                to = %new_state,
                "Power state changed"
            );
            self.inner
                .callbacks
                .dispatch(&self.inner.config.identifier, &StateUpdate::new(new_state));
        }

        new_state
    }

    // ========== Polling ==========

    /// Starts the background poller.
    ///
    /// Returns `false` if it was already running. Must be called from within
    /// a tokio runtime.
    pub fn start_polling(&self) -> bool {
        let generation = {
            let mut poller = self.inner.poller.write();
            if poller.running {
                return false;
            }
            poller.running = true;
            poller.generation += 1;
            poller.generation
        };

        tokio::spawn(poll_loop(Arc::downgrade(&self.inner), generation));
        true
    }

    /// Asks the background poller to stop.
    ///
    /// The loop exits the next time it checks the flag; an exchange already
    /// in progress completes. Dropping the last handle to a projector stops
    /// its poller the same way.
    pub fn stop_polling(&self) {
        self.inner.poller.write().running = false;
    }

    fn polling_active(&self, generation: u64) -> bool {
        let poller = self.inner.poller.read();
        poller.running && poller.generation == generation
    }
}

/// Running flag and generation of the background poller.
///
/// Both change under one lock, so a loop from an earlier generation can never
/// observe the flag of a newer one.
#[derive(Debug, Default, Clone, Copy)]
struct PollerState {
    running: bool,
    generation: u64,
}

/// Background refresh loop. Holds only a weak reference between iterations,
/// so it ends once every `Projector` handle is gone.
async fn poll_loop<P: Protocol>(inner: Weak<Inner<P>>, generation: u64) {
    let Some(name) = inner.upgrade().map(|inner| inner.config.name.clone()) else {
        return;
    };
    tracing::debug!(device = %name, generation, "Polling started");

    loop {
        let Some(inner) = inner.upgrade() else {
            tracing::debug!(device = %name, generation, "Projector dropped");
            break;
        };
        let projector = Projector { inner };
        if !projector.polling_active(generation) {
            break;
        }

        projector.update().await;
        let interval = projector.inner.polling.interval();
        drop(projector);

        tokio::time::sleep(interval).await;
    }

    tracing::debug!(device = %name, generation, "Polling stopped");
}

impl<P: Protocol> Clone for Projector<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Protocol> std::fmt::Debug for Projector<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("identifier", &self.inner.config.identifier)
            .field("address", &self.inner.config.address)
            .field("state", &self.state())
            .field("is_polling", &self.is_polling())
            .finish_non_exhaustive()
    }
}

impl<P: Protocol> Subscribable for Projector<P> {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &StateUpdate) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}
