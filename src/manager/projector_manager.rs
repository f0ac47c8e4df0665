// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projector manager owning the live-projector map.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::device::{DeviceConfig, PollingConfig, Projector};
use crate::error::{Error, Result};
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::{CommandResponse, PjLinkClient, Protocol};
use crate::types::PowerState;

use super::managed_device::ManagedProjector;

/// Builds the transport for a newly added projector.
type Connector<P> = Arc<dyn Fn(&DeviceConfig) -> P + Send + Sync>;

/// Manager for a set of projectors, keyed by identifier.
///
/// Adding a projector starts its poller; removing it stops the poller. State
/// changes of every managed projector are republished on one broadcast
/// channel, together with add and remove events.
///
/// # Examples
///
/// ```no_run
/// use epson_pjlink::{DeviceConfig, ProjectorManager};
/// use epson_pjlink::event::DeviceEvent;
///
/// #[tokio::main]
/// async fn main() -> epson_pjlink::Result<()> {
///     let manager = ProjectorManager::new();
///
///     let mut events = manager.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             if let DeviceEvent::StateChanged { identifier, update } = event {
///                 println!("{identifier}: {}", update.state);
///             }
///         }
///     });
///
///     manager
///         .add_device(DeviceConfig::new("Living Room", "192.168.1.20"))
///         .await?;
///     manager.switch_power("living-room", true).await?;
///
///     Ok(())
/// }
/// ```
pub struct ProjectorManager<P: Protocol = PjLinkClient> {
    /// Managed projectors, keyed by identifier.
    devices: Arc<RwLock<HashMap<String, ManagedProjector<P>>>>,
    /// Event bus for broadcasting projector events.
    event_bus: EventBus,
    /// Polling configuration given to new projectors.
    polling: PollingConfig,
    connector: Connector<P>,
}

impl ProjectorManager<PjLinkClient> {
    /// Creates a manager whose projectors talk PJLink over TCP.
    #[must_use]
    pub fn new() -> Self {
        Self::with_connector(|config| config.pjlink_config().into_client())
    }
}

impl Default for ProjectorManager<PjLinkClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Protocol> ProjectorManager<P> {
    /// Creates a manager building each projector's transport with `connector`.
    #[must_use]
    pub fn with_connector<F>(connector: F) -> Self
    where
        F: Fn(&DeviceConfig) -> P + Send + Sync + 'static,
    {
        Self {
            devices: Arc::new(RwLock::new(HashMap::new())),
            event_bus: EventBus::new(),
            polling: PollingConfig::default(),
            connector: Arc::new(connector),
        }
    }

    /// Sets the polling configuration for projectors added from now on.
    #[must_use]
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Sets the capacity of the event channel.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_bus = EventBus::with_capacity(capacity);
        self
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to events of every managed projector.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }

    // =========================================================================
    // Device Management
    // =========================================================================

    fn build(&self, config: DeviceConfig) -> ManagedProjector<P> {
        let protocol = (self.connector)(&config);
        let projector = Projector::from_parts(config, protocol, self.polling);
        ManagedProjector::new(projector, &self.event_bus)
    }

    /// Adds a projector and starts polling it.
    ///
    /// Returns `false` without touching anything if a projector with the
    /// same identifier is already managed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the configuration is invalid.
    pub async fn add_device(&self, config: DeviceConfig) -> Result<bool> {
        config.validate()?;

        let mut devices = self.devices.write().await;
        if devices.contains_key(&config.identifier) {
            return Ok(false);
        }

        let identifier = config.identifier.clone();
        tracing::info!(
            device = %config.name,
            identifier = %identifier,
            address = %config.address,
            "Adding projector"
        );

        let managed = self.build(config);
        let projector = managed.projector().clone();
        devices.insert(identifier.clone(), managed);
        drop(devices);

        self.event_bus.publish(DeviceEvent::device_added(identifier));
        projector.start_polling();

        Ok(true)
    }

    /// Adds a projector, or replaces it if its configuration changed.
    ///
    /// A replaced projector's poller is stopped and the new one starts with
    /// an unknown state. Returns `false` if the identical configuration was
    /// already managed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the configuration is invalid.
    pub async fn add_or_update(&self, config: DeviceConfig) -> Result<bool> {
        config.validate()?;

        let mut devices = self.devices.write().await;
        let replaced = match devices.get(&config.identifier) {
            Some(existing) if existing.projector().config() == &config => return Ok(false),
            Some(existing) => {
                existing.shutdown();
                true
            }
            None => false,
        };

        let identifier = config.identifier.clone();
        if replaced {
            tracing::info!(
                device = %config.name,
                identifier = %identifier,
                "Updating projector configuration"
            );
        } else {
            tracing::info!(
                device = %config.name,
                identifier = %identifier,
                address = %config.address,
                "Adding projector"
            );
        }

        let managed = self.build(config);
        let projector = managed.projector().clone();
        devices.insert(identifier.clone(), managed);
        drop(devices);

        if !replaced {
            self.event_bus.publish(DeviceEvent::device_added(identifier));
        }
        projector.start_polling();

        Ok(true)
    }

    /// Removes a projector, stopping its poller.
    ///
    /// # Returns
    ///
    /// Returns `true` if the projector was found and removed, `false` otherwise.
    pub async fn remove_device(&self, identifier: &str) -> bool {
        let Some(managed) = self.devices.write().await.remove(identifier) else {
            return false;
        };

        managed.shutdown();
        tracing::info!(device = %managed.projector().name(), identifier, "Removed projector");
        self.event_bus.publish(DeviceEvent::device_removed(identifier));

        true
    }

    /// Removes every projector.
    pub async fn clear(&self) {
        let removed: Vec<_> = self.devices.write().await.drain().collect();

        for (identifier, managed) in removed {
            managed.shutdown();
            self.event_bus.publish(DeviceEvent::device_removed(identifier));
        }
    }

    /// Returns a handle to a managed projector.
    pub async fn get(&self, identifier: &str) -> Option<Projector<P>> {
        self.devices
            .read()
            .await
            .get(identifier)
            .map(|managed| managed.projector().clone())
    }

    /// Returns `true` if a projector with this identifier is managed.
    pub async fn contains(&self, identifier: &str) -> bool {
        self.devices.read().await.contains_key(identifier)
    }

    /// Returns the identifiers of all managed projectors, sorted.
    pub async fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.devices.read().await.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of managed projectors.
    pub async fn device_count(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Returns the last known power state of a projector.
    pub async fn state(&self, identifier: &str) -> Option<PowerState> {
        self.devices
            .read()
            .await
            .get(identifier)
            .map(|managed| managed.projector().state())
    }

    // =========================================================================
    // Projector Control
    // =========================================================================

    async fn require(&self, identifier: &str) -> Result<Projector<P>> {
        self.get(identifier)
            .await
            .ok_or_else(|| Error::DeviceNotFound(identifier.to_string()))
    }

    /// Refreshes the power state of a projector.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if no projector has this identifier.
    pub async fn update(&self, identifier: &str) -> Result<PowerState> {
        Ok(self.require(identifier).await?.update().await)
    }

    /// Sends a power command without refreshing the state.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if no projector has this identifier.
    pub async fn set_power(&self, identifier: &str, on: bool) -> Result<Option<CommandResponse>> {
        Ok(self.require(identifier).await?.set_power(on).await)
    }

    /// Sends a power command, waits for the projector to settle and
    /// refreshes its state.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if no projector has this identifier.
    pub async fn switch_power(&self, identifier: &str, on: bool) -> Result<PowerState> {
        Ok(self.require(identifier).await?.switch_power(on).await)
    }

    /// Sends a command body verbatim.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotFound` if no projector has this identifier.
    pub async fn send_raw(
        &self,
        identifier: &str,
        command: &str,
    ) -> Result<Option<CommandResponse>> {
        Ok(self.require(identifier).await?.send_raw(command).await)
    }
}

impl<P: Protocol> Drop for ProjectorManager<P> {
    fn drop(&mut self) {
        // Handles given out by `get` must not keep polling once the map is gone.
        if let Ok(devices) = self.devices.try_read() {
            for managed in devices.values() {
                managed.shutdown();
            }
        }
    }
}

impl<P: Protocol> std::fmt::Debug for ProjectorManager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectorManager")
            .field("event_bus", &self.event_bus)
            .field("polling", &self.polling)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProtocolError, ValueError};
    use crate::event::StateUpdate;
    use parking_lot::Mutex;
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<(String, String)>>>;

    /// Answers every query with "on" and logs `(address, command)` pairs.
    struct LoggingProtocol {
        address: String,
        log: Log,
    }

    impl Protocol for LoggingProtocol {
        async fn send_raw(
            &self,
            command: &str,
        ) -> std::result::Result<CommandResponse, ProtocolError> {
            self.log.lock().push((self.address.clone(), command.to_string()));
            Ok(CommandResponse::new("%1POWR=1".to_string()))
        }
    }

    fn manager() -> (ProjectorManager<LoggingProtocol>, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let manager =
            ProjectorManager::with_connector(move |config: &DeviceConfig| LoggingProtocol {
                address: config.address.clone(),
                log: Arc::clone(&log_clone),
            });
        (manager, log)
    }

    fn hall() -> DeviceConfig {
        DeviceConfig::new("Hall", "10.0.0.1")
    }

    #[tokio::test]
    async fn add_device_announces_then_polls() {
        let (manager, _) = manager();
        let mut events = manager.subscribe();

        assert!(manager.add_device(hall()).await.unwrap());

        assert_eq!(events.recv().await.unwrap(), DeviceEvent::device_added("hall"));
        assert_eq!(
            events.recv().await.unwrap(),
            DeviceEvent::state_changed("hall", StateUpdate::new(PowerState::On))
        );
        assert_eq!(manager.state("hall").await, Some(PowerState::On));
        assert!(manager.get("hall").await.unwrap().is_polling());

        manager.clear().await;
    }

    #[tokio::test]
    async fn duplicate_identifier_is_ignored() {
        let (manager, _) = manager();

        assert!(manager.add_device(hall()).await.unwrap());
        assert!(!manager.add_device(hall()).await.unwrap());
        assert_eq!(manager.device_count().await, 1);

        manager.clear().await;
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let (manager, _) = manager();

        let result = manager
            .add_device(DeviceConfig::new("Hall", "not-an-ip"))
            .await;

        assert!(matches!(
            result,
            Err(Error::Value(ValueError::InvalidAddress(_)))
        ));
        assert_eq!(manager.device_count().await, 0);
    }

    #[tokio::test]
    async fn remove_device_stops_polling() {
        let (manager, _) = manager();
        manager.add_device(hall()).await.unwrap();
        let projector = manager.get("hall").await.unwrap();
        let mut events = manager.subscribe();

        assert!(manager.remove_device("hall").await);
        assert!(!manager.remove_device("hall").await);

        assert!(!projector.is_polling());
        assert!(!manager.contains("hall").await);

        let lifecycle = loop {
            let event = events.recv().await.unwrap();
            if event.is_lifecycle() {
                break event;
            }
        };
        assert_eq!(lifecycle, DeviceEvent::device_removed("hall"));
    }

    #[tokio::test]
    async fn removed_projector_no_longer_publishes() {
        let (manager, _) = manager();
        manager.add_device(hall()).await.unwrap();
        let projector = manager.get("hall").await.unwrap();
        manager.remove_device("hall").await;
        let mut events = manager.subscribe();

        assert_eq!(projector.update().await, PowerState::On);

        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_identifier_is_an_error() {
        let (manager, _) = manager();

        assert!(matches!(
            manager.update("nope").await,
            Err(Error::DeviceNotFound(id)) if id == "nope"
        ));
        assert!(manager.switch_power("nope", true).await.is_err());
        assert!(manager.set_power("nope", true).await.is_err());
        assert!(manager.send_raw("nope", "%1POWR ?").await.is_err());
    }

    #[tokio::test]
    async fn commands_reach_the_right_projector() {
        let (manager, log) = manager();
        manager.add_device(hall()).await.unwrap();
        manager
            .add_device(DeviceConfig::new("Cinema", "10.0.0.2"))
            .await
            .unwrap();

        manager.send_raw("cinema", "%1INPT 32").await.unwrap();
        manager.set_power("hall", false).await.unwrap();

        let commands: Vec<_> = log
            .lock()
            .iter()
            .filter(|(_, command)| command != "%1POWR ?")
            .cloned()
            .collect();
        assert_eq!(
            commands,
            vec![
                ("10.0.0.2".to_string(), "%1INPT 32".to_string()),
                ("10.0.0.1".to_string(), "%1POWR 0".to_string()),
            ]
        );

        manager.clear().await;
    }

    #[tokio::test]
    async fn add_or_update_replaces_changed_config() {
        let (manager, _) = manager();

        assert!(manager.add_or_update(hall()).await.unwrap());
        let original = manager.get("hall").await.unwrap();

        assert!(!manager.add_or_update(hall()).await.unwrap());
        assert!(
            manager
                .add_or_update(hall().with_password("secret"))
                .await
                .unwrap()
        );

        let replaced = manager.get("hall").await.unwrap();
        assert_eq!(replaced.config().password.as_deref(), Some("secret"));
        assert!(!original.is_polling());
        assert!(replaced.is_polling());
        assert_eq!(manager.device_count().await, 1);

        manager.clear().await;
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let (manager, _) = manager();
        manager.add_device(hall()).await.unwrap();
        manager
            .add_device(DeviceConfig::new("Cinema", "10.0.0.2"))
            .await
            .unwrap();
        let projector = manager.get("cinema").await.unwrap();

        manager.clear().await;

        assert_eq!(manager.device_count().await, 0);
        assert!(!projector.is_polling());
    }

    #[tokio::test]
    async fn device_ids_are_sorted() {
        let (manager, _) = manager();
        manager
            .add_device(DeviceConfig::new("Zulu", "10.0.0.3"))
            .await
            .unwrap();
        manager.add_device(hall()).await.unwrap();

        assert_eq!(manager.device_ids().await, vec!["hall", "zulu"]);

        manager.clear().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_manager_stops_polling() {
        let (manager, log) = manager();
        manager.add_device(hall()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        let before = log.lock().len();

        drop(manager);
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(before, 1);
        assert_eq!(log.lock().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_manager_stops_handed_out_projectors() {
        let (manager, log) = manager();
        manager.add_device(hall()).await.unwrap();
        let projector = manager.get("hall").await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        drop(manager);
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(!projector.is_polling());
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn subscriber_count_tracks_receivers() {
        let (manager, _) = manager();
        let _a = manager.subscribe();
        let _b = manager.subscribe();
        assert_eq!(manager.subscriber_count(), 2);
    }
}
