// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `epson_pjlink` - A Rust library to control Epson projectors over PJLink.
//!
//! This library provides async APIs to switch projectors on and off, track
//! their power state and pass arbitrary PJLink commands through.
//!
//! # Supported Features
//!
//! - **Power control**: Power on, standby, power query
//! - **State tracking**: Cached power state with change notifications
//! - **Polling**: Per-projector background refresh every 15 seconds
//! - **Pass-through**: Input selection, remote-control keys, raw commands
//! - **Authentication**: PJLink MD5 challenge when the projector asks for it
//!
//! # Quick Start
//!
//! ## Single Projector
//!
//! ```no_run
//! use epson_pjlink::{DeviceConfig, Projector, Subscribable};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DeviceConfig::new("Living Room", "192.168.1.20").with_password("secret");
//!     let projector = Projector::new(config);
//!
//!     projector.on_state_changed(|identifier, update| {
//!         println!("{identifier} is now {}", update.state);
//!     });
//!
//!     // Sends %1POWR 1, waits two seconds, then queries the state
//!     let state = projector.switch_power(true).await;
//!     println!("projector is {state}");
//! }
//! ```
//!
//! ## Several Projectors
//!
//! ```no_run
//! use epson_pjlink::{DeviceConfig, ProjectorManager};
//!
//! #[tokio::main]
//! async fn main() -> epson_pjlink::Result<()> {
//!     let manager = ProjectorManager::new();
//!     let mut events = manager.subscribe();
//!
//!     manager.add_device(DeviceConfig::new("Hall", "192.168.1.20")).await?;
//!     manager.add_device(DeviceConfig::new("Cinema", "192.168.1.21")).await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Model
//!
//! Network faults stay inside a [`Projector`]: a failed exchange is logged
//! through `tracing` and surfaces as `None`, and a failed power query reads
//! as [`PowerState::Standby`]. Only configuration mistakes and unknown
//! identifiers are reported as [`Error`].

pub mod command;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod subscription;
pub mod types;

pub use command::{Command, InputCommand, PowerCommand, RawCommand, RemoteKeyCommand};
pub use device::{DeviceConfig, PollingConfig, Projector};
pub use error::{Error, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, EventBus, StateUpdate};
pub use manager::ProjectorManager;
pub use protocol::{CommandResponse, PjLinkClient, PjLinkConfig, Protocol};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{InputSource, PowerState, RemoteKey};
