// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projector manager for coordinating several projectors.
//!
//! # Overview
//!
//! The [`ProjectorManager`] owns the map of live projectors for a driver
//! process. It provides:
//!
//! - **Lifecycle**: add, update and remove projectors; polling starts and
//!   stops with them
//! - **Event system**: state changes and lifecycle events of every projector
//!   on one broadcast channel
//! - **Routing**: commands addressed by projector identifier
//!
//! Projectors themselves never see the map; each one only knows its own
//! configuration.
//!
//! # Examples
//!
//! ```no_run
//! use epson_pjlink::{DeviceConfig, ProjectorManager};
//!
//! # async fn example() -> epson_pjlink::Result<()> {
//! let manager = ProjectorManager::new();
//!
//! manager
//!     .add_device(DeviceConfig::new("Living Room", "192.168.1.20").with_password("secret"))
//!     .await?;
//!
//! let state = manager.update("living-room").await?;
//! println!("living-room is {state}");
//!
//! manager.remove_device("living-room").await;
//! # Ok(())
//! # }
//! ```

mod managed_device;
mod projector_manager;

pub use projector_manager::ProjectorManager;
