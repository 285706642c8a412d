//! Ingress side of the controller.
//!
//! # Modules
//! - `bus`: the peripheral-bus target, receive and request handlers
//! - `store`: configuration storage
//! - `radio`: packet radio collaborator

pub mod bus;
pub mod radio;
pub mod store;

pub use bus::BusTarget;
pub use radio::{NoRadio, PacketRadio, RadioError};
pub use store::{ConfigError, ConfigStore, MemoryConfigStore};
