//! Trait definitions for hardware and network abstraction.
//!
//! These are the seams that let the door handler run unchanged on an ESP32,
//! against a desktop broker, or inside unit tests.
//!
//! # Submodules
//!
//! - `hardware`: the door output GPIO ([`DoorOutput`], [`Polarity`])
//! - `network`: the MQTT client ([`MqttClient`], [`QoS`])

pub mod hardware;
pub mod network;

pub use hardware::*;
pub use network::*;
