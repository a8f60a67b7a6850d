//! Services that connect the door handler to its collaborators.
//!
//! - `runner`: platform-agnostic [`DoorService`] that drains events from any
//!   [`MqttClient`](crate::traits::MqttClient) and applies the handler's
//!   actions. Used by both the ESP32 firmware and the desktop binary.
//! - `mqtt` feature: `rumqttc` transport for running on a desktop.

// Door service runner (platform-agnostic)
pub mod runner;

#[cfg(feature = "mqtt")]
pub mod mqtt;

// Re-exports
pub use runner::*;

#[cfg(feature = "mqtt")]
pub use mqtt::*;
