//! ESP32 hardware abstraction layer for the door controller.
//!
//! This module provides hardware implementations for an ESP32 board that
//! drives a door relay from a single GPIO and talks to an MQTT broker over
//! Wi-Fi.
//!
//! # Hardware Configuration
//!
//! - **MCU**: any ESP-IDF supported ESP32 (classic, C3, S3)
//! - **Output**: relay module or LED on GPIO2
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod output;

pub use output::{door_output, Esp32DoorOutput};

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

#[cfg(feature = "esp32-mqtt")]
mod mqtt;
#[cfg(feature = "esp32-mqtt")]
pub use mqtt::Esp32Mqtt;

/// Pin assignments.
pub mod pins {
    /// Door relay output. Also the built-in LED on most dev boards.
    pub const DOOR_OUTPUT: i32 = crate::config::DEFAULT_OUTPUT_PIN;
}
