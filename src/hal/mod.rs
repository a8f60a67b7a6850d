//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test doubles for desktop development
//! - `pin`: Door output on any `embedded-hal` output pin
//! - `log_output`: Door output that only logs (desktop binary)
//! - `esp32`: ESP32 relay pin, Wi-Fi and MQTT client (requires `esp32` feature)

pub mod log_output;
pub mod mock;
pub mod pin;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use log_output::LogOutput;
pub use mock::*;
pub use pin::PinOutput;

#[cfg(feature = "esp32")]
pub use esp32::*;
