//! # dorra
//!
//! An MQTT-controlled door opener. The controller subscribes to a control
//! topic, switches a relay output on `open`/`close`, and acknowledges each
//! command on a status topic. The broker announces loss of the device through
//! a retained last-will.
//!
//! ## Features
//!
//! - **Pure handler**: events in, actions out, no I/O in the decision logic
//! - **Hardware abstraction**: one output trait, one MQTT client trait
//! - **Two targets**: ESP32 firmware (`esp32-mqtt`) and a desktop binary (`mqtt`)
//! - **Configurable**: topics, messages, broker and relay polarity
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and network abstractions
//! - `commands` - Payload classification
//! - `events` - Connection events produced by MQTT transports
//! - `handler` - Door state machine returning actions
//! - `services` - Runner that applies actions, desktop MQTT transport
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use dorra::{Config, ConnectionEvent};
//! use dorra::hal::{MockMqtt, MockOutput};
//! use dorra::services::DoorService;
//! use dorra::DoorHandler;
//!
//! let config = Config::default();
//! let mut mqtt = MockMqtt::new();
//! mqtt.queue_event(ConnectionEvent::Connected);
//! mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"open".to_vec()));
//!
//! let mut service = DoorService::new(DoorHandler::from_config(&config), MockOutput::new(), mqtt);
//! service.poll();
//!
//! assert!(service.handler().output_state());
//! assert!(service.client().is_subscribed("/dorra/control"));
//! assert_eq!(
//!     service.client().published_to("/dorra/status"),
//!     vec![&b"ESP Connected"[..], &b"it's open"[..]]
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Door commands and payload classification.
pub mod commands;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Error types.
pub mod error;
/// Connection events delivered by MQTT transports.
pub mod events;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Door command handler.
pub mod handler;
/// Door service runner and MQTT transports.
pub mod services;
/// Core traits for hardware and network abstraction.
pub mod traits;

// Re-exports for convenience
pub use commands::DoorCommand;
pub use error::{Error, TransportError, TransportErrorKind};
pub use events::ConnectionEvent;
pub use handler::{Action, DoorHandler, HandlerSettings};
pub use traits::{DoorOutput, MqttClient, Polarity, QoS};

// Config re-exports
pub use config::{Config, DeviceConfig, DoorConfig, MqttConfig, ProtocolVersion, WifiConfig};
