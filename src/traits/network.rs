//! Network abstraction traits for MQTT.
//!
//! The door controller talks to exactly one broker. The transport (esp-idf
//! MQTT client on device, `rumqttc` on desktop) owns the socket, buffering,
//! retries and reconnects; this module only describes what the controller
//! asks of it.
//!
//! # Topics
//!
//! ```text
//! /dorra/control  - subscribe: "open" | "close"
//! /dorra/status   - publish (retained): "ESP Connected", "it's open",
//!                   "it's closed", last-will "ESP Disconnected"
//! ```

use crate::events::ConnectionEvent;

// ============================================================================
// Quality of Service
// ============================================================================

/// MQTT delivery guarantee.
///
/// Transport-agnostic mirror of the QoS levels exposed by `rumqttc` and
/// `esp-idf-svc`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QoS {
    /// At most once (fire and forget).
    AtMostOnce,
    /// At least once. Used for all door traffic.
    #[default]
    AtLeastOnce,
    /// Exactly once.
    ExactlyOnce,
}

impl QoS {
    /// Numeric QoS level as it appears on the wire.
    pub const fn level(&self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

// ============================================================================
// MQTT Client Trait (Sync-First Design)
// ============================================================================

/// MQTT client trait for the door controller.
///
/// Uses a **sync-first design** that works on ESP32 (where the esp-idf client
/// enqueues requests and returns immediately) and on desktop test doubles.
///
/// # Implementation Notes
///
/// - `publish` and `subscribe` are requests; they must not wait for the
///   broker's acknowledgment
/// - `try_recv` is non-blocking and yields lifecycle events as well as data
/// - The client handles reconnection internally
///
/// # Example
///
/// ```rust
/// use dorra::hal::MockMqtt;
/// use dorra::traits::{MqttClient, QoS};
///
/// let mut client = MockMqtt::new();
/// client
///     .publish("/dorra/status", b"ESP Connected", QoS::AtLeastOnce, true)
///     .unwrap();
/// assert_eq!(client.published_to("/dorra/status").len(), 1);
/// ```
pub trait MqttClient {
    /// Error type for MQTT operations.
    type Error: core::fmt::Debug;

    /// Request a publish to a topic.
    ///
    /// # Arguments
    /// - `topic`: MQTT topic path
    /// - `payload`: Message bytes
    /// - `qos`: Delivery guarantee
    /// - `retain`: If true, broker keeps message for new subscribers
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error>;

    /// Request a subscription to a topic.
    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error>;

    /// Try to receive the next connection event (non-blocking).
    ///
    /// Returns `None` if nothing is pending. This should never block.
    fn try_recv(&mut self) -> Option<ConnectionEvent>;

    /// Check if connected to broker.
    fn is_connected(&self) -> bool;
}
