//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and network traits,
//! enabling development and testing on desktop without an ESP32 or a broker.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockOutput`] | [`DoorOutput`] | Records every output write |
//! | [`MockMqtt`] | [`MqttClient`] | Queued events, captured pub/sub operations |
//!
//! # Example
//!
//! ```rust
//! use dorra::hal::{MockMqtt, MockOutput};
//! use dorra::services::DoorService;
//! use dorra::{ConnectionEvent, DoorHandler};
//! use dorra::config::Config;
//!
//! let mut mqtt = MockMqtt::new();
//! mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"close".to_vec()));
//!
//! let handler = DoorHandler::from_config(&Config::default());
//! let mut service = DoorService::new(handler, MockOutput::new(), mqtt);
//! service.poll();
//!
//! assert_eq!(service.output().writes, vec![false]);
//! assert_eq!(service.client().published_to("/dorra/status"), vec![&b"it's closed"[..]]);
//! ```
//!
//! [`DoorOutput`]: crate::traits::DoorOutput
//! [`MqttClient`]: crate::traits::MqttClient

extern crate alloc;

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::events::ConnectionEvent;
use crate::traits::{DoorOutput, MqttClient, Polarity, QoS};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock door output for testing.
///
/// Records all writes for verification. Use the public fields to inspect
/// state after test operations.
///
/// # Example
///
/// ```rust
/// use dorra::hal::MockOutput;
/// use dorra::traits::{DoorOutput, Polarity};
///
/// let mut output = MockOutput::new().with_polarity(Polarity::ActiveLow);
/// output.set_active(true).unwrap();
///
/// assert!(output.is_active());
/// assert!(!output.pin_level()); // active-low relay board
/// assert_eq!(output.writes, vec![true]);
/// ```
#[derive(Debug, Default)]
pub struct MockOutput {
    /// Current logical state.
    pub active: bool,
    /// Every logical state written, in order.
    pub writes: Vec<bool>,
    /// Polarity used to derive the simulated pin level.
    pub polarity: Polarity,
    /// When true, `set_active` fails and leaves the state unchanged.
    pub fail: bool,
}

impl MockOutput {
    /// Creates a new inactive mock output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock output with the given polarity.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Simulated electrical level (`true` = high).
    pub fn pin_level(&self) -> bool {
        self.polarity.pin_level(self.active)
    }
}

impl DoorOutput for MockOutput {
    type Error = ();

    fn set_active(&mut self, active: bool) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.active = active;
        self.writes.push(active);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

// ============================================================================
// Network Mocks
// ============================================================================

/// A publish or subscribe request captured by [`MockMqtt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockOperation {
    /// `publish` was called.
    Publish {
        /// Topic published to.
        topic: String,
        /// Payload bytes.
        payload: Vec<u8>,
        /// Requested QoS.
        qos: QoS,
        /// Retain flag.
        retain: bool,
    },
    /// `subscribe` was called.
    Subscribe {
        /// Topic filter.
        topic: String,
        /// Requested QoS.
        qos: QoS,
    },
}

/// Mock MQTT client for testing.
///
/// Captures publish and subscribe calls in order and replays queued
/// connection events through `try_recv()`.
///
/// # Example
///
/// ```rust
/// use dorra::hal::MockMqtt;
/// use dorra::traits::{MqttClient, QoS};
/// use dorra::ConnectionEvent;
///
/// let mut mqtt = MockMqtt::new();
///
/// // Queue incoming events (FIFO)
/// mqtt.queue_event(ConnectionEvent::Connected);
/// assert_eq!(mqtt.try_recv(), Some(ConnectionEvent::Connected));
/// assert_eq!(mqtt.try_recv(), None);
///
/// // Check captured operations
/// mqtt.subscribe("/dorra/control", QoS::AtLeastOnce).unwrap();
/// assert!(mqtt.is_subscribed("/dorra/control"));
/// ```
#[derive(Debug, Default)]
pub struct MockMqtt {
    /// Publish/subscribe calls, in call order.
    pub operations: Vec<MockOperation>,
    /// Events to be returned by `try_recv()`.
    pub incoming: VecDeque<ConnectionEvent>,
    /// Whether the client reports itself connected.
    pub connected: bool,
    /// When true, `publish` fails and records nothing.
    pub fail_publish: bool,
    /// When true, `subscribe` fails and records nothing.
    pub fail_subscribe: bool,
}

impl MockMqtt {
    /// Creates a new mock MQTT client in connected state.
    pub fn new() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }

    /// Queue an incoming event.
    pub fn queue_event(&mut self, event: ConnectionEvent) {
        self.incoming.push_back(event);
    }

    /// Queue an incoming message.
    pub fn queue_message(&mut self, topic: impl Into<String>, payload: impl Into<Vec<u8>>) {
        self.queue_event(ConnectionEvent::data(topic, payload));
    }

    /// Check if a topic was subscribed to.
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op, MockOperation::Subscribe { topic: t, .. } if t == topic))
    }

    /// Payloads published to a topic, in order.
    pub fn published_to(&self, topic: &str) -> Vec<&[u8]> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::Publish {
                    topic: t, payload, ..
                } if t == topic => Some(payload.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Total number of publish calls recorded.
    pub fn publish_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, MockOperation::Publish { .. }))
            .count()
    }
}

impl MqttClient for MockMqtt {
    type Error = ();

    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> Result<(), ()> {
        if self.fail_publish {
            return Err(());
        }
        self.operations.push(MockOperation::Publish {
            topic: topic.into(),
            payload: payload.to_vec(),
            qos,
            retain,
        });
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), ()> {
        if self.fail_subscribe {
            return Err(());
        }
        self.operations.push(MockOperation::Subscribe {
            topic: topic.into(),
            qos,
        });
        Ok(())
    }

    fn try_recv(&mut self) -> Option<ConnectionEvent> {
        self.incoming.pop_front()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_output_records_writes() {
        let mut output = MockOutput::new();
        output.set_active(true).unwrap();
        output.set_active(true).unwrap();
        output.set_active(false).unwrap();
        assert_eq!(output.writes, vec![true, true, false]);
        assert!(!output.is_active());
    }

    #[test]
    fn mock_output_failure_keeps_state() {
        let mut output = MockOutput::new();
        output.fail = true;
        assert!(output.set_active(true).is_err());
        assert!(!output.is_active());
        assert!(output.writes.is_empty());
    }

    #[test]
    fn mock_output_pin_level_follows_polarity() {
        let mut high = MockOutput::new();
        let mut low = MockOutput::new().with_polarity(Polarity::ActiveLow);
        assert!(!high.pin_level());
        assert!(low.pin_level());

        high.set_active(true).unwrap();
        low.set_active(true).unwrap();
        assert!(high.pin_level());
        assert!(!low.pin_level());
    }

    #[test]
    fn mock_mqtt_events_are_fifo() {
        let mut mqtt = MockMqtt::new();
        mqtt.queue_event(ConnectionEvent::Connected);
        mqtt.queue_message("/dorra/control", b"open".to_vec());

        assert_eq!(mqtt.try_recv(), Some(ConnectionEvent::Connected));
        assert_eq!(
            mqtt.try_recv(),
            Some(ConnectionEvent::data("/dorra/control", b"open".to_vec()))
        );
        assert_eq!(mqtt.try_recv(), None);
    }

    #[test]
    fn mock_mqtt_captures_operations_in_order() {
        let mut mqtt = MockMqtt::new();
        mqtt.publish("/a", b"1", QoS::AtMostOnce, false).unwrap();
        mqtt.subscribe("/b", QoS::AtLeastOnce).unwrap();
        mqtt.publish("/a", b"2", QoS::AtLeastOnce, true).unwrap();

        assert_eq!(mqtt.operations.len(), 3);
        assert!(matches!(mqtt.operations[1], MockOperation::Subscribe { .. }));
        assert_eq!(mqtt.published_to("/a"), vec![&b"1"[..], &b"2"[..]]);
        assert_eq!(mqtt.publish_count(), 2);
    }

    #[test]
    fn mock_mqtt_failures() {
        let mut mqtt = MockMqtt::new();
        mqtt.fail_publish = true;
        mqtt.fail_subscribe = true;
        assert!(mqtt.publish("/a", b"x", QoS::AtLeastOnce, true).is_err());
        assert!(mqtt.subscribe("/b", QoS::AtLeastOnce).is_err());
        assert!(mqtt.operations.is_empty());
    }

    #[test]
    fn mock_mqtt_starts_connected() {
        assert!(MockMqtt::new().is_connected());
        assert!(!MockMqtt::default().is_connected());
    }
}
