//! Connection events delivered by the MQTT transport.
//!
//! Every transport (esp-idf client, `rumqttc`, the test mock) translates its
//! own callback or packet types into [`ConnectionEvent`] so the handler sees a
//! single vocabulary.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::TransportError;

/// Lifecycle or data event from the MQTT client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Session established with the broker.
    Connected,
    /// Session lost. The broker publishes the last-will on our behalf.
    Disconnected,
    /// Broker acknowledged a publish.
    Published {
        /// Transport message id, if known.
        msg_id: Option<u32>,
    },
    /// Broker acknowledged a subscription.
    Subscribed {
        /// Transport message id, if known.
        msg_id: Option<u32>,
    },
    /// Message received on a subscribed topic.
    Data {
        /// Topic the message was published to.
        topic: String,
        /// Raw payload bytes.
        payload: Vec<u8>,
    },
    /// Transport reported an error.
    Error(TransportError),
}

impl ConnectionEvent {
    /// Create a data event.
    pub fn data(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        ConnectionEvent::Data {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Short uppercase name, used in debug logs.
    pub const fn name(&self) -> &'static str {
        match self {
            ConnectionEvent::Connected => "CONNECTED",
            ConnectionEvent::Disconnected => "DISCONNECTED",
            ConnectionEvent::Published { .. } => "PUBLISHED",
            ConnectionEvent::Subscribed { .. } => "SUBSCRIBED",
            ConnectionEvent::Data { .. } => "DATA",
            ConnectionEvent::Error(_) => "ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_constructor_copies_topic_and_payload() {
        let event = ConnectionEvent::data("/dorra/control", b"open".to_vec());
        assert_eq!(
            event,
            ConnectionEvent::Data {
                topic: "/dorra/control".into(),
                payload: b"open".to_vec(),
            }
        );
    }

    #[test]
    fn names() {
        assert_eq!(ConnectionEvent::Connected.name(), "CONNECTED");
        assert_eq!(
            ConnectionEvent::Error(TransportError::connection("x")).name(),
            "ERROR"
        );
        assert_eq!(ConnectionEvent::Published { msg_id: Some(3) }.name(), "PUBLISHED");
    }
}
