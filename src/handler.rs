//! Door command handler.
//!
//! This module provides [`DoorHandler`], the component that turns MQTT
//! lifecycle and data events into door output changes and acknowledgment
//! publications.
//!
//! # Overview
//!
//! The handler is a pure state machine: [`DoorHandler::handle`] takes a
//! [`ConnectionEvent`] and returns the outbound [`Action`]s as data. It owns
//! exactly one piece of mutable state, the logical output level, which starts
//! `false` and is changed only by `open`/`close` commands. Performing the
//! actions is the job of [`crate::services::DoorService`] (or any other
//! caller), which keeps this module free of I/O and trivially testable.
//!
//! # Example
//!
//! ```rust
//! use dorra::{Action, ConnectionEvent, DoorHandler};
//! use dorra::config::Config;
//!
//! let mut handler = DoorHandler::from_config(&Config::default());
//!
//! // On connect: announce and subscribe
//! let actions = handler.handle(&ConnectionEvent::Connected);
//! assert_eq!(actions.len(), 2);
//!
//! // A command on the control topic
//! let actions = handler.handle(&ConnectionEvent::data("/dorra/control", b"open".to_vec()));
//! assert!(handler.output_state());
//! assert_eq!(actions[0], Action::SetOutput(true));
//! ```

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, error, info, warn};

use crate::commands::DoorCommand;
use crate::config::Config;
use crate::error::{Error, TransportError};
use crate::events::ConnectionEvent;
use crate::traits::QoS;

/// Outbound effect requested by the handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Drive the door output to the given logical state.
    SetOutput(bool),
    /// Publish a message.
    Publish {
        /// Destination topic.
        topic: String,
        /// Message bytes.
        payload: Vec<u8>,
        /// Delivery guarantee.
        qos: QoS,
        /// Broker keeps the message for new subscribers.
        retain: bool,
    },
    /// Request a subscription.
    Subscribe {
        /// Topic filter.
        topic: String,
        /// Delivery guarantee.
        qos: QoS,
    },
}

impl Action {
    /// Payload as UTF-8 for `Publish` actions.
    pub fn payload_str(&self) -> Option<&str> {
        match self {
            Action::Publish { payload, .. } => core::str::from_utf8(payload).ok(),
            _ => None,
        }
    }
}

/// Topic names and canned messages the handler works with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerSettings {
    /// Topic carrying commands.
    pub control_topic: String,
    /// Topic for status and acknowledgments.
    pub status_topic: String,
    /// Published after connecting.
    pub connected_message: String,
    /// Acknowledgment for [`DoorCommand::Open`].
    pub open_ack: String,
    /// Acknowledgment for [`DoorCommand::Close`].
    pub close_ack: String,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl HandlerSettings {
    /// Extract handler settings from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            control_topic: config.mqtt.control_topic.as_str().into(),
            status_topic: config.mqtt.status_topic.as_str().into(),
            connected_message: config.door.connected_message.as_str().into(),
            open_ack: config.door.open_ack.as_str().into(),
            close_ack: config.door.close_ack.as_str().into(),
        }
    }
}

/// Translates connection events into output changes and publications.
#[derive(Clone, Debug)]
pub struct DoorHandler {
    settings: HandlerSettings,
    output_state: bool,
}

impl DoorHandler {
    /// Create a handler. The output state starts `false`.
    pub fn new(settings: HandlerSettings) -> Self {
        Self {
            settings,
            output_state: false,
        }
    }

    /// Create a handler from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(HandlerSettings::from_config(config))
    }

    /// Current logical output level.
    pub fn output_state(&self) -> bool {
        self.output_state
    }

    /// Handler settings.
    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Dispatch one event and return the actions to perform, in order.
    pub fn handle(&mut self, event: &ConnectionEvent) -> Vec<Action> {
        debug!("Event dispatched: {}", event.name());
        match event {
            ConnectionEvent::Connected => self.on_connected(),
            ConnectionEvent::Disconnected => self.on_disconnected(),
            ConnectionEvent::Published { msg_id } => {
                info!("MQTT_EVENT_PUBLISHED, msg_id={:?}", msg_id);
                Vec::new()
            }
            ConnectionEvent::Subscribed { msg_id } => {
                info!("MQTT_EVENT_SUBSCRIBED, msg_id={:?}", msg_id);
                Vec::new()
            }
            ConnectionEvent::Data { topic, payload } => self.on_data(topic, payload),
            ConnectionEvent::Error(detail) => self.on_error(detail),
        }
    }

    /// Announce the connection and subscribe to the control topic.
    pub fn on_connected(&mut self) -> Vec<Action> {
        info!("MQTT_EVENT_CONNECTED");
        vec![
            self.status(self.settings.connected_message.as_bytes()),
            Action::Subscribe {
                topic: self.settings.control_topic.clone(),
                qos: QoS::AtLeastOnce,
            },
        ]
    }

    /// Handle a received message.
    ///
    /// Only the control topic is acted upon; anything else is ignored.
    pub fn on_data(&mut self, topic: &str, payload: &[u8]) -> Vec<Action> {
        info!(
            "MQTT_EVENT_DATA topic={} data={}",
            topic,
            String::from_utf8_lossy(payload)
        );

        if topic != self.settings.control_topic {
            return Vec::new();
        }

        let command = DoorCommand::classify(payload);
        let Some(target) = command.target_state() else {
            warn!("{}", Error::UnrecognizedCommand(payload.to_vec()));
            return Vec::new();
        };

        info!("Command: {} received", command.as_str());
        self.output_state = target;

        let ack = if target {
            &self.settings.open_ack
        } else {
            &self.settings.close_ack
        };
        vec![Action::SetOutput(target), self.status(ack.as_bytes())]
    }

    /// Connection lost. Nothing to do: the broker publishes the last-will.
    pub fn on_disconnected(&mut self) -> Vec<Action> {
        info!("MQTT_EVENT_DISCONNECTED");
        Vec::new()
    }

    /// Report a transport error. Processing continues.
    pub fn on_error(&mut self, detail: &TransportError) -> Vec<Action> {
        error!("MQTT_EVENT_ERROR: {}", detail);
        Vec::new()
    }

    fn status(&self, payload: &[u8]) -> Action {
        Action::Publish {
            topic: self.settings.status_topic.clone(),
            payload: payload.to_vec(),
            qos: QoS::AtLeastOnce,
            retain: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> DoorHandler {
        DoorHandler::new(HandlerSettings::default())
    }

    fn publishes(actions: &[Action]) -> Vec<&Action> {
        actions
            .iter()
            .filter(|a| matches!(a, Action::Publish { .. }))
            .collect()
    }

    #[test]
    fn output_starts_inactive() {
        assert!(!handler().output_state());
    }

    #[test]
    fn connected_publishes_then_subscribes() {
        let mut h = handler();
        let actions = h.on_connected();

        assert_eq!(
            actions,
            vec![
                Action::Publish {
                    topic: "/dorra/status".into(),
                    payload: b"ESP Connected".to_vec(),
                    qos: QoS::AtLeastOnce,
                    retain: true,
                },
                Action::Subscribe {
                    topic: "/dorra/control".into(),
                    qos: QoS::AtLeastOnce,
                },
            ]
        );
        assert!(!h.output_state());
    }

    #[test]
    fn open_sets_output_and_acknowledges() {
        let mut h = handler();
        let actions = h.on_data("/dorra/control", b"open");

        assert!(h.output_state());
        assert_eq!(actions[0], Action::SetOutput(true));
        let acks = publishes(&actions);
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].payload_str(), Some("it's open"));
    }

    #[test]
    fn close_clears_output_and_acknowledges() {
        let mut h = handler();
        h.on_data("/dorra/control", b"open");
        let actions = h.on_data("/dorra/control", b"close");

        assert!(!h.output_state());
        assert_eq!(actions[0], Action::SetOutput(false));
        let acks = publishes(&actions);
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].payload_str(), Some("it's closed"));
    }

    #[test]
    fn close_from_initial_state_still_acknowledges() {
        let mut h = handler();
        let actions = h.on_data("/dorra/control", b"close");
        assert!(!h.output_state());
        assert_eq!(publishes(&actions).len(), 1);
    }

    #[test]
    fn unknown_payload_is_ignored() {
        let mut h = handler();
        h.on_data("/dorra/control", b"open");

        for payload in [&b"OPEN"[..], b"open ", b"", b"o", b"toggle"] {
            let actions = h.on_data("/dorra/control", payload);
            assert!(actions.is_empty(), "payload {:?}", payload);
            assert!(h.output_state());
        }
    }

    #[test]
    fn other_topics_are_ignored() {
        let mut h = handler();
        assert!(h.on_data("/dorra/status", b"open").is_empty());
        assert!(h.on_data("/dorra/control/extra", b"open").is_empty());
        assert!(h.on_data("/dorra/contro", b"open").is_empty());
        assert!(h.on_data("", b"open").is_empty());
        assert!(!h.output_state());
    }

    #[test]
    fn disconnect_and_error_do_nothing() {
        let mut h = handler();
        h.on_data("/dorra/control", b"open");

        assert!(h.on_disconnected().is_empty());
        assert!(h
            .on_error(&TransportError::connection("tcp reset"))
            .is_empty());
        assert!(h.output_state());
    }

    #[test]
    fn acknowledgments_are_ignored() {
        let mut h = handler();
        assert!(h.handle(&ConnectionEvent::Published { msg_id: Some(1) }).is_empty());
        assert!(h.handle(&ConnectionEvent::Subscribed { msg_id: None }).is_empty());
    }

    #[test]
    fn handle_dispatches_data() {
        let mut h = handler();
        let actions = h.handle(&ConnectionEvent::data("/dorra/control", b"open".to_vec()));
        assert_eq!(actions.len(), 2);
        assert!(h.output_state());
    }

    #[test]
    fn custom_topics_and_messages() {
        let config = Config::default()
            .with_mqtt(
                crate::config::MqttConfig::default()
                    .with_control_topic("/dorra/door/control")
                    .unwrap()
                    .with_status_topic("/dorra/door/state")
                    .unwrap(),
            )
            .with_door(crate::config::DoorConfig::default().with_acks("opened", "shut").unwrap());
        let mut h = DoorHandler::from_config(&config);

        assert!(h.on_data("/dorra/control", b"open").is_empty());

        let actions = h.on_data("/dorra/door/control", b"close");
        match &actions[1] {
            Action::Publish { topic, payload, .. } => {
                assert_eq!(topic, "/dorra/door/state");
                assert_eq!(payload, b"shut");
            }
            other => panic!("expected publish, got {:?}", other),
        }
    }

    #[test]
    fn payload_str_only_for_publish() {
        assert_eq!(Action::SetOutput(true).payload_str(), None);
    }
}
