//! Door service runner for unified polling across platforms.
//!
//! Provides a platform-agnostic loop body that works with any implementation
//! of the [`MqttClient`] and [`DoorOutput`] traits.
//!
//! # Example
//!
//! ```rust
//! use dorra::config::Config;
//! use dorra::hal::{MockMqtt, MockOutput};
//! use dorra::services::DoorService;
//! use dorra::traits::DoorOutput;
//! use dorra::{ConnectionEvent, DoorHandler};
//!
//! let config = Config::default();
//! let mut mqtt = MockMqtt::new();
//! mqtt.queue_event(ConnectionEvent::Connected);
//! mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"open".to_vec()));
//!
//! let mut service = DoorService::new(DoorHandler::from_config(&config), MockOutput::new(), mqtt);
//!
//! // In main loop:
//! service.poll();
//! assert!(service.output().is_active());
//! ```

extern crate alloc;

use alloc::format;
use alloc::string::String;

use log::error;

use crate::error::{Error, TransportError, TransportErrorKind};
use crate::events::ConnectionEvent;
use crate::handler::{Action, DoorHandler};
use crate::traits::{DoorOutput, MqttClient};

// ============================================================================
// Door Service
// ============================================================================

/// Unified door service for both desktop and ESP32.
///
/// Owns the handler and both collaborators, and performs the actions the
/// handler returns. Events are processed one at a time, to completion, in the
/// order the client yields them.
pub struct DoorService<O, C>
where
    O: DoorOutput,
    C: MqttClient,
{
    handler: DoorHandler,
    output: O,
    client: C,
}

impl<O, C> DoorService<O, C>
where
    O: DoorOutput,
    C: MqttClient,
{
    /// Create a new door service.
    pub fn new(handler: DoorHandler, output: O, client: C) -> Self {
        Self {
            handler,
            output,
            client,
        }
    }

    /// Get a reference to the handler.
    pub fn handler(&self) -> &DoorHandler {
        &self.handler
    }

    /// Get a reference to the door output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a reference to the MQTT client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get a mutable reference to the MQTT client.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Drain and handle every pending event.
    ///
    /// Call this regularly in the main loop. Never fails: collaborator errors
    /// are logged and the remaining actions still run. Returns the number of
    /// events processed.
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.client.try_recv() {
            self.dispatch(&event);
            processed += 1;
        }
        processed
    }

    /// Handle a single event.
    pub fn dispatch(&mut self, event: &ConnectionEvent) {
        let actions = self.handler.handle(event);
        self.apply(&actions);
    }

    /// Perform actions in order.
    pub fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            if let Err(err) = self.apply_one(action) {
                error!("{}", Error::from(err));
            }
        }
    }

    fn apply_one(&mut self, action: &Action) -> Result<(), TransportError> {
        match action {
            Action::SetOutput(active) => self.output.set_active(*active).map_err(|e| {
                TransportError::new(TransportErrorKind::Output, format!("{:?}", e))
            }),
            Action::Publish {
                topic,
                payload,
                qos,
                retain,
            } => self
                .client
                .publish(topic, payload, *qos, *retain)
                .map_err(|e| {
                    TransportError::new(
                        TransportErrorKind::Publish,
                        format!("{} to {}: {:?}", String::from_utf8_lossy(payload), topic, e),
                    )
                }),
            Action::Subscribe { topic, qos } => {
                self.client.subscribe(topic, *qos).map_err(|e| {
                    TransportError::new(TransportErrorKind::Subscribe, format!("{}: {:?}", topic, e))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hal::{MockMqtt, MockOperation, MockOutput};
    use crate::traits::QoS;

    fn setup() -> (DoorHandler, MockOutput, MockMqtt) {
        let handler = DoorHandler::from_config(&Config::default());
        (handler, MockOutput::new(), MockMqtt::new())
    }

    #[test]
    fn poll_with_nothing_pending() {
        let (handler, output, mqtt) = setup();
        let mut service = DoorService::new(handler, output, mqtt);
        assert_eq!(service.poll(), 0);
        assert!(service.client().operations.is_empty());
    }

    #[test]
    fn connect_publishes_then_subscribes() {
        let (handler, output, mut mqtt) = setup();
        mqtt.queue_event(ConnectionEvent::Connected);
        let mut service = DoorService::new(handler, output, mqtt);

        assert_eq!(service.poll(), 1);

        let ops = &service.client().operations;
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[0],
            MockOperation::Publish {
                topic: "/dorra/status".into(),
                payload: b"ESP Connected".to_vec(),
                qos: QoS::AtLeastOnce,
                retain: true,
            }
        );
        assert_eq!(
            ops[1],
            MockOperation::Subscribe {
                topic: "/dorra/control".into(),
                qos: QoS::AtLeastOnce,
            }
        );
    }

    #[test]
    fn open_drives_output_and_publishes() {
        let (handler, output, mut mqtt) = setup();
        mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"open".to_vec()));
        let mut service = DoorService::new(handler, output, mqtt);

        service.poll();

        assert!(service.output().is_active());
        assert_eq!(service.output().writes, vec![true]);
        let acks = service.client().published_to("/dorra/status");
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0], b"it's open");
    }

    #[test]
    fn events_processed_in_order() {
        let (handler, output, mut mqtt) = setup();
        mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"open".to_vec()));
        mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"close".to_vec()));
        let mut service = DoorService::new(handler, output, mqtt);

        assert_eq!(service.poll(), 2);

        assert!(!service.output().is_active());
        assert_eq!(service.output().writes, vec![true, false]);
        let acks = service.client().published_to("/dorra/status");
        assert_eq!(acks, vec![&b"it's open"[..], &b"it's closed"[..]]);
    }

    #[test]
    fn publish_failure_does_not_stop_processing() {
        let (handler, output, mut mqtt) = setup();
        mqtt.fail_publish = true;
        mqtt.queue_event(ConnectionEvent::Connected);
        mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"open".to_vec()));
        let mut service = DoorService::new(handler, output, mqtt);

        assert_eq!(service.poll(), 2);

        // Subscribe still went out after the failed publish
        assert!(service.client().is_subscribed("/dorra/control"));
        // Output still switched
        assert!(service.output().is_active());
        assert!(service.handler().output_state());
    }

    #[test]
    fn output_failure_does_not_block_acknowledgment() {
        let (handler, mut output, mut mqtt) = setup();
        output.fail = true;
        mqtt.queue_event(ConnectionEvent::data("/dorra/control", b"open".to_vec()));
        let mut service = DoorService::new(handler, output, mqtt);

        service.poll();

        assert_eq!(service.client().published_to("/dorra/status").len(), 1);
    }

    #[test]
    fn transport_error_is_survived() {
        let (handler, output, mut mqtt) = setup();
        mqtt.queue_event(ConnectionEvent::Error(TransportError::connection("refused")));
        mqtt.queue_event(ConnectionEvent::Disconnected);
        mqtt.queue_event(ConnectionEvent::Connected);
        let mut service = DoorService::new(handler, output, mqtt);

        assert_eq!(service.poll(), 3);
        assert_eq!(service.client().published_to("/dorra/status").len(), 1);
    }
}
