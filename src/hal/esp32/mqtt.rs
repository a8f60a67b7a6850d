//! MQTT client for ESP32.
//!
//! Wraps `EspMqttClient` and implements the [`MqttClient`] trait so the
//! shared [`DoorService`](crate::services::DoorService) can drive it. The
//! connection object is pumped on a background thread which converts each
//! `EventPayload` into a [`ConnectionEvent`] and queues it for `try_recv()`.
//!
//! The last-will (disconnected message, QoS 1, retained) is registered on the
//! status topic when the client is created.
//!
//! # Example
//!
//! ```ignore
//! use dorra::hal::esp32::Esp32Mqtt;
//! use dorra::config::{DoorConfig, MqttConfig};
//! use dorra::traits::MqttClient;
//!
//! let mut mqtt = Esp32Mqtt::new(&MqttConfig::default(), &DoorConfig::default())?;
//! while let Some(event) = mqtt.try_recv() {
//!     // ...
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use esp_idf_svc::mqtt::client::{
    EspMqttClient, EspMqttConnection, EventPayload, LwtConfiguration, MqttClientConfiguration,
    MqttProtocolVersion, QoS as EspQoS,
};
use esp_idf_svc::sys::EspError;
use log::{error, info, warn};

use crate::config::{DoorConfig, MqttConfig, ProtocolVersion};
use crate::error::TransportError;
use crate::events::ConnectionEvent;
use crate::traits::{MqttClient, QoS};

/// Stack size for the event pump thread.
const EVENT_THREAD_STACK: usize = 6144;

/// MQTT client backed by the ESP-IDF MQTT component.
pub struct Esp32Mqtt {
    client: EspMqttClient<'static>,
    event_rx: Receiver<ConnectionEvent>,
    connected: Arc<AtomicBool>,
}

impl Esp32Mqtt {
    /// Create the client and start connecting to the broker.
    ///
    /// Returns as soon as the client is started; the `Connected` event
    /// arrives later through `try_recv()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the event thread
    /// cannot be spawned.
    pub fn new(mqtt: &MqttConfig, door: &DoorConfig) -> anyhow::Result<Self> {
        let broker_uri = mqtt.broker_uri();

        if !mqtt.auto_reconnect {
            warn!("auto_reconnect=false is not supported by the ESP-IDF client, reconnecting anyway");
        }

        let conf = MqttClientConfiguration {
            client_id: Some(mqtt.client_id.as_str()),
            protocol_version: Some(match mqtt.protocol {
                ProtocolVersion::V3_1 => MqttProtocolVersion::V3_1,
                ProtocolVersion::V3_1_1 => MqttProtocolVersion::V3_1_1,
            }),
            keep_alive_interval: Some(Duration::from_secs(mqtt.keep_alive_secs.into())),
            reconnect_timeout: Some(Duration::from_millis(mqtt.reconnect_delay_ms.into())),
            username: mqtt.has_auth().then(|| mqtt.username.as_str()),
            password: mqtt.has_auth().then(|| mqtt.password.as_str()),
            lwt: Some(LwtConfiguration {
                topic: mqtt.status_topic.as_str(),
                payload: door.disconnected_message.as_bytes(),
                qos: EspQoS::AtLeastOnce,
                retain: true,
            }),
            ..Default::default()
        };

        let (client, mut connection) = EspMqttClient::new(broker_uri.as_str(), &conf)?;

        let (event_tx, event_rx) = channel::<ConnectionEvent>();
        let connected = Arc::new(AtomicBool::new(false));
        let connected_flag = Arc::clone(&connected);

        thread::Builder::new()
            .stack_size(EVENT_THREAD_STACK)
            .spawn(move || pump_events(&mut connection, event_tx, connected_flag))?;

        info!("MQTT client started for {}", broker_uri);

        Ok(Self {
            client,
            event_rx,
            connected,
        })
    }
}

impl MqttClient for Esp32Mqtt {
    type Error = EspError;

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error> {
        let msg_id = self.client.publish(topic, esp_qos(qos), retain, payload)?;
        info!("sent publish successful, msg_id={}", msg_id);
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error> {
        let msg_id = self.client.subscribe(topic, esp_qos(qos))?;
        info!("sent subscribe successful, msg_id={}", msg_id);
        Ok(())
    }

    fn try_recv(&mut self) -> Option<ConnectionEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.connected.store(false, Ordering::Relaxed);
                None
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

fn esp_qos(qos: QoS) -> EspQoS {
    match qos {
        QoS::AtMostOnce => EspQoS::AtMostOnce,
        QoS::AtLeastOnce => EspQoS::AtLeastOnce,
        QoS::ExactlyOnce => EspQoS::ExactlyOnce,
    }
}

/// Convert an ESP-IDF event into a [`ConnectionEvent`].
///
/// Returns `None` for events the handler has no use for.
fn map_payload(payload: EventPayload<'_, EspError>) -> Option<ConnectionEvent> {
    match payload {
        EventPayload::Connected(_) => Some(ConnectionEvent::Connected),
        EventPayload::Disconnected => Some(ConnectionEvent::Disconnected),
        EventPayload::Published(id) => Some(ConnectionEvent::Published { msg_id: Some(id) }),
        EventPayload::Subscribed(id) => Some(ConnectionEvent::Subscribed { msg_id: Some(id) }),
        EventPayload::Received {
            topic: Some(topic),
            data,
            ..
        } => Some(ConnectionEvent::data(topic, data)),
        EventPayload::Error(e) => Some(ConnectionEvent::Error(TransportError::connection(
            format!("{:?}", e),
        ))),
        _ => None,
    }
}

fn pump_events(
    connection: &mut EspMqttConnection,
    event_tx: Sender<ConnectionEvent>,
    connected: Arc<AtomicBool>,
) {
    loop {
        match connection.next() {
            Ok(event) => {
                let Some(event) = map_payload(event.payload()) else {
                    continue;
                };
                match event {
                    ConnectionEvent::Connected => connected.store(true, Ordering::Relaxed),
                    ConnectionEvent::Disconnected => connected.store(false, Ordering::Relaxed),
                    _ => {}
                }
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("MQTT connection closed: {:?}", e);
                connected.store(false, Ordering::Relaxed);
                let _ = event_tx.send(ConnectionEvent::Error(TransportError::connection(
                    format!("{:?}", e),
                )));
                break;
            }
        }
    }
}
