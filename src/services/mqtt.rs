//! Desktop MQTT transport for the door handler.
//!
//! Runs a `rumqttc` event loop, converts each packet into a
//! [`ConnectionEvent`] and feeds it through a [`DoorService`]. The outgoing
//! side is [`RumqttcClient`], which queues publish/subscribe requests on the
//! `AsyncClient` without awaiting; the event loop flushes them on its next
//! poll.
//!
//! **Subscribe Topics:**
//! - `/dorra/control` - `open` or `close`
//!
//! **Publish Topics:**
//! - `/dorra/status` - connected message, acknowledgments, last-will (all retained)
//!
//! # Example
//!
//! ```ignore
//! use dorra::config::Config;
//! use dorra::hal::LogOutput;
//! use dorra::services::MqttHandler;
//!
//! let handler = MqttHandler::from_config(&Config::default(), LogOutput::new());
//! handler.run().await?;
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use log::{info, warn};
use rumqttc::{AsyncClient, ClientError, ConnectReturnCode, Event, LastWill, MqttOptions, Packet};

use crate::config::{Config, ProtocolVersion};
use crate::error::TransportError;
use crate::events::ConnectionEvent;
use crate::handler::DoorHandler;
use crate::traits::{DoorOutput, MqttClient, QoS};

use super::runner::DoorService;

/// Capacity of the request channel between `AsyncClient` and the event loop.
const REQUEST_CAPACITY: usize = 10;

// ============================================================================
// Configuration
// ============================================================================

/// Runtime MQTT client configuration for `rumqttc`.
///
/// This struct uses `String` for runtime compatibility with the `rumqttc` library.
/// For embedded/no-alloc contexts, use [`crate::config::MqttConfig`] which uses
/// fixed-size strings and convert with [`MqttRuntimeConfig::from_config`].
#[derive(Debug, Clone)]
pub struct MqttRuntimeConfig {
    /// MQTT broker hostname
    pub host: String,
    /// MQTT broker port
    pub port: u16,
    /// Client ID
    pub client_id: String,
    /// Credentials, if the broker requires them
    pub credentials: Option<(String, String)>,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
    /// Requested protocol revision
    pub protocol: ProtocolVersion,
    /// Topic the last-will is published on
    pub status_topic: String,
    /// Last-will payload
    pub disconnected_message: String,
    /// Keep polling after a connection error
    pub auto_reconnect: bool,
    /// Pause before the next connection attempt
    pub reconnect_delay_ms: u64,
}

impl Default for MqttRuntimeConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MqttRuntimeConfig {
    /// Create from the shared application config
    pub fn from_config(config: &Config) -> Self {
        let mqtt = &config.mqtt;
        Self {
            host: mqtt.host.as_str().to_string(),
            port: mqtt.port,
            client_id: mqtt.client_id.as_str().to_string(),
            credentials: mqtt.has_auth().then(|| {
                (
                    mqtt.username.as_str().to_string(),
                    mqtt.password.as_str().to_string(),
                )
            }),
            keep_alive_secs: mqtt.keep_alive_secs,
            protocol: mqtt.protocol,
            status_topic: mqtt.status_topic.as_str().to_string(),
            disconnected_message: config.door.disconnected_message.as_str().to_string(),
            auto_reconnect: mqtt.auto_reconnect,
            reconnect_delay_ms: mqtt.reconnect_delay_ms as u64,
        }
    }

    /// Build `rumqttc` options, including the retained last-will.
    pub fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive_secs as u64));
        if let Some((username, password)) = &self.credentials {
            options.set_credentials(username, password);
        }
        options.set_last_will(LastWill::new(
            &self.status_topic,
            self.disconnected_message.as_bytes().to_vec(),
            rumqttc::QoS::AtLeastOnce,
            true,
        ));
        options
    }
}

// ============================================================================
// Outgoing side
// ============================================================================

/// [`MqttClient`] over a `rumqttc::AsyncClient`.
///
/// Incoming events are pushed in by the event loop driver with
/// [`push`](Self::push) and drained by the service through `try_recv()`.
pub struct RumqttcClient {
    client: AsyncClient,
    pending: VecDeque<ConnectionEvent>,
    connected: bool,
}

impl RumqttcClient {
    /// Wrap an `AsyncClient`.
    pub fn new(client: AsyncClient) -> Self {
        Self {
            client,
            pending: VecDeque::new(),
            connected: false,
        }
    }

    /// Queue an event for the service and track connection state.
    pub fn push(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => self.connected = true,
            ConnectionEvent::Disconnected => self.connected = false,
            _ => {}
        }
        self.pending.push_back(event);
    }
}

impl MqttClient for RumqttcClient {
    type Error = ClientError;

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), Self::Error> {
        self.client
            .try_publish(topic, rumqttc_qos(qos), retain, payload.to_vec())
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error> {
        self.client.try_subscribe(topic, rumqttc_qos(qos))
    }

    fn try_recv(&mut self) -> Option<ConnectionEvent> {
        self.pending.pop_front()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

fn rumqttc_qos(qos: QoS) -> rumqttc::QoS {
    match qos {
        QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
        QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
        QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
    }
}

/// Convert a `rumqttc` event into a [`ConnectionEvent`].
///
/// Outgoing packets and pings map to `None`.
pub fn map_event(event: &Event) -> Option<ConnectionEvent> {
    let Event::Incoming(packet) = event else {
        return None;
    };
    match packet {
        Packet::ConnAck(ack) if ack.code == ConnectReturnCode::Success => {
            Some(ConnectionEvent::Connected)
        }
        Packet::ConnAck(ack) => Some(ConnectionEvent::Error(TransportError::connection(
            format!("connection refused: {:?}", ack.code),
        ))),
        Packet::Publish(publish) => Some(ConnectionEvent::data(
            publish.topic.clone(),
            publish.payload.to_vec(),
        )),
        Packet::PubAck(ack) => Some(ConnectionEvent::Published {
            msg_id: Some(ack.pkid as u32),
        }),
        Packet::SubAck(ack) => Some(ConnectionEvent::Subscribed {
            msg_id: Some(ack.pkid as u32),
        }),
        Packet::Disconnect => Some(ConnectionEvent::Disconnected),
        _ => None,
    }
}

// ============================================================================
// MQTT Handler
// ============================================================================

/// Drives a [`DoorService`] from a `rumqttc` event loop.
pub struct MqttHandler<O: DoorOutput> {
    config: MqttRuntimeConfig,
    handler: DoorHandler,
    output: O,
}

impl<O: DoorOutput> MqttHandler<O> {
    /// Create a handler from explicit parts.
    pub fn new(config: MqttRuntimeConfig, handler: DoorHandler, output: O) -> Self {
        Self {
            config,
            handler,
            output,
        }
    }

    /// Create a handler from the shared application config.
    pub fn from_config(config: &Config, output: O) -> Self {
        Self::new(
            MqttRuntimeConfig::from_config(config),
            DoorHandler::from_config(config),
            output,
        )
    }

    /// Runtime configuration.
    pub fn config(&self) -> &MqttRuntimeConfig {
        &self.config
    }

    /// Run the MQTT handler.
    ///
    /// Never returns while `auto_reconnect` is set. Otherwise the first
    /// connection error is reported through the handler and then returned.
    pub async fn run(self) -> Result<(), TransportError> {
        let Self {
            config,
            handler,
            output,
        } = self;

        if config.protocol == ProtocolVersion::V3_1 {
            warn!("MQTT 3.1 requested, rumqttc speaks 3.1.1 only");
        }

        let (client, mut eventloop) = AsyncClient::new(config.options(), REQUEST_CAPACITY);
        let mut service = DoorService::new(handler, output, RumqttcClient::new(client));

        info!("MQTT connecting to {}:{}", config.host, config.port);

        loop {
            match eventloop.poll().await {
                Ok(event) => {
                    if let Some(event) = map_event(&event) {
                        service.client_mut().push(event);
                    }
                    service.poll();
                }
                Err(e) => {
                    let err = TransportError::connection(e.to_string());
                    let was_connected = service.client().is_connected();
                    service.client_mut().push(ConnectionEvent::Error(err.clone()));
                    if was_connected {
                        service.client_mut().push(ConnectionEvent::Disconnected);
                    }
                    service.poll();

                    if !config.auto_reconnect {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(config.reconnect_delay_ms)).await;
                }
            }
        }
    }
}
