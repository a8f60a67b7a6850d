//! Shared configuration for desktop and ESP32.
//!
//! Uses `heapless::String` so the same structs work on the device without an
//! allocator-heavy config layer. Topic names are configuration rather than
//! constants: the firmware historically used `/dorra/control` and
//! `/dorra/status`, and those are the defaults here.
//!
//! Topics and status messages must arrive intact, so their builders return
//! [`Error::Init`] for values longer than the field capacity instead of
//! truncating them.
//!
//! # Example
//!
//! ```rust
//! use dorra::config::{Config, DoorConfig, MqttConfig};
//!
//! # fn main() -> Result<(), dorra::Error> {
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.mqtt.control_topic.as_str(), "/dorra/control");
//!
//! // Or customize
//! let config = Config::default()
//!     .with_mqtt(
//!         MqttConfig::default()
//!             .with_host("192.168.1.100")
//!             .with_control_topic("/dorra/door/control")?
//!             .with_status_topic("/dorra/door/state")?,
//!     )
//!     .with_door(DoorConfig::default().with_active_high(false));
//! # Ok(())
//! # }
//! ```

use alloc::format;

use heapless::String as HString;

use crate::error::Error;
use crate::traits::Polarity;

/// Maximum length for short config strings (hostnames, client IDs, messages)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (topics, URIs)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

// ============================================================================
// Helpers for creating heapless strings
// ============================================================================

/// Copy `s` into a fixed-capacity string, truncating on a char boundary.
pub fn bounded<const N: usize>(s: &str) -> HString<N> {
    let mut end = s.len().min(N);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut hs = HString::new();
    // Cannot fail: `end <= N`.
    let _ = hs.push_str(&s[..end]);
    hs
}

/// Copy `s` into a fixed-capacity string, rejecting values that do not fit.
///
/// `field` names the setting in the error message.
pub fn fitted<const N: usize>(field: &str, s: &str) -> Result<HString<N>, Error> {
    let mut hs = HString::new();
    hs.push_str(s).map_err(|_| {
        Error::Init(format!(
            "{} is {} bytes, limit is {}",
            field,
            s.len(),
            N
        ))
    })?;
    Ok(hs)
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    bounded::<MAX_SHORT_STRING>(s)
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    bounded::<MAX_LONG_STRING>(s)
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// WiFi connection configuration
    pub wifi: WifiConfig,
    /// MQTT client configuration
    pub mqtt: MqttConfig,
    /// Door output and message configuration
    pub door: DoorConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set WiFi configuration
    pub fn with_wifi(mut self, wifi: WifiConfig) -> Self {
        self.wifi = wifi;
        self
    }

    /// Set MQTT configuration
    pub fn with_mqtt(mut self, mqtt: MqttConfig) -> Self {
        self.mqtt = mqtt;
        self
    }

    /// Set door configuration
    pub fn with_door(mut self, door: DoorConfig) -> Self {
        self.door = door;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// MQTT Config
// ============================================================================

/// MQTT protocol revision requested from the client library.
///
/// The first firmware connected with MQTT 5. Nothing it relied on (last-will,
/// QoS 1, retain) needs 5, so only the 3.x revisions both transports share
/// are offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolVersion {
    /// MQTT 3.1
    V3_1,
    /// MQTT 3.1.1
    #[default]
    V3_1_1,
}

/// MQTT client configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MqttConfig {
    /// Broker hostname or IP
    pub host: ShortString,
    /// Broker port
    pub port: u16,
    /// Client ID (should be unique per device)
    pub client_id: ShortString,
    /// Topic carrying "open"/"close" commands
    pub control_topic: LongString,
    /// Topic for status, acknowledgments and the last-will
    pub status_topic: LongString,
    /// Username for authentication (empty = no auth)
    pub username: ShortString,
    /// Password for authentication
    pub password: ShortString,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
    /// Protocol revision
    pub protocol: ProtocolVersion,
    /// Let the client reconnect on its own after a connection loss
    pub auto_reconnect: bool,
    /// Pause between reconnect attempts in milliseconds
    pub reconnect_delay_ms: u32,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: short_string("test.mosquitto.org"),
            port: 1883,
            client_id: short_string("dorra"),
            control_topic: long_string("/dorra/control"),
            status_topic: long_string("/dorra/status"),
            username: ShortString::new(),
            password: ShortString::new(),
            keep_alive_secs: 120,
            protocol: ProtocolVersion::V3_1_1,
            auto_reconnect: true,
            reconnect_delay_ms: 10_000,
        }
    }
}

impl MqttConfig {
    /// Set the broker host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = short_string(host);
        self
    }

    /// Set the broker port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the client ID
    pub fn with_client_id(mut self, id: &str) -> Self {
        self.client_id = short_string(id);
        self
    }

    /// Set the control topic
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if `topic` exceeds [`MAX_LONG_STRING`] bytes.
    pub fn with_control_topic(mut self, topic: &str) -> Result<Self, Error> {
        self.control_topic = fitted("control_topic", topic)?;
        Ok(self)
    }

    /// Set the status topic
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if `topic` exceeds [`MAX_LONG_STRING`] bytes.
    pub fn with_status_topic(mut self, topic: &str) -> Result<Self, Error> {
        self.status_topic = fitted("status_topic", topic)?;
        Ok(self)
    }

    /// Set authentication credentials
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.username = short_string(username);
        self.password = short_string(password);
        self
    }

    /// Set the keep-alive interval
    pub fn with_keep_alive_secs(mut self, secs: u16) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Set the protocol revision
    pub fn with_protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }

    /// Enable or disable automatic reconnect
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Set the reconnect delay
    pub fn with_reconnect_delay_ms(mut self, ms: u32) -> Self {
        self.reconnect_delay_ms = ms;
        self
    }

    /// Broker URI in the form `mqtt://host:port`
    pub fn broker_uri(&self) -> LongString {
        let mut uri = LongString::new();
        let _ = core::fmt::write(
            &mut uri,
            format_args!("mqtt://{}:{}", self.host.as_str(), self.port),
        );
        uri
    }

    /// Check if authentication is configured
    pub fn has_auth(&self) -> bool {
        !self.username.is_empty()
    }
}

// ============================================================================
// Door Config
// ============================================================================

/// GPIO driving the relay (the built-in LED on most boards).
pub const DEFAULT_OUTPUT_PIN: i32 = 2;

/// Door output and status message configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoorConfig {
    /// GPIO number the relay is wired to. Informational: the firmware always
    /// drives [`DEFAULT_OUTPUT_PIN`].
    pub output_pin: i32,
    /// Whether the relay is energised by a high level
    pub active_high: bool,
    /// Published on the status topic after connecting
    pub connected_message: ShortString,
    /// Last-will published by the broker on unexpected disconnect
    pub disconnected_message: ShortString,
    /// Acknowledgment for "open"
    pub open_ack: ShortString,
    /// Acknowledgment for "close"
    pub close_ack: ShortString,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            output_pin: DEFAULT_OUTPUT_PIN,
            active_high: true,
            connected_message: short_string("ESP Connected"),
            disconnected_message: short_string("ESP Disconnected"),
            open_ack: short_string("it's open"),
            close_ack: short_string("it's closed"),
        }
    }
}

impl DoorConfig {
    /// Set the output GPIO number
    pub fn with_output_pin(mut self, pin: i32) -> Self {
        self.output_pin = pin;
        self
    }

    /// Set the output polarity
    pub fn with_active_high(mut self, active_high: bool) -> Self {
        self.active_high = active_high;
        self
    }

    /// Set the connected status message
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if `msg` exceeds [`MAX_SHORT_STRING`] bytes.
    pub fn with_connected_message(mut self, msg: &str) -> Result<Self, Error> {
        self.connected_message = fitted("connected_message", msg)?;
        Ok(self)
    }

    /// Set the last-will message
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if `msg` exceeds [`MAX_SHORT_STRING`] bytes.
    pub fn with_disconnected_message(mut self, msg: &str) -> Result<Self, Error> {
        self.disconnected_message = fitted("disconnected_message", msg)?;
        Ok(self)
    }

    /// Set both acknowledgment messages
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if either message exceeds [`MAX_SHORT_STRING`] bytes.
    pub fn with_acks(mut self, open: &str, close: &str) -> Result<Self, Error> {
        self.open_ack = fitted("open_ack", open)?;
        self.close_ack = fitted("close_ack", close)?;
        Ok(self)
    }

    /// Output polarity derived from `active_high`
    pub fn polarity(&self) -> Polarity {
        Polarity::from_active_high(self.active_high)
    }
}

// ============================================================================
// WiFi Config
// ============================================================================

/// WiFi connection configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiConfig {
    /// WiFi network SSID
    pub ssid: ShortString,
    /// WiFi password
    pub password: ShortString,
    /// Maximum association attempts before startup fails
    pub max_retries: u8,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: ShortString::new(),
            password: ShortString::new(),
            max_retries: 5,
        }
    }
}

impl WifiConfig {
    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the maximum retry count
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Check if WiFi credentials are configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name, also the log tag
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("mqtt5_dorra"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topics_follow_firmware() {
        let config = Config::default();
        assert_eq!(config.mqtt.control_topic.as_str(), "/dorra/control");
        assert_eq!(config.mqtt.status_topic.as_str(), "/dorra/status");
    }

    #[test]
    fn default_messages() {
        let door = DoorConfig::default();
        assert_eq!(door.connected_message.as_str(), "ESP Connected");
        assert_eq!(door.disconnected_message.as_str(), "ESP Disconnected");
        assert_eq!(door.open_ack.as_str(), "it's open");
        assert_eq!(door.close_ack.as_str(), "it's closed");
        assert_eq!(door.output_pin, DEFAULT_OUTPUT_PIN);
        assert_eq!(DEFAULT_OUTPUT_PIN, 2);
        assert!(door.active_high);
    }

    #[test]
    fn mqtt_config_default() {
        let mqtt = MqttConfig::default();
        assert_eq!(mqtt.host.as_str(), "test.mosquitto.org");
        assert_eq!(mqtt.port, 1883);
        assert_eq!(mqtt.client_id.as_str(), "dorra");
        assert!(mqtt.username.is_empty());
        assert_eq!(mqtt.protocol, ProtocolVersion::V3_1_1);
        assert!(mqtt.auto_reconnect);
    }

    #[test]
    fn broker_uri() {
        let mqtt = MqttConfig::default().with_host("192.168.1.10").with_port(1884);
        assert_eq!(mqtt.broker_uri().as_str(), "mqtt://192.168.1.10:1884");
    }

    #[test]
    fn mqtt_auth_detection() {
        let no_auth = MqttConfig::default();
        assert!(!no_auth.has_auth());

        let with_auth = MqttConfig::default().with_auth("user", "pass");
        assert!(with_auth.has_auth());
    }

    #[test]
    fn mqtt_config_full_builder() {
        let mqtt = MqttConfig::default()
            .with_host("broker.example.com")
            .with_port(8883)
            .with_client_id("front-door")
            .with_control_topic("/dorra/door/control")
            .unwrap()
            .with_status_topic("/dorra/door/state")
            .unwrap()
            .with_keep_alive_secs(60)
            .with_protocol(ProtocolVersion::V3_1)
            .with_auto_reconnect(false)
            .with_reconnect_delay_ms(500);

        assert_eq!(mqtt.host.as_str(), "broker.example.com");
        assert_eq!(mqtt.port, 8883);
        assert_eq!(mqtt.client_id.as_str(), "front-door");
        assert_eq!(mqtt.control_topic.as_str(), "/dorra/door/control");
        assert_eq!(mqtt.status_topic.as_str(), "/dorra/door/state");
        assert_eq!(mqtt.keep_alive_secs, 60);
        assert_eq!(mqtt.protocol, ProtocolVersion::V3_1);
        assert!(!mqtt.auto_reconnect);
        assert_eq!(mqtt.reconnect_delay_ms, 500);
    }

    #[test]
    fn door_config_builder() {
        let door = DoorConfig::default()
            .with_output_pin(5)
            .with_active_high(false)
            .with_connected_message("online")
            .unwrap()
            .with_disconnected_message("offline")
            .unwrap()
            .with_acks("opened", "closed")
            .unwrap();

        assert_eq!(door.output_pin, 5);
        assert_eq!(door.polarity(), Polarity::ActiveLow);
        assert_eq!(door.connected_message.as_str(), "online");
        assert_eq!(door.disconnected_message.as_str(), "offline");
        assert_eq!(door.open_ack.as_str(), "opened");
        assert_eq!(door.close_ack.as_str(), "closed");
    }

    #[test]
    fn wifi_config_is_configured() {
        let unconfigured = WifiConfig::default();
        assert!(!unconfigured.is_configured());

        let configured = WifiConfig::default().with_ssid("MyNetwork");
        assert!(configured.is_configured());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_wifi(WifiConfig::default().with_ssid("HomeWifi").with_max_retries(2))
            .with_mqtt(MqttConfig::default().with_host("broker.local"))
            .with_device(DeviceConfig::default().with_name("garage"));

        assert_eq!(config.wifi.ssid.as_str(), "HomeWifi");
        assert_eq!(config.wifi.max_retries, 2);
        assert_eq!(config.mqtt.host.as_str(), "broker.local");
        assert_eq!(config.device.name.as_str(), "garage");
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn long_string_truncation() {
        let long_input = "b".repeat(200);
        let s = long_string(&long_input);
        assert_eq!(s.len(), MAX_LONG_STRING);
    }

    #[test]
    fn topic_at_capacity_is_accepted() {
        let topic = "t".repeat(MAX_LONG_STRING);
        let mqtt = MqttConfig::default().with_control_topic(&topic).unwrap();
        assert_eq!(mqtt.control_topic.as_str(), topic);
    }

    #[test]
    fn over_long_topics_are_rejected() {
        let topic = format!("/site/{}/door/control", "b".repeat(120));
        assert!(topic.len() > MAX_LONG_STRING);

        let err = MqttConfig::default().with_control_topic(&topic).unwrap_err();
        assert!(err.is_fatal());
        assert!(format!("{}", err).contains("control_topic"));
        assert!(MqttConfig::default().with_status_topic(&topic).is_err());
    }

    #[test]
    fn over_long_messages_are_rejected() {
        let msg = "m".repeat(MAX_SHORT_STRING + 1);
        let door = DoorConfig::default();

        assert!(door.clone().with_connected_message(&msg).is_err());
        assert!(door.clone().with_disconnected_message(&msg).is_err());
        assert!(door.clone().with_acks(&msg, "closed").is_err());
        let err = door.with_acks("opened", &msg).unwrap_err();
        assert!(format!("{}", err).contains("close_ack"));
    }

    #[test]
    fn truncation_respects_utf8_boundary() {
        // 63 ASCII bytes followed by a 4-byte char that straddles the limit
        let input = format!("{}{}", "x".repeat(63), "\u{1F6AA}");
        let s = short_string(&input);
        assert_eq!(s.len(), 63);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
