//! Desktop door controller.
//!
//! Runs the door handler against a real broker with a logging output in
//! place of the relay. Useful for exercising the topics before flashing.
//!
//! # Usage
//!
//! ```sh
//! MQTT_HOST=localhost MQTT_PORT=1883 RUST_LOG=debug \
//!     cargo run --bin desktop_main --features mqtt
//!
//! mosquitto_pub -t /dorra/control -m open
//! mosquitto_sub -t /dorra/status -v
//! ```

use dorra::hal::LogOutput;
use dorra::services::MqttHandler;
use dorra::{Config, Error, MqttConfig};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut mqtt = MqttConfig::default();
    if let Ok(host) = std::env::var("MQTT_HOST") {
        mqtt = mqtt.with_host(&host);
    }
    if let Ok(port) = std::env::var("MQTT_PORT") {
        let port = port
            .parse()
            .map_err(|_| Error::Init(format!("invalid MQTT_PORT: {}", port)))?;
        mqtt = mqtt.with_port(port);
    }
    let config = Config::default().with_mqtt(mqtt);

    info!(
        "Starting {} (broker={}, control={}, status={})",
        config.device.name,
        config.mqtt.broker_uri(),
        config.mqtt.control_topic,
        config.mqtt.status_topic,
    );

    MqttHandler::from_config(&config, LogOutput::new())
        .run()
        .await?;
    Ok(())
}
