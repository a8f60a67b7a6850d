//! ESP32 door controller firmware.
//!
//! This is the main entry point for the physical hardware controller.
//! It brings up NVS, the system event loop, the relay output and Wi-Fi,
//! starts the MQTT client and then runs a 50Hz loop that feeds every MQTT
//! event through the door handler.
//!
//! # Build
//!
//! ```bash
//! WIFI_SSID=MyNetwork WIFI_PASSWORD=secret MQTT_HOST=192.168.1.10 \
//!     cargo build --release --bin esp32_main --features esp32-mqtt
//!
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use std::ffi::CStr;
use std::thread;
use std::time::Duration;

use dorra::hal::esp32::{door_output, pins, Esp32Mqtt, Esp32Wifi};
use dorra::services::DoorService;
use dorra::{Config, DoorHandler, Error, MqttConfig, WifiConfig};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys;
use log::info;

/// Main loop interval in milliseconds (50Hz = 20ms)
const LOOP_INTERVAL_MS: u64 = 20;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("[APP] Startup..");
    info!("[APP] Free memory: {} bytes", unsafe { sys::esp_get_free_heap_size() });
    let idf_version = unsafe { CStr::from_ptr(sys::esp_get_idf_version()) };
    info!("[APP] IDF version: {}", idf_version.to_string_lossy());

    unsafe {
        sys::esp_log_level_set(c"*".as_ptr(), sys::esp_log_level_t_ESP_LOG_INFO);
        sys::esp_log_level_set(c"mqtt_client".as_ptr(), sys::esp_log_level_t_ESP_LOG_VERBOSE);
    }

    // =========================================================================
    // Configuration
    // =========================================================================
    let mut mqtt = MqttConfig::default();
    if let Some(host) = option_env!("MQTT_HOST") {
        mqtt = mqtt.with_host(host);
    }
    if let Some(port) = option_env!("MQTT_PORT") {
        let port = port
            .parse()
            .map_err(|_| Error::Init(format!("invalid MQTT_PORT: {}", port)))?;
        mqtt = mqtt.with_port(port);
    }
    let config = Config::default().with_mqtt(mqtt).with_wifi(
        WifiConfig::default()
            .with_ssid(option_env!("WIFI_SSID").unwrap_or(""))
            .with_password(option_env!("WIFI_PASSWORD").unwrap_or("")),
    );

    if !config.wifi.is_configured() {
        return Err(Error::Init("WIFI_SSID not set at build time".into()).into());
    }

    // =========================================================================
    // System services
    // =========================================================================
    let nvs = EspDefaultNvsPartition::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Relay output (GPIO2)
    // =========================================================================
    let output = door_output(peripherals.pins.gpio2, config.door.polarity())?;
    info!("[OK] Door output initialized (GPIO{})", pins::DOOR_OUTPUT);

    // =========================================================================
    // WiFi + MQTT
    // =========================================================================
    let wifi = Esp32Wifi::new(peripherals.modem, sysloop, Some(nvs), &config.wifi)?;
    info!("[OK] WiFi connected: {:?}", wifi.ip_addr());

    let client = Esp32Mqtt::new(&config.mqtt, &config.door)?;
    info!("[OK] MQTT client started ({})", config.mqtt.broker_uri());

    let mut service = DoorService::new(DoorHandler::from_config(&config), output, client);

    // =========================================================================
    // Main loop
    // =========================================================================
    loop {
        service.poll();
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
