//! WiFi connection management for ESP32.
//!
//! Provides synchronous WiFi station mode connection using esp-idf-svc.
//!
//! # Example
//!
//! ```ignore
//! use dorra::hal::esp32::Esp32Wifi;
//! use dorra::config::WifiConfig;
//!
//! let config = WifiConfig::default()
//!     .with_ssid("MyNetwork")
//!     .with_password("secret123");
//!
//! let wifi = Esp32Wifi::new(modem, sysloop, Some(nvs), &config)?;
//! log::info!("IP: {:?}", wifi.ip_addr());
//! ```

use std::net::Ipv4Addr;

use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use crate::config::{bounded, WifiConfig};

/// WiFi connection manager for ESP32.
///
/// Manages a station-mode WiFi connection. The connection is established
/// during construction and maintained for the lifetime of this struct.
pub struct Esp32Wifi<'a> {
    wifi: BlockingWifi<EspWifi<'a>>,
}

impl<'a> Esp32Wifi<'a> {
    /// Create a new WiFi connection.
    ///
    /// Starts station mode, associates with the access point (retrying up to
    /// `config.max_retries` times) and waits for DHCP.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to start, every association
    /// attempt fails, or DHCP times out.
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &WifiConfig,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        let ssid = config.ssid.as_str();
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: bounded::<32>(ssid),
            password: bounded::<64>(config.password.as_str()),
            ..Default::default()
        }))?;

        info!("wifi_init_sta finished.");
        wifi.start()?;

        let attempts = config.max_retries.max(1);
        let mut attempt = 1;
        loop {
            info!("connecting to ap SSID:{} (attempt {}/{})", ssid, attempt, attempts);
            match wifi.connect() {
                Ok(()) => break,
                Err(e) if attempt < attempts => {
                    warn!("connect to the AP fail: {:?}", e);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to SSID:{} after {} attempts: {:?}",
                        ssid,
                        attempts,
                        e
                    ))
                }
            }
        }

        wifi.wait_netif_up()?;

        if let Ok(ip_info) = wifi.wifi().sta_netif().get_ip_info() {
            info!("got ip:{}", ip_info.ip);
        }

        Ok(Self { wifi })
    }

    /// Get the current IP address, if connected.
    pub fn ip_addr(&self) -> Option<Ipv4Addr> {
        self.wifi
            .wifi()
            .sta_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip)
    }

    /// Check if WiFi is connected.
    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }
}
