//! Relay output on an ESP32 GPIO.
//!
//! ```ignore
//! use dorra::hal::esp32::door_output;
//! use dorra::traits::{DoorOutput, Polarity};
//!
//! let peripherals = Peripherals::take()?;
//! let mut door = door_output(peripherals.pins.gpio2, Polarity::ActiveHigh)?;
//! door.set_active(true)?;
//! ```

use esp_idf_hal::gpio::{Output, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;

use crate::hal::PinOutput;
use crate::traits::Polarity;

/// Door output driven through an ESP-IDF `PinDriver`.
pub type Esp32DoorOutput<'d, T> = PinOutput<PinDriver<'d, T, Output>>;

/// Configures `pin` as a push-pull output and drives it inactive.
///
/// # Errors
///
/// Returns an error if the GPIO cannot be configured or written.
pub fn door_output<'d, T: OutputPin>(
    pin: impl Peripheral<P = T> + 'd,
    polarity: Polarity,
) -> anyhow::Result<Esp32DoorOutput<'d, T>> {
    let driver = PinDriver::output(pin)?;
    PinOutput::new(driver, polarity).map_err(|e| anyhow::anyhow!("GPIO write failed: {:?}", e))
}
