//! Hardware abstraction traits for the door output.
//!
//! The door drive (relay driver, or the on-board LED while bench testing) is
//! modelled as a single logical output. "Active" means the door is commanded
//! open; the electrical level that represents "active" is a property of the
//! implementation, see [`Polarity`].
//!
//! # Implementation
//!
//! For testing and desktop development, use [`crate::hal::MockOutput`]. For
//! ESP32 hardware, use `hal::esp32::Esp32DoorOutput` (requires `esp32`
//! feature).
//!
//! # Example
//!
//! ```rust
//! use dorra::traits::DoorOutput;
//! use dorra::hal::MockOutput;
//!
//! let mut output = MockOutput::new();
//! output.set_active(true).unwrap();
//! assert!(output.is_active());
//! ```

/// Electrical level that corresponds to the logical "active" state.
///
/// # Default
///
/// Defaults to [`ActiveHigh`](Self::ActiveHigh), matching the built-in LED
/// found on most ESP32 boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Polarity {
    /// Logical active drives the pin high.
    #[default]
    ActiveHigh,
    /// Logical active drives the pin low (typical for opto-isolated relay boards).
    ActiveLow,
}

impl Polarity {
    /// Build from an "active high" flag.
    pub const fn from_active_high(active_high: bool) -> Self {
        if active_high {
            Polarity::ActiveHigh
        } else {
            Polarity::ActiveLow
        }
    }

    /// Electrical pin level (`true` = high) for a logical state.
    ///
    /// # Examples
    ///
    /// ```
    /// use dorra::traits::Polarity;
    ///
    /// assert!(Polarity::ActiveHigh.pin_level(true));
    /// assert!(!Polarity::ActiveLow.pin_level(true));
    /// assert!(Polarity::ActiveLow.pin_level(false));
    /// ```
    #[inline]
    pub const fn pin_level(&self, active: bool) -> bool {
        match self {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        }
    }
}

/// Door output trait - abstracts the GPIO that drives the door relay.
///
/// # Implementation Notes
///
/// - `set_active` takes the *logical* state; polarity is applied by the
///   implementation
/// - Implementations should drive the inactive level when constructed
/// - `is_active` reports the last logical state written
///
/// # Example Implementation
///
/// ```rust,ignore
/// use dorra::traits::DoorOutput;
///
/// struct RelayPin { /* hardware handle */ active: bool }
///
/// impl DoorOutput for RelayPin {
///     type Error = ();
///
///     fn set_active(&mut self, active: bool) -> Result<(), ()> {
///         // Write the GPIO register...
///         self.active = active;
///         Ok(())
///     }
///
///     fn is_active(&self) -> bool {
///         self.active
///     }
/// }
/// ```
pub trait DoorOutput {
    /// Error type for output operations.
    type Error: core::fmt::Debug;

    /// Drive the output to the given logical state.
    fn set_active(&mut self, active: bool) -> Result<(), Self::Error>;

    /// Last logical state written.
    fn is_active(&self) -> bool;
}
