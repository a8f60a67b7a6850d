//! Door output on any `embedded-hal` digital pin.
//!
//! [`PinOutput`] maps the logical door state onto an electrical level using a
//! [`Polarity`], so relay boards that switch on a low input work the same as
//! ones that switch on high. The ESP32 output is this type wrapped around a
//! `PinDriver`.

use embedded_hal::digital::{OutputPin, PinState};

use crate::traits::{DoorOutput, Polarity};

/// Digital output pin driving the door relay.
#[derive(Debug)]
pub struct PinOutput<P> {
    pin: P,
    polarity: Polarity,
    active: bool,
}

impl<P: OutputPin> PinOutput<P> {
    /// Wraps `pin` and immediately drives it to the inactive level.
    ///
    /// # Errors
    ///
    /// Returns the pin error if the initial write fails.
    pub fn new(mut pin: P, polarity: Polarity) -> Result<Self, P::Error> {
        pin.set_state(PinState::from(polarity.pin_level(false)))?;
        Ok(Self {
            pin,
            polarity,
            active: false,
        })
    }

    /// Configured polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Releases the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> DoorOutput for PinOutput<P> {
    type Error = P::Error;

    fn set_active(&mut self, active: bool) -> Result<(), Self::Error> {
        self.pin
            .set_state(PinState::from(self.polarity.pin_level(active)))?;
        self.active = active;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
