//! Door output that only logs.
//!
//! Used by the desktop binary, where there is no relay to drive.

use log::info;

use crate::traits::DoorOutput;

/// Logs every output change instead of toggling a pin.
#[derive(Debug, Default)]
pub struct LogOutput {
    active: bool,
}

impl LogOutput {
    /// New output, inactive.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DoorOutput for LogOutput {
    type Error = core::convert::Infallible;

    fn set_active(&mut self, active: bool) -> Result<(), Self::Error> {
        self.active = active;
        info!("Door output {}", if active { "ON" } else { "OFF" });
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_state() {
        let mut out = LogOutput::new();
        assert!(!out.is_active());
        out.set_active(true).unwrap();
        assert!(out.is_active());
        out.set_active(false).unwrap();
        assert!(!out.is_active());
    }
}
