//! Door commands and payload classification.
//!
//! A control payload is classified by exact byte comparison against the two
//! command literals. There is no trimming, no case folding and no prefix
//! matching: `"open"` opens, `"OPEN"`, `"open "`, `"o"` and `""` do nothing.
//!
//! ```rust
//! use dorra::DoorCommand;
//!
//! assert_eq!(DoorCommand::classify(b"open"), DoorCommand::Open);
//! assert_eq!(DoorCommand::classify(b"close"), DoorCommand::Close);
//! assert_eq!(DoorCommand::classify(b"OPEN"), DoorCommand::Unknown);
//! ```

/// Payload literal that opens the door.
pub const CMD_OPEN: &[u8] = b"open";

/// Payload literal that closes the door.
pub const CMD_CLOSE: &[u8] = b"close";

/// Command derived from a control payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorCommand {
    /// Drive the output active and acknowledge as open.
    Open,
    /// Drive the output inactive and acknowledge as closed.
    Close,
    /// Anything else. No state change, no acknowledgment.
    Unknown,
}

impl DoorCommand {
    /// Classify a payload. Pure function of the bytes.
    #[inline]
    pub fn classify(payload: &[u8]) -> Self {
        if payload == CMD_OPEN {
            DoorCommand::Open
        } else if payload == CMD_CLOSE {
            DoorCommand::Close
        } else {
            DoorCommand::Unknown
        }
    }

    /// Output state this command requests, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use dorra::DoorCommand;
    ///
    /// assert_eq!(DoorCommand::Open.target_state(), Some(true));
    /// assert_eq!(DoorCommand::Close.target_state(), Some(false));
    /// assert_eq!(DoorCommand::Unknown.target_state(), None);
    /// ```
    #[inline]
    pub const fn target_state(&self) -> Option<bool> {
        match self {
            DoorCommand::Open => Some(true),
            DoorCommand::Close => Some(false),
            DoorCommand::Unknown => None,
        }
    }

    /// Lowercase name for logging.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DoorCommand::Open => "open",
            DoorCommand::Close => "close",
            DoorCommand::Unknown => "unknown",
        }
    }
}
