//! Error taxonomy for the door controller.
//!
//! | Variant | Severity | Handling |
//! |---------|----------|----------|
//! | [`Error::Init`] | fatal | startup aborts, no partial start |
//! | [`Error::Transport`] | non-fatal | logged, transport reconnects on its own |
//! | [`Error::UnrecognizedCommand`] | non-fatal | logged, no state change |
//!
//! Only initialization failures ever leave the process; everything that
//! happens after the event loop is running is surfaced through the log sink.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Where a transport-level failure originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection to the broker failed or dropped.
    Connection,
    /// A publish request was rejected by the client.
    Publish,
    /// A subscribe request was rejected by the client.
    Subscribe,
    /// Writing the door output failed.
    Output,
}

impl TransportErrorKind {
    /// Short lowercase label used in log lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Connection => "connection",
            TransportErrorKind::Publish => "publish",
            TransportErrorKind::Subscribe => "subscribe",
            TransportErrorKind::Output => "output",
        }
    }
}

/// A non-fatal runtime failure reported by a collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportError {
    /// Origin of the failure.
    pub kind: TransportErrorKind,
    /// Collaborator-provided detail (error code, errno string, ...).
    pub message: String,
}

impl TransportError {
    /// Create a new transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connection, message)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind.as_str(), self.message)
    }
}

/// Door controller errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Startup could not complete (storage, network stack, GPIO, Wi-Fi, MQTT).
    Init(String),
    /// A collaborator failed at runtime.
    Transport(TransportError),
    /// A control payload matched neither command.
    UnrecognizedCommand(Vec<u8>),
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

impl Error {
    /// Whether this error must abort the process.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Error::Init(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "initialization failed: {}", e),
            Self::Transport(e) => write!(f, "transport {}", e),
            Self::UnrecognizedCommand(payload) => write!(
                f,
                "unrecognized command: {:?}",
                String::from_utf8_lossy(payload)
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
