//! Error taxonomy shared by both game modes.
//!
//! We avoid `alloc` here - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

use core::fmt;

/// Every failure a game mode can observe.
///
/// None of these is fatal to the device: `InvalidKey`, `ServerError` and
/// `ConnectionError` are shown transiently and the loop continues,
/// `EmptyResult` ends the current run and returns to the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// A key outside the range that is valid in the current state.
    InvalidKey,

    /// The server answered with a non-200 status.
    ServerError(u16),

    /// Transport-level failure, or a response we could not make sense of.
    ConnectionError,

    /// The server returned no usable data (no sessions, no sequence).
    EmptyResult,
}

impl ErrorKind {
    /// Short screen text for the transient message.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidKey => "Invalid key",
            ErrorKind::ServerError(_) => "Server Error",
            ErrorKind::ConnectionError => "Connection Error",
            ErrorKind::EmptyResult => "No data",
        }
    }

    /// Whether the run can carry on after showing the message.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::EmptyResult)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ServerError(status) => write!(f, "server error (HTTP {})", status),
            ErrorKind::InvalidKey => f.write_str("invalid key"),
            ErrorKind::ConnectionError => f.write_str("connection error"),
            ErrorKind::EmptyResult => f.write_str("empty result"),
        }
    }
}

/// Failure reported by an `HttpTransport` implementation.
///
/// Kept coarse on purpose: all of them surface as `ConnectionError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No network link (Wi-Fi down, DHCP not finished).
    NoLink,
    /// DNS lookup failed.
    Dns,
    /// TCP/TLS connection could not be established.
    Connect,
    /// Read/write failed mid-request.
    Io,
    /// The response did not fit the receive buffer.
    BufferOverflow,
}

impl From<TransportError> for ErrorKind {
    fn from(_: TransportError) -> Self {
        ErrorKind::ConnectionError
    }
}

impl From<serde_json::Error> for ErrorKind {
    fn from(_: serde_json::Error) -> Self {
        ErrorKind::ConnectionError
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransportError::NoLink => "no network link",
            TransportError::Dns => "dns lookup failed",
            TransportError::Connect => "connect failed",
            TransportError::Io => "i/o error",
            TransportError::BufferOverflow => "response too large",
        };
        f.write_str(text)
    }
}
