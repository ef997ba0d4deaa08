//! Error types for pdulib.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer and protocol-layer
//! errors are all captured here.

/// The error type for all pdulib operations.
///
/// Variants cover the failure modes of one request/response exchange with
/// the power-distribution unit: transport failures, the two distinct
/// timeout conditions, and malformed replies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error that is not a timeout (port busy,
    /// device node vanished, parameter rejected by the OS).
    #[error("transport error: {0}")]
    Transport(String),

    /// Timed out waiting for the device to send any bytes.
    ///
    /// Raised by the transport when nothing arrives within the configured
    /// read window. For the battery-charge query this is reinterpreted as
    /// "no battery connected"; for every other operation it is fatal.
    #[error("timeout waiting for reply")]
    Timeout,

    /// The reply reached the command's maximum length without a
    /// complete frame.
    ///
    /// This is a driver-layer policy, distinct from [`Error::Timeout`]:
    /// bytes *did* arrive, but the frame predicate was never satisfied
    /// within the space the command allows.
    #[error("no complete frame within {max} bytes ({received} received)")]
    FramingTimeout {
        /// Bytes accumulated when the exchange was abandoned.
        received: usize,
        /// The command's maximum reply length.
        max: usize,
    },

    /// A complete frame arrived but its fields are missing, out of
    /// order, oversized, or non-numeric.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// No connection to the device has been established, or the
    /// transport has been closed.
    #[error("not connected")]
    NotConnected,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_timeout() {
        let e = Error::Timeout;
        assert_eq!(e.to_string(), "timeout waiting for reply");
    }

    #[test]
    fn error_display_framing_timeout() {
        let e = Error::FramingTimeout {
            received: 15,
            max: 15,
        };
        assert_eq!(e.to_string(), "no complete frame within 15 bytes (15 received)");
    }

    #[test]
    fn error_display_malformed_reply() {
        let e = Error::MalformedReply("no full VA response delivered".into());
        assert_eq!(
            e.to_string(),
            "malformed reply: no full VA response delivered"
        );
    }

    #[test]
    fn error_display_not_connected() {
        let e = Error::NotConnected;
        assert_eq!(e.to_string(), "not connected");
    }

    #[test]
    fn error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = Error::from(io);
        assert!(matches!(e, Error::Io(_)));
    }
}
