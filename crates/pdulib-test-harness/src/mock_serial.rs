//! Mock transport for deterministic testing of the protocol engine.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs. This lets you test request encoding, reply
//! framing, and field decoding without real hardware.
//!
//! # Example
//!
//! ```
//! use pdulib_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // Pre-load: when the driver sends this request, return this reply.
//! mock.expect(b"St", b"ON\x00");
//! // Or simulate a device that stays silent (battery absent):
//! mock.expect_no_reply(b"Bt");
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use pdulib_core::error::{Error, Result};
use pdulib_core::transport::Transport;

/// A pre-loaded request/response pair for the mock transport.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// The bytes to return on subsequent reads, or `None` to time out
    /// every read for this exchange.
    response: Option<Vec<u8>>,
}

/// A mock [`Transport`] for testing the driver without hardware.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// data is recorded and matched against the next expectation; the
/// corresponding response is then drained by `receive()` calls. Replies
/// are delivered in pieces when a chunk limit is set, so framing across
/// split reads can be exercised.
///
/// If no expectation matches or the queue is exhausted, an error is
/// returned.
#[derive(Debug)]
pub struct MockTransport {
    /// Ordered queue of expected request/response pairs.
    expectations: VecDeque<Expectation>,
    /// The response data pending for `receive()` calls, if any.
    pending_response: Option<Vec<u8>>,
    /// Cursor into the pending response (bytes already read).
    response_cursor: usize,
    /// Upper bound on bytes handed out per `receive()` call.
    chunk_limit: Option<usize>,
    /// Whether the transport is "connected".
    connected: bool,
    /// Log of all bytes sent through this transport.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            pending_response: None,
            response_cursor: 0,
            chunk_limit: None,
            connected: true,
            sent_log: Vec::new(),
        }
    }

    /// Add an expected request/response pair.
    ///
    /// When `send()` is called with data matching `request`, subsequent
    /// `receive()` calls will drain `response`.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: Some(response.to_vec()),
        });
    }

    /// Add an expected request whose exchange never produces reply bytes.
    ///
    /// Every `receive()` after the matching `send()` returns
    /// [`Error::Timeout`], like a device that stays silent.
    pub fn expect_no_reply(&mut self, request: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: None,
        });
    }

    /// Deliver at most `limit` bytes per `receive()` call.
    ///
    /// Serial hardware hands replies to the driver in arbitrary pieces;
    /// this forces that behavior deterministically so frame-boundary
    /// handling can be tested.
    pub fn set_chunk_limit(&mut self, limit: usize) {
        self.chunk_limit = Some(limit);
    }

    /// Return all data that has been sent through this transport.
    ///
    /// Each element is the byte slice from one `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Return the number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `send()` and `receive()` calls
    /// return [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        // Record what was sent.
        self.sent_log.push(data.to_vec());

        // Match against the next expectation.
        if let Some(expectation) = self.expectations.pop_front() {
            if data != expectation.request.as_slice() {
                return Err(Error::Transport(format!(
                    "unexpected send data: expected {:02X?}, got {:02X?}",
                    expectation.request, data
                )));
            }
            self.pending_response = expectation.response;
            self.response_cursor = 0;
            Ok(())
        } else {
            Err(Error::Transport(
                "no more expectations in mock transport".into(),
            ))
        }
    }

    fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if let Some(ref response) = self.pending_response {
            let remaining = &response[self.response_cursor..];
            if remaining.is_empty() {
                self.pending_response = None;
                self.response_cursor = 0;
                return Err(Error::Timeout);
            }
            let mut n = remaining.len().min(buf.len());
            if let Some(limit) = self.chunk_limit {
                n = n.min(limit);
            }
            buf[..n].copy_from_slice(&remaining[..n]);
            self.response_cursor += n;
            if self.response_cursor >= response.len() {
                // All response bytes consumed; clear for next exchange.
                self.pending_response = None;
                self.response_cursor = 0;
            }
            Ok(n)
        } else {
            Err(Error::Timeout)
        }
    }

    fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending_response = None;
        self.response_cursor = 0;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_transport_basic_send_receive() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"ON\x00");

        mock.send(b"St").unwrap();

        let mut buf = [0u8; 16];
        let n = mock.receive(&mut buf, Duration::from_millis(100)).unwrap();

        assert_eq!(n, 3);
        assert_eq!(&buf[..n], b"ON\x00");
    }

    #[test]
    fn mock_transport_tracks_sent_data() {
        let mut mock = MockTransport::new();
        mock.expect(b"Up", b"OK\x00");
        mock.expect(b"Sh", b"OK\x00");

        mock.send(b"Up").unwrap();
        mock.send(b"Sh").unwrap();

        assert_eq!(mock.sent_data().len(), 2);
        assert_eq!(mock.sent_data()[0], b"Up");
        assert_eq!(mock.sent_data()[1], b"Sh");
    }

    #[test]
    fn mock_transport_wrong_data_errors() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"ON\x00");

        let result = mock.send(b"Bt");
        assert!(matches!(result.unwrap_err(), Error::Transport(_)));
    }

    #[test]
    fn mock_transport_no_expectations_errors() {
        let mut mock = MockTransport::new();

        let result = mock.send(b"St");
        assert!(matches!(result.unwrap_err(), Error::Transport(_)));
    }

    #[test]
    fn mock_transport_receive_without_send_times_out() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 16];

        let result = mock.receive(&mut buf, Duration::from_millis(10));
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[test]
    fn mock_transport_no_reply_expectation_times_out() {
        let mut mock = MockTransport::new();
        mock.expect_no_reply(b"Bt");

        mock.send(b"Bt").unwrap();

        let mut buf = [0u8; 16];
        let result = mock.receive(&mut buf, Duration::from_millis(10));
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[test]
    fn mock_transport_partial_receive_via_small_buffer() {
        let mut mock = MockTransport::new();
        mock.expect(b"VA3", b"0.16A\x00029.85V\x00");

        mock.send(b"VA3").unwrap();

        let mut buf = [0u8; 5];
        let n = mock.receive(&mut buf, Duration::from_millis(100)).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf[..n], b"0.16A");

        let n = mock.receive(&mut buf, Duration::from_millis(100)).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf[..n], b"\x00029.");
    }

    #[test]
    fn mock_transport_chunk_limit_splits_reads() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"OFF\x00");
        mock.set_chunk_limit(1);

        mock.send(b"St").unwrap();

        let mut buf = [0u8; 16];
        let mut collected = Vec::new();
        for _ in 0..4 {
            let n = mock.receive(&mut buf, Duration::from_millis(100)).unwrap();
            assert_eq!(n, 1);
            collected.extend_from_slice(&buf[..n]);
        }
        assert_eq!(collected, b"OFF\x00");
    }

    #[test]
    fn mock_transport_drained_response_times_out() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"ON\x00");

        mock.send(b"St").unwrap();

        let mut buf = [0u8; 16];
        mock.receive(&mut buf, Duration::from_millis(100)).unwrap();
        let result = mock.receive(&mut buf, Duration::from_millis(10));
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[test]
    fn mock_transport_disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().unwrap();
        assert!(!mock.is_connected());

        // Operations after close should fail.
        let result = mock.send(b"St");
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[test]
    fn mock_transport_set_connected() {
        let mut mock = MockTransport::new();
        mock.set_connected(false);
        assert!(!mock.is_connected());

        let result = mock.send(b"St");
        assert!(matches!(result.unwrap_err(), Error::NotConnected));

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::from_millis(10));
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[test]
    fn mock_transport_remaining_expectations() {
        let mut mock = MockTransport::new();
        mock.expect(b"Up", b"OK\x00");
        mock.expect(b"Sh", b"OK\x00");
        assert_eq!(mock.remaining_expectations(), 2);

        mock.send(b"Up").unwrap();
        assert_eq!(mock.remaining_expectations(), 1);

        mock.send(b"Sh").unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }
}
