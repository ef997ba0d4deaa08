//! PDU text-protocol encoder and frame delimiter.
//!
//! The power-distribution unit speaks a bare ASCII request/response
//! protocol over a serial link. Requests are two-letter command codes with
//! an optional decimal parameter and **no terminator**; the device answers
//! with a short ASCII reply whose end must be detected by the framing
//! rules in this module.
//!
//! # Request format
//!
//! ```text
//! <code><params>
//! ```
//!
//! - `code`: Two ASCII characters identifying the request
//!   (e.g. `VA`, `St`, `Up`, `Sh`, `Bt`).
//! - `params`: Zero or more ASCII characters (the channel digit for `VA`).
//!
//! # Reply framing
//!
//! The firmware's reply delimiter changed between revisions, so two
//! framing policies are supported behind [`FramingMode`]:
//!
//! - [`LineDelimited`](FramingMode::LineDelimited): every reply ends with
//!   a line feed (0x0A). Used by early firmware.
//! - [`NulDelimited`](FramingMode::NulDelimited): every reply ends with a
//!   zero byte (0x00). Current firmware, and the default. Combined
//!   voltage/current replies *also* use a zero byte as the internal
//!   separator between the current and voltage fields, which makes the
//!   terminator ambiguous -- see the variant docs for the
//!   disambiguation rule and its limits.

use bytes::{BufMut, BytesMut};

/// Reply terminator byte for [`FramingMode::LineDelimited`].
pub const LF_TERMINATOR: u8 = b'\n';

/// Reply terminator (and internal field separator) byte for
/// [`FramingMode::NulDelimited`].
pub const NUL_TERMINATOR: u8 = 0x00;

/// Unit marker ending the current field of a voltage/current reply.
pub const CURRENT_MARKER: u8 = b'A';

/// Unit marker ending the voltage field of a voltage/current reply.
pub const VOLTAGE_MARKER: u8 = b'V';

/// Unit marker ending the digits of a battery-charge reply.
pub const PERCENT_MARKER: u8 = b'%';

/// Encode a request into raw bytes ready for transmission.
///
/// Concatenates the command code and parameters. Requests carry no
/// terminator byte.
///
/// # Example
///
/// ```
/// use pdulib::protocol::encode_request;
///
/// assert_eq!(encode_request("St", ""), b"St");
/// assert_eq!(encode_request("VA", "3"), b"VA3");
/// ```
pub fn encode_request(code: &str, params: &str) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(code.len() + params.len());
    buf.put_slice(code.as_bytes());
    buf.put_slice(params.as_bytes());
    buf.to_vec()
}

/// Which reply delimiter the connected firmware uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FramingMode {
    /// A reply is complete when its last byte is a line feed (0x0A).
    ///
    /// Early firmware. A line feed does not occur mid-reply.
    LineDelimited,

    /// A reply is complete when its last byte is a zero byte (0x00) and
    /// the byte immediately before it is **not** `'A'`.
    ///
    /// Current firmware terminates every reply with a zero byte, but a
    /// combined voltage/current reply also carries a zero byte as the
    /// internal separator right after the current field's `'A'` unit
    /// marker. A trailing zero preceded by `'A'` is therefore the
    /// separator, not the terminator, and more bytes must still be read.
    ///
    /// This rule is a known protocol limitation rather than a robust
    /// framing scheme: it relies on the device never emitting `'A'` as
    /// the final payload byte before a true terminator (digits can't be
    /// `'A'`, so current/voltage/charge values are safe, but the rule
    /// would misfire on any future reply text ending in `'A'`). The wire
    /// format is fixed by the firmware, so the limitation is documented
    /// here instead of redesigned away.
    #[default]
    NulDelimited,
}

/// Result of testing a reply buffer against the frame predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The buffer holds one complete reply of this many bytes.
    Complete(usize),
    /// The buffer does not yet hold a complete reply. More data is needed.
    Incomplete,
}

/// Test whether the bytes accumulated so far form one complete reply.
///
/// Pure predicate over the buffer contents -- no I/O, no state. The
/// transport delivers bytes in arbitrary chunks, so the driver calls this
/// after every read until it reports [`FrameStatus::Complete`] (or the
/// command's reply-length bound is exhausted).
///
/// # Example
///
/// ```
/// use pdulib::protocol::{check_frame, FrameStatus, FramingMode};
///
/// // Trailing zero after 'A' is the field separator: keep reading.
/// let status = check_frame(FramingMode::NulDelimited, b"0.16A\x00");
/// assert_eq!(status, FrameStatus::Incomplete);
///
/// // Trailing zero after anything else is the terminator.
/// let status = check_frame(FramingMode::NulDelimited, b"0.16A\x00029.85V\x00");
/// assert_eq!(status, FrameStatus::Complete(14));
/// ```
pub fn check_frame(mode: FramingMode, buf: &[u8]) -> FrameStatus {
    let Some(&last) = buf.last() else {
        return FrameStatus::Incomplete;
    };

    match mode {
        FramingMode::LineDelimited => {
            if last == LF_TERMINATOR {
                FrameStatus::Complete(buf.len())
            } else {
                FrameStatus::Incomplete
            }
        }
        FramingMode::NulDelimited => {
            if last != NUL_TERMINATOR {
                return FrameStatus::Incomplete;
            }
            // A zero straight after the current-unit marker is the
            // internal current/voltage separator, not the terminator.
            if buf.len() >= 2 && buf[buf.len() - 2] == CURRENT_MARKER {
                return FrameStatus::Incomplete;
            }
            FrameStatus::Complete(buf.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Request encoding
    // ---------------------------------------------------------------

    #[test]
    fn encode_run_state_query() {
        assert_eq!(encode_request("St", ""), b"St");
    }

    #[test]
    fn encode_voltage_current_query() {
        assert_eq!(encode_request("VA", "3"), b"VA3");
    }

    #[test]
    fn encode_requests_carry_no_terminator() {
        let req = encode_request("Bt", "");
        assert_eq!(req.last(), Some(&b't'));
    }

    // ---------------------------------------------------------------
    // Line-delimited framing
    // ---------------------------------------------------------------

    #[test]
    fn line_frame_complete_on_trailing_lf() {
        let status = check_frame(FramingMode::LineDelimited, b"ON\n");
        assert_eq!(status, FrameStatus::Complete(3));
    }

    #[test]
    fn line_frame_incomplete_without_lf() {
        let status = check_frame(FramingMode::LineDelimited, b"ON");
        assert_eq!(status, FrameStatus::Incomplete);
    }

    #[test]
    fn line_frame_empty_is_incomplete() {
        let status = check_frame(FramingMode::LineDelimited, b"");
        assert_eq!(status, FrameStatus::Incomplete);
    }

    // ---------------------------------------------------------------
    // Nul-delimited framing and the 'A' disambiguation rule
    // ---------------------------------------------------------------

    #[test]
    fn nul_frame_complete_on_trailing_zero() {
        let status = check_frame(FramingMode::NulDelimited, b"42%\x00");
        assert_eq!(status, FrameStatus::Complete(4));
    }

    #[test]
    fn nul_frame_zero_after_current_marker_is_separator() {
        // ...A\x00 -- the zero is the internal field separator.
        let status = check_frame(FramingMode::NulDelimited, b"0.16A\x00");
        assert_eq!(status, FrameStatus::Incomplete);
    }

    #[test]
    fn nul_frame_zero_after_other_byte_is_terminator() {
        // ...V00\x00 -- preceding byte is '0', not 'A'.
        let status = check_frame(FramingMode::NulDelimited, b"029.85V00\x00");
        assert_eq!(status, FrameStatus::Complete(10));
    }

    #[test]
    fn nul_frame_full_voltage_current_reply() {
        let status = check_frame(FramingMode::NulDelimited, b"0.16A\x00029.85V\x00");
        assert_eq!(status, FrameStatus::Complete(14));
    }

    #[test]
    fn nul_frame_incomplete_without_zero() {
        let status = check_frame(FramingMode::NulDelimited, b"OFF");
        assert_eq!(status, FrameStatus::Incomplete);
    }

    #[test]
    fn nul_frame_lone_zero_is_complete() {
        // No preceding byte, so the separator rule cannot apply.
        let status = check_frame(FramingMode::NulDelimited, b"\x00");
        assert_eq!(status, FrameStatus::Complete(1));
    }

    #[test]
    fn nul_frame_empty_is_incomplete() {
        let status = check_frame(FramingMode::NulDelimited, b"");
        assert_eq!(status, FrameStatus::Incomplete);
    }

    #[test]
    fn default_mode_is_nul_delimited() {
        assert_eq!(FramingMode::default(), FramingMode::NulDelimited);
    }
}
