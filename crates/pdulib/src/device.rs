//! Pdu -- the device facade for the power-distribution unit.
//!
//! This module ties the protocol codec ([`protocol`](crate::protocol),
//! [`command`](crate::command)) to a [`Transport`] to produce a working
//! driver. Every public operation runs one request/response exchange:
//! encode the command, write the payload, accumulate reply chunks under
//! the frame predicate, then decode the typed result.
//!
//! The device protocol is stateless and strictly one-request-at-a-time;
//! interleaved requests on the single serial lane cannot be told apart.
//! Operations therefore take `&mut self` and run to completion before the
//! next may begin. The driver performs no internal locking -- callers that
//! share a `Pdu` across threads must serialize access themselves -- and
//! never retries: every failure (except the documented no-battery case)
//! is reported for the caller to decide.

use std::time::Duration;

use tracing::debug;

use pdulib_core::error::{Error, Result};
use pdulib_core::transport::Transport;
use pdulib_core::types::{Channel, VoltageCurrent, NO_BATTERY};

use crate::command::{self, Command, VA_MAX_REPLY};
use crate::protocol::{check_frame, FrameStatus, FramingMode};

/// A connected power-distribution unit.
///
/// Constructed via [`PduBuilder`](crate::builder::PduBuilder). All device
/// communication goes through the [`Transport`] provided at build time.
pub struct Pdu {
    transport: Box<dyn Transport>,
    read_timeout: Duration,
    framing: FramingMode,
}

impl std::fmt::Debug for Pdu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdu")
            .field("read_timeout", &self.read_timeout)
            .field("framing", &self.framing)
            .finish_non_exhaustive()
    }
}

impl Pdu {
    /// Create a new `Pdu` from its constituent parts.
    ///
    /// This is called by [`PduBuilder`](crate::builder::PduBuilder);
    /// callers should use the builder API instead.
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        read_timeout: Duration,
        framing: FramingMode,
    ) -> Self {
        Pdu {
            transport,
            read_timeout,
            framing,
        }
    }

    /// Read the voltage/current measurement of one channel.
    pub fn voltage_current(&mut self, channel: Channel) -> Result<VoltageCurrent> {
        debug!(%channel, "reading voltage/current");
        let mut cmd = Command::voltage_current(channel);
        self.exchange(&mut cmd)?;
        command::parse_voltage_current(cmd.reply())
    }

    /// Read the run state of the motor-control subsystem.
    ///
    /// Returns `true` when the subsystem is running.
    pub fn run_state(&mut self) -> Result<bool> {
        debug!("reading run state");
        let mut cmd = Command::run_state_query();
        self.exchange(&mut cmd)?;
        command::parse_run_state(cmd.reply())
    }

    /// Start (`true`) or shut down (`false`) the motor-control subsystem.
    ///
    /// The device acknowledges with a short fixed frame; its content
    /// carries no fields, so success is the acknowledgement arriving.
    pub fn set_run_state(&mut self, on: bool) -> Result<()> {
        debug!(on, "setting run state");
        let mut cmd = Command::run_state_set(on);
        self.exchange(&mut cmd)?;
        Ok(())
    }

    /// Read the battery charge as a percentage in `0..=100`.
    ///
    /// A battery-less unit does not answer this query at all, so a
    /// transport read timeout here is valid domain data: the method
    /// returns [`NO_BATTERY`] (-1) instead of an error. This is the one
    /// place a transport failure is reinterpreted; every other operation
    /// propagates timeouts.
    pub fn battery_charge(&mut self) -> Result<i32> {
        debug!("reading battery charge");
        let mut cmd = Command::battery_charge();
        match self.exchange(&mut cmd) {
            Ok(()) => command::parse_battery_charge(cmd.reply()),
            Err(Error::Timeout) => {
                debug!("battery query timed out; no battery connected");
                Ok(NO_BATTERY)
            }
            Err(e) => Err(e),
        }
    }

    /// Close the underlying transport.
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }

    /// Whether the underlying transport is still connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Run one request/response exchange.
    ///
    /// Writes the command's payload, then reads reply chunks -- each read
    /// capped to the bytes the command still allows -- until the frame
    /// predicate reports a complete reply. Reaching the command's maximum
    /// reply length without a complete frame fails the exchange with
    /// [`Error::FramingTimeout`]; this cutoff is driver policy, separate
    /// from the transport's own read timeout.
    fn exchange(&mut self, cmd: &mut Command) -> Result<()> {
        debug!(
            request = %String::from_utf8_lossy(cmd.request()),
            "sending request"
        );
        self.transport.send(cmd.request())?;

        let mut reply = Vec::with_capacity(cmd.max_reply_len());
        let mut chunk = [0u8; VA_MAX_REPLY];

        loop {
            let budget = cmd.max_reply_len() - reply.len();
            let n = self
                .transport
                .receive(&mut chunk[..budget], self.read_timeout)?;
            reply.extend_from_slice(&chunk[..n]);

            match check_frame(self.framing, &reply) {
                FrameStatus::Complete(len) => {
                    reply.truncate(len);
                    debug!(reply_len = len, "reply framed");
                    cmd.set_reply(reply);
                    return Ok(());
                }
                FrameStatus::Incomplete if reply.len() >= cmd.max_reply_len() => {
                    return Err(Error::FramingTimeout {
                        received: reply.len(),
                        max: cmd.max_reply_len(),
                    });
                }
                FrameStatus::Incomplete => {
                    // Need more data, keep reading.
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdulib_test_harness::MockTransport;

    fn pdu_with(mock: MockTransport) -> Pdu {
        Pdu::new(
            Box::new(mock),
            Duration::from_millis(100),
            FramingMode::NulDelimited,
        )
    }

    #[test]
    fn voltage_current_exchange() {
        let mut mock = MockTransport::new();
        mock.expect(b"VA3", b"0.16A\x00029.85V\x00");

        let mut pdu = pdu_with(mock);
        let vc = pdu.voltage_current(Channel::Out24Vdc).unwrap();
        assert_eq!(vc.current, 0.16);
        assert_eq!(vc.voltage, 29.85);
    }

    #[test]
    fn voltage_current_exchange_with_chunked_delivery() {
        let mut mock = MockTransport::new();
        mock.expect(b"VA1", b"0.16A\x00029.85V\x00");
        // Deliver the reply in 4-byte chunks so the internal separator
        // arrives as a trailing byte mid-frame.
        mock.set_chunk_limit(4);

        let mut pdu = pdu_with(mock);
        let vc = pdu.voltage_current(Channel::BatteryInput).unwrap();
        assert_eq!(vc.current, 0.16);
        assert_eq!(vc.voltage, 29.85);
    }

    #[test]
    fn voltage_current_stops_at_separator_boundary_chunk() {
        let mut mock = MockTransport::new();
        mock.expect(b"VA8", b"0.16A\x00029.85V\x00");
        // First read hands over exactly "0.16A\x00": a trailing zero
        // preceded by 'A' must be judged incomplete.
        mock.set_chunk_limit(6);

        let mut pdu = pdu_with(mock);
        let vc = pdu.voltage_current(Channel::Mcs).unwrap();
        assert_eq!(vc.voltage, 29.85);
    }

    #[test]
    fn run_state_on_and_off() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"ON\x00");
        mock.expect(b"St", b"OFF\x00");

        let mut pdu = pdu_with(mock);
        assert!(pdu.run_state().unwrap());
        assert!(!pdu.run_state().unwrap());
    }

    #[test]
    fn run_state_garbage_is_malformed() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"XX\x00");

        let mut pdu = pdu_with(mock);
        let err = pdu.run_state().unwrap_err();
        assert!(matches!(err, Error::MalformedReply(_)));
    }

    #[test]
    fn set_run_state_sends_up_and_sh() {
        let mut mock = MockTransport::new();
        mock.expect(b"Up", b"OK\x00");
        mock.expect(b"Sh", b"OK\x00");

        let mut pdu = pdu_with(mock);
        pdu.set_run_state(true).unwrap();
        pdu.set_run_state(false).unwrap();
    }

    #[test]
    fn battery_charge_present() {
        let mut mock = MockTransport::new();
        mock.expect(b"Bt", b"42%\x00");

        let mut pdu = pdu_with(mock);
        assert_eq!(pdu.battery_charge().unwrap(), 42);
    }

    #[test]
    fn battery_charge_timeout_means_no_battery() {
        let mut mock = MockTransport::new();
        mock.expect_no_reply(b"Bt");

        let mut pdu = pdu_with(mock);
        assert_eq!(pdu.battery_charge().unwrap(), NO_BATTERY);
    }

    #[test]
    fn timeout_is_fatal_for_other_operations() {
        let mut mock = MockTransport::new();
        mock.expect_no_reply(b"St");

        let mut pdu = pdu_with(mock);
        let err = pdu.run_state().unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[test]
    fn unterminated_reply_hits_framing_timeout() {
        let mut mock = MockTransport::new();
        // 15 bytes, none of them a valid terminator.
        mock.expect(b"VA5", b"0.16A0029.85V00");

        let mut pdu = pdu_with(mock);
        let err = pdu.voltage_current(Channel::Out12V).unwrap_err();
        assert!(matches!(
            err,
            Error::FramingTimeout {
                received: 15,
                max: 15
            }
        ));
    }

    #[test]
    fn line_delimited_mode_frames_on_lf() {
        let mut mock = MockTransport::new();
        mock.expect(b"St", b"ON\n");

        let mut pdu = Pdu::new(
            Box::new(mock),
            Duration::from_millis(100),
            FramingMode::LineDelimited,
        );
        assert!(pdu.run_state().unwrap());
    }

    #[test]
    fn close_disconnects_transport() {
        let mock = MockTransport::new();
        let mut pdu = pdu_with(mock);
        assert!(pdu.is_connected());
        pdu.close().unwrap();
        assert!(!pdu.is_connected());
    }
}
