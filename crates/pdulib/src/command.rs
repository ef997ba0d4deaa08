//! Request descriptors and reply parsers.
//!
//! Each exchange with the power-distribution unit is described by a
//! [`Command`]: the fixed request payload, the upper bound on the reply
//! size, and a slot for the raw reply bytes once they arrive. The four
//! request kinds are a closed set ([`CommandKind`]); replies are decoded
//! by pattern-matching on the kind, not by dispatching through the
//! command itself.
//!
//! The parsers are pure -- they consume byte slices without performing
//! any I/O, so the same reply always decodes to the same result. The
//! driver feeds them the complete frame as delivered, terminator and
//! padding included.

use pdulib_core::error::{Error, Result};
use pdulib_core::types::{Channel, VoltageCurrent};

use crate::protocol::{encode_request, CURRENT_MARKER, PERCENT_MARKER, VOLTAGE_MARKER};

/// Maximum reply length for a voltage/current query.
pub const VA_MAX_REPLY: usize = 15;

/// Maximum reply length for a run-state query.
pub const RUN_STATE_MAX_REPLY: usize = 5;

/// Maximum reply length for a run-state set acknowledgement.
pub const RUN_STATE_SET_MAX_REPLY: usize = 4;

/// Maximum reply length for a battery-charge query.
pub const BATTERY_MAX_REPLY: usize = 6;

/// Width bound on the current field of a voltage/current reply.
///
/// Two decimal places with a `.` delimiter fit any value up to 999.99 A
/// in six characters.
pub const CURRENT_FIELD_MAX: usize = 6;

/// Width bound on the voltage field of a voltage/current reply.
pub const VOLTAGE_FIELD_MAX: usize = 6;

/// Width bound on the digits of a battery-charge reply.
pub const CHARGE_FIELD_MAX: usize = 4;

/// The closed set of requests the device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Voltage/current query for one channel (`VA<index>`).
    VoltageCurrent(Channel),
    /// Run-state query for the motor-control subsystem (`St`).
    RunStateQuery,
    /// Run-state command: `Up` to start, `Sh` to shut down.
    RunStateSet(bool),
    /// Battery-charge query (`Bt`).
    BatteryCharge,
}

/// One request/response exchange in flight.
///
/// A `Command` is built for a single round trip and then discarded: the
/// request payload and maximum reply length are fixed at construction
/// (the constructors cannot fail), and the reply slot is filled exactly
/// once when the framed reply arrives. The reply buffer is owned by the
/// command -- nothing is shared or reused across exchanges.
#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
    request: Vec<u8>,
    max_reply_len: usize,
    reply: Vec<u8>,
}

impl Command {
    /// Build a voltage/current query for one channel.
    ///
    /// The payload is `VA` followed by the channel's decimal wire index.
    /// [`Channel::Invalid`] encodes `VA0`; index 0 is reserved by the
    /// device, so expect no useful answer.
    pub fn voltage_current(channel: Channel) -> Self {
        Command {
            kind: CommandKind::VoltageCurrent(channel),
            request: encode_request("VA", &channel.index().to_string()),
            max_reply_len: VA_MAX_REPLY,
            reply: Vec::new(),
        }
    }

    /// Build a run-state query for the motor-control subsystem.
    pub fn run_state_query() -> Self {
        Command {
            kind: CommandKind::RunStateQuery,
            request: encode_request("St", ""),
            max_reply_len: RUN_STATE_MAX_REPLY,
            reply: Vec::new(),
        }
    }

    /// Build a run-state command: `true` starts the motor-control
    /// subsystem (`Up`), `false` shuts it down (`Sh`).
    pub fn run_state_set(on: bool) -> Self {
        Command {
            kind: CommandKind::RunStateSet(on),
            request: encode_request(if on { "Up" } else { "Sh" }, ""),
            max_reply_len: RUN_STATE_SET_MAX_REPLY,
            reply: Vec::new(),
        }
    }

    /// Build a battery-charge query.
    pub fn battery_charge() -> Self {
        Command {
            kind: CommandKind::BatteryCharge,
            request: encode_request("Bt", ""),
            max_reply_len: BATTERY_MAX_REPLY,
            reply: Vec::new(),
        }
    }

    /// The request kind this command was built for.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The bytes to put on the wire.
    pub fn request(&self) -> &[u8] {
        &self.request
    }

    /// Upper bound on the reply size; sizes the read budget.
    pub fn max_reply_len(&self) -> usize {
        self.max_reply_len
    }

    /// The raw framed reply. Empty until the exchange completes.
    pub fn reply(&self) -> &[u8] {
        &self.reply
    }

    /// Number of reply bytes received so far.
    pub fn reply_len(&self) -> usize {
        self.reply.len()
    }

    /// Store the framed reply. Called once per exchange.
    pub(crate) fn set_reply(&mut self, reply: Vec<u8>) {
        debug_assert!(self.reply.is_empty(), "reply slot is write-once");
        self.reply = reply;
    }
}

/// Decode a complete voltage/current reply.
///
/// The reply is scanned left to right for the `'A'` current-unit marker
/// at index `i`: bytes `[0, i)` are the current field, which may be at
/// most [`CURRENT_FIELD_MAX`] bytes wide. The voltage field starts at
/// `i + 2` -- the byte right after `'A'` is the internal field separator
/// -- and runs to the `'V'` voltage-unit marker. A voltage span wider
/// than [`VOLTAGE_FIELD_MAX`] keeps only its trailing six bytes, i.e.
/// the digits nearest the unit marker.
///
/// # Example
///
/// ```
/// use pdulib::command::parse_voltage_current;
///
/// let vc = parse_voltage_current(b"0.16A0029.85V00").unwrap();
/// assert_eq!(vc.current, 0.16);
/// assert_eq!(vc.voltage, 29.85);
/// ```
pub fn parse_voltage_current(reply: &[u8]) -> Result<VoltageCurrent> {
    // First 'A' ends the current field.
    let current_end = reply.iter().position(|&b| b == CURRENT_MARKER);

    // First 'V' anywhere; it must come after the 'A'.
    let voltage_marker = reply.iter().position(|&b| b == VOLTAGE_MARKER);

    let (current_end, voltage_marker) = match (current_end, voltage_marker) {
        (Some(a), Some(v)) if v < a => {
            return Err(Error::MalformedReply(
                "voltage field precedes current field".into(),
            ))
        }
        (Some(a), Some(v)) => (a, v),
        _ => {
            return Err(Error::MalformedReply(
                "no full VA response delivered".into(),
            ))
        }
    };

    if current_end > CURRENT_FIELD_MAX {
        return Err(Error::MalformedReply(format!(
            "current field exceeds {CURRENT_FIELD_MAX} bytes"
        )));
    }

    // Skip the separator byte right after the current-unit marker.
    let mut voltage_start = current_end + 2;
    if voltage_start > voltage_marker {
        return Err(Error::MalformedReply("empty voltage field".into()));
    }
    let span = voltage_marker - voltage_start;
    if span > VOLTAGE_FIELD_MAX {
        // Truncate leading bytes, keeping the digits nearest the marker.
        voltage_start += span - VOLTAGE_FIELD_MAX;
    }

    let current = parse_ascii_f32(&reply[..current_end], "current")?;
    let voltage = parse_ascii_f32(&reply[voltage_start..voltage_marker], "voltage")?;

    Ok(VoltageCurrent { voltage, current })
}

/// Decode a complete run-state reply: `ON` or `OFF`.
///
/// The state literal starts at the first reply byte; padding after it is
/// ignored.
pub fn parse_run_state(reply: &[u8]) -> Result<bool> {
    if reply.starts_with(b"ON") {
        Ok(true)
    } else if reply.starts_with(b"OFF") {
        Ok(false)
    } else {
        Err(Error::MalformedReply(
            "run-state reply is neither ON nor OFF".into(),
        ))
    }
}

/// Decode a complete battery-charge reply: decimal digits followed by
/// `'%'`.
///
/// At most [`CHARGE_FIELD_MAX`] digit bytes may precede the marker. The
/// no-battery case never reaches this parser -- the device answers the
/// query with silence, which the driver maps to
/// [`NO_BATTERY`](pdulib_core::types::NO_BATTERY) before decoding.
pub fn parse_battery_charge(reply: &[u8]) -> Result<i32> {
    let marker = reply
        .iter()
        .position(|&b| b == PERCENT_MARKER)
        .ok_or_else(|| Error::MalformedReply("no percent marker in battery reply".into()))?;

    if marker > CHARGE_FIELD_MAX {
        return Err(Error::MalformedReply(format!(
            "charge field exceeds {CHARGE_FIELD_MAX} bytes"
        )));
    }

    let digits = std::str::from_utf8(&reply[..marker])
        .map_err(|_| Error::MalformedReply("charge field is not ASCII".into()))?;
    digits
        .parse::<i32>()
        .map_err(|_| Error::MalformedReply(format!("charge field {digits:?} is not numeric")))
}

/// Convert an ASCII decimal byte span to `f32`.
fn parse_ascii_f32(bytes: &[u8], what: &str) -> Result<f32> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| Error::MalformedReply(format!("{what} field is not ASCII")))?;
    text.parse::<f32>()
        .map_err(|_| Error::MalformedReply(format!("{what} field {text:?} is not numeric")))
}
