//! Core types used throughout pdulib.
//!
//! These types describe the power-distribution unit's measurement points
//! and the decoded values its replies carry.

use std::fmt;
use std::str::FromStr;

/// A voltage/current measurement point on the power-distribution unit.
///
/// The discriminant order is fixed by the wire protocol: the decimal
/// index of each channel is appended to the `VA` request payload
/// (`VA3` reads the 24 V DC output). Index 0 is reserved by the device
/// and never carries a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Reserved index 0; not a measurable channel.
    Invalid,
    /// Battery input rail.
    BatteryInput,
    /// External supply input rail.
    ExternalInput,
    /// 24 V DC output.
    Out24Vdc,
    /// 12 V output feeding the on-board computer.
    Out12Vobc,
    /// General-purpose 12 V output.
    Out12V,
    /// 5 V output.
    Out5V,
    /// Pan-tilt unit supply.
    Ptu,
    /// Motor-control subsystem supply.
    Mcs,
}

impl Channel {
    /// All measurable channels, in wire-index order.
    ///
    /// `Invalid` is excluded; it exists only because the device reserves
    /// index 0.
    pub const ALL: [Channel; 8] = [
        Channel::BatteryInput,
        Channel::ExternalInput,
        Channel::Out24Vdc,
        Channel::Out12Vobc,
        Channel::Out12V,
        Channel::Out5V,
        Channel::Ptu,
        Channel::Mcs,
    ];

    /// Return the decimal index used in the request payload.
    pub fn index(&self) -> u8 {
        match self {
            Channel::Invalid => 0,
            Channel::BatteryInput => 1,
            Channel::ExternalInput => 2,
            Channel::Out24Vdc => 3,
            Channel::Out12Vobc => 4,
            Channel::Out12V => 5,
            Channel::Out5V => 6,
            Channel::Ptu => 7,
            Channel::Mcs => 8,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Channel::Invalid => "INVALID",
            Channel::BatteryInput => "BATTERY-IN",
            Channel::ExternalInput => "EXTERNAL-IN",
            Channel::Out24Vdc => "24VDC",
            Channel::Out12Vobc => "12VOBC",
            Channel::Out12V => "12V",
            Channel::Out5V => "5V",
            Channel::Ptu => "PTU",
            Channel::Mcs => "MCS",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string cannot be parsed into a [`Channel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChannelError(String);

impl fmt::Display for ParseChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown channel: {}", self.0)
    }
}

impl std::error::Error for ParseChannelError {}

impl FromStr for Channel {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BATTERY-IN" | "BATTERY_INPUT" => Ok(Channel::BatteryInput),
            "EXTERNAL-IN" | "EXTERNAL_INPUT" => Ok(Channel::ExternalInput),
            "24VDC" => Ok(Channel::Out24Vdc),
            "12VOBC" => Ok(Channel::Out12Vobc),
            "12V" => Ok(Channel::Out12V),
            "5V" => Ok(Channel::Out5V),
            "PTU" => Ok(Channel::Ptu),
            "MCS" => Ok(Channel::Mcs),
            _ => Err(ParseChannelError(s.to_string())),
        }
    }
}

/// A decoded voltage/current reading for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageCurrent {
    /// Measured voltage in volts.
    pub voltage: f32,
    /// Measured current in amps.
    pub current: f32,
}

impl fmt::Display for VoltageCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} V / {:.2} A", self.voltage, self.current)
    }
}

/// Battery-charge sentinel meaning "no battery physically connected".
///
/// The device simply does not answer the battery query when no battery is
/// present, so the driver maps that read timeout to this value instead of
/// reporting an error. Distinct from any real charge, which is in 0..=100.
pub const NO_BATTERY: i32 = -1;
