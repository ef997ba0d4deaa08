//! Power-distribution unit status sweep.
//!
//! Demonstrates connecting to the PDU over serial, reading every
//! channel's voltage/current, the motor-control subsystem's run state,
//! and the battery charge.
//!
//! # Requirements
//!
//! - The PDU connected via RS-232 or a USB serial adapter
//! - The serial port path adjusted for your system (e.g., `/dev/ttyUSB0`
//!   on Linux, `COM3` on Windows)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p pdulib --example power_monitor
//! ```

use std::time::Duration;

use pdulib::{Channel, PduBuilder, NO_BATTERY};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Adjust this to match your system's serial port.
    let serial_port = "/dev/ttyUSB0";

    println!("Connecting to PDU on {}...", serial_port);

    let mut pdu = PduBuilder::new()
        .port(serial_port)
        .read_timeout(Duration::from_millis(500))
        .build()?;

    // Sweep all measurement channels.
    for channel in Channel::ALL {
        match pdu.voltage_current(channel) {
            Ok(vc) => println!("{:<12} {}", channel.to_string(), vc),
            Err(e) => println!("{:<12} read failed: {}", channel.to_string(), e),
        }
    }

    // Motor-control subsystem state.
    let running = pdu.run_state()?;
    println!(
        "\nMotor-control subsystem: {}",
        if running { "running" } else { "stopped" }
    );

    // Battery charge, if one is fitted.
    match pdu.battery_charge()? {
        NO_BATTERY => println!("Battery: not connected"),
        charge => println!("Battery: {}%", charge),
    }

    println!("\nDone.");
    Ok(())
}
