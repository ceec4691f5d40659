use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use moistctl_link::SerialLink;
use moistctl_proto::{Envelope, Message};
use moistctl_transport::TtyPipe;

use crate::exit::{link_error, transport_error, CliError, CliResult, REMOTE_ERROR, USAGE};
use crate::output::OutputFormat;

pub mod config;
pub mod crc;
pub mod manual;
pub mod monitor;
pub mod rtc;
pub mod status;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read or set the controller's real-time clock.
    Rtc(rtc::RtcArgs),
    /// Export or import the controller configuration as text.
    Config(config::ConfigArgs),
    /// Show the state of each flowerpot.
    Status(status::StatusArgs),
    /// Show or set manual override masks.
    Manual(manual::ManualArgs),
    /// Stream controller log messages until interrupted.
    Monitor(monitor::MonitorArgs),
    /// Compute the bus checksum over arbitrary bytes.
    Crc(crc::CrcArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Rtc(args) => rtc::run(args, format),
        Command::Config(args) => config::run(args, format),
        Command::Status(args) => status::run(args, format),
        Command::Manual(args) => manual::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Crc(args) => crc::run(args, format),
    }
}

/// Serial-bus options shared by every command that talks to the controller.
#[derive(Args, Debug)]
pub struct BusArgs {
    /// Serial device connected to the controller.
    #[arg(long, value_name = "PATH")]
    pub device: PathBuf,

    /// Local bus address (0-15).
    #[arg(long, default_value = "1")]
    pub address: u8,

    /// Controller bus address (0-15).
    #[arg(long, default_value = "0")]
    pub controller: u8,

    /// Fixed frame payload length negotiated with the firmware build.
    #[arg(long, default_value = "10")]
    pub payload_len: usize,

    /// How long to wait for an acknowledgment (e.g. 3s, 500ms).
    #[arg(long, default_value = "3s")]
    pub timeout: String,

    /// Pace the line by sleeping this long after every byte (e.g. 5ms).
    #[arg(long, value_name = "DURATION")]
    pub send_delay: Option<String>,
}

impl BusArgs {
    pub fn open(&self) -> CliResult<Bus> {
        let timeout = parse_duration(&self.timeout)?;
        let send_delay = self
            .send_delay
            .as_deref()
            .map(parse_duration)
            .transpose()?;
        let pipe = TtyPipe::open(&self.device)
            .map_err(|err| transport_error("failed opening serial device", err))?;
        tracing::debug!(
            device = %self.device.display(),
            address = self.address,
            controller = self.controller,
            "serial link opened"
        );
        let mut link = SerialLink::new(pipe, self.address, self.payload_len);
        link.set_send_delay(send_delay);
        Ok(Bus {
            link,
            controller: self.controller,
            timeout,
        })
    }
}

/// An open link plus the request policy the commands share.
pub struct Bus {
    pub link: SerialLink<TtyPipe>,
    pub controller: u8,
    pub timeout: Duration,
}

impl Bus {
    /// Send `message` to the controller and wait for the acknowledging reply.
    ///
    /// A reply carrying a remote error code is mapped to a CLI error here;
    /// commands that need to see the error envelope itself (the log monitor)
    /// use [`Bus::exchange`] instead.
    pub fn request(&mut self, message: &Message) -> CliResult<Envelope> {
        let envelope = self.exchange(message)?;
        match envelope.error_code() {
            moistctl_frame::ErrorCode::Ok => Ok(envelope),
            code => Err(CliError::new(
                REMOTE_ERROR,
                format!("controller rejected the request: {code}"),
            )),
        }
    }

    /// Send `message` and return whatever envelope comes back, error code
    /// included.
    pub fn exchange(&mut self, message: &Message) -> CliResult<Envelope> {
        let mut frame = message.to_frame();
        let reply = self
            .link
            .send_sync(&mut frame, self.controller, self.timeout)
            .map_err(|err| link_error("bus request failed", err))?
            .ok_or_else(|| {
                CliError::new(
                    crate::exit::INTERNAL,
                    "request did not ask for an acknowledgment",
                )
            })?;
        Envelope::from_frame(&reply).map_err(|err| crate::exit::proto_error("bad reply", err))
    }

    /// Send `message` without waiting for any reply.
    pub fn send(&mut self, message: &Message) -> CliResult<()> {
        let mut frame = message.to_frame();
        self.link
            .send(&mut frame, self.controller)
            .map_err(|err| link_error("bus send failed", err))?;
        Ok(())
    }
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("7").unwrap(), Duration::from_secs(7));
    }

    #[test]
    fn parse_duration_rejects_zero_and_garbage() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
    }
}
