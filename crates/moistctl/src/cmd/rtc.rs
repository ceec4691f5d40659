use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Local, Timelike};
use clap::{Args, Subcommand};
use moistctl_proto::{Message, Rtc};

use crate::cmd::BusArgs;
use crate::exit::{config_error, io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_rtc, OutputFormat};

#[derive(Args, Debug)]
pub struct RtcArgs {
    #[command(flatten)]
    pub bus: BusArgs,

    #[command(subcommand)]
    pub action: RtcAction,
}

#[derive(Subcommand, Debug)]
pub enum RtcAction {
    /// Read the controller clock.
    Show,
    /// Set the controller clock.
    Set(RtcSetArgs),
}

#[derive(Args, Debug)]
pub struct RtcSetArgs {
    /// Use the host's current local time.
    #[arg(long, conflicts_with = "file")]
    pub now: bool,

    /// Read the time from an `[RTC]` config file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

pub fn run(args: RtcArgs, format: OutputFormat) -> CliResult<i32> {
    let mut bus = args.bus.open()?;
    match args.action {
        RtcAction::Show => {
            let envelope = bus.request(&Message::RtcFetch)?;
            match envelope.message {
                Some(Message::Rtc(rtc)) => print_rtc(&rtc, format),
                other => {
                    return Err(CliError::new(
                        INTERNAL,
                        format!("unexpected reply to RTC fetch: {other:?}"),
                    ))
                }
            }
            Ok(SUCCESS)
        }
        RtcAction::Set(set) => {
            let rtc = resolve_time(&set)?;
            bus.send(&Message::Rtc(rtc))?;
            Ok(SUCCESS)
        }
    }
}

fn resolve_time(args: &RtcSetArgs) -> CliResult<Rtc> {
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return Rtc::from_text(&text).map_err(|err| config_error("invalid RTC config", err));
    }
    if args.now {
        return Ok(host_time());
    }
    Err(CliError::new(
        crate::exit::USAGE,
        "rtc set needs either --now or --file",
    ))
}

/// Capture the host clock in the controller's zero-based field layout.
fn host_time() -> Rtc {
    let now = Local::now();
    Rtc {
        second: now.second().min(59) as u8,
        minute: now.minute() as u8,
        hour: now.hour() as u8,
        day: (now.day() - 1) as u8,
        month: now.month0() as u8,
        year: (now.year() - 2000).clamp(0, 99) as u8,
        day_of_week: now.weekday().num_days_from_monday() as u8,
    }
}
