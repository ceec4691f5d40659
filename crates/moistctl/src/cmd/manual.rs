use clap::{Args, Subcommand};
use moistctl_proto::{ManualMode, Message};

use crate::cmd::BusArgs;
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_manual_mode, OutputFormat};

#[derive(Args, Debug)]
pub struct ManualArgs {
    #[command(flatten)]
    pub bus: BusArgs,

    #[command(subcommand)]
    pub action: ManualAction,
}

#[derive(Subcommand, Debug)]
pub enum ManualAction {
    /// Read the current override masks.
    Show,
    /// Program new override masks.
    Set(ManualSetArgs),
}

#[derive(Args, Debug)]
pub struct ManualSetArgs {
    /// Bitmask of pots whose watering is force-stopped.
    #[arg(long, value_name = "MASK", default_value = "0")]
    pub stop_mask: u8,

    /// Bitmask of valves under manual control.
    #[arg(long, value_name = "MASK", default_value = "0")]
    pub valve_mask: u8,

    /// Open/closed state for manually-controlled valves.
    #[arg(long, value_name = "MASK", default_value = "0")]
    pub valve_state: u8,
}

pub fn run(args: ManualArgs, format: OutputFormat) -> CliResult<i32> {
    let mut bus = args.bus.open()?;
    match args.action {
        ManualAction::Show => {
            let envelope = bus.request(&Message::ManualModeFetch)?;
            match envelope.message {
                Some(Message::ManualMode(man)) => print_manual_mode(&man, format),
                other => {
                    return Err(CliError::new(
                        INTERNAL,
                        format!("unexpected reply to manual mode fetch: {other:?}"),
                    ))
                }
            }
            Ok(SUCCESS)
        }
        ManualAction::Set(set) => {
            let man = ManualMode {
                force_stop_watering_mask: set.stop_mask,
                valve_manual_mask: set.valve_mask,
                valve_manual_state: set.valve_state,
            };
            bus.send(&Message::ManualMode(man))?;
            Ok(SUCCESS)
        }
    }
}
