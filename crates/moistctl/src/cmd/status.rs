use clap::Args;
use moistctl_proto::consts::MAX_POTS;
use moistctl_proto::{Message, PotState};

use crate::cmd::{Bus, BusArgs};
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_pot_states, OutputFormat};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub bus: BusArgs,

    /// Show a single pot (1-based) instead of all of them.
    #[arg(long, value_name = "POT")]
    pub pot: Option<u8>,
}

pub fn run(args: StatusArgs, format: OutputFormat) -> CliResult<i32> {
    let pots: Vec<u8> = match args.pot {
        Some(pot) => {
            if pot == 0 || pot as usize > MAX_POTS {
                return Err(CliError::new(
                    USAGE,
                    format!("pot number must be between 1 and {MAX_POTS}"),
                ));
            }
            vec![pot - 1]
        }
        None => (0..MAX_POTS as u8).collect(),
    };

    let mut bus = args.bus.open()?;
    let mut states = Vec::with_capacity(pots.len());
    for pot in pots {
        states.push(fetch_state(&mut bus, pot)?);
    }
    print_pot_states(&states, format);
    Ok(SUCCESS)
}

fn fetch_state(bus: &mut Bus, pot_number: u8) -> CliResult<PotState> {
    let envelope = bus.request(&Message::PotStateFetch { pot_number })?;
    match envelope.message {
        Some(Message::PotState(state)) => Ok(state),
        other => Err(CliError::new(
            INTERNAL,
            format!("unexpected reply to pot state fetch: {other:?}"),
        )),
    }
}
