use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use moistctl_frame::ErrorCode;
use moistctl_proto::Message;

use crate::cmd::BusArgs;
use crate::exit::{CliError, CliResult, INTERNAL, REMOTE_ERROR, SUCCESS};
use crate::output::{print_log_item, OutputFormat};

/// How long to idle between fetch attempts while the controller's log
/// queue is empty.
const IDLE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub bus: BusArgs,

    /// Exit after printing N log items.
    #[arg(long)]
    pub count: Option<usize>,
}

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .map_err(|err| CliError::new(INTERNAL, format!("failed installing signal handler: {err}")))?;

    let mut bus = args.bus.open()?;
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let envelope = bus.exchange(&Message::LogFetch)?;
        match envelope.error_code() {
            ErrorCode::Ok => match envelope.message {
                Some(Message::Log(item)) => {
                    print_log_item(&item, format);
                    printed += 1;
                    if args.count.is_some_and(|count| printed >= count) {
                        break;
                    }
                    // More items may be queued; fetch again right away.
                }
                other => {
                    return Err(CliError::new(
                        INTERNAL,
                        format!("unexpected reply to log fetch: {other:?}"),
                    ))
                }
            },
            // The controller answers FAIL when its log queue is empty.
            ErrorCode::Fail => std::thread::sleep(IDLE_INTERVAL),
            code => {
                return Err(CliError::new(
                    REMOTE_ERROR,
                    format!("controller rejected the log fetch: {code}"),
                ))
            }
        }
    }

    Ok(SUCCESS)
}
