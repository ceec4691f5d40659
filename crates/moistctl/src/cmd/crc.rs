use std::fs;
use std::path::PathBuf;

use clap::Args;
use moistctl_frame::crc16;
use serde::Serialize;

use crate::exit::{io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::OutputFormat;

/// Offline checksum helper. Unlike the other commands this never touches
/// the bus, so it takes no [`crate::cmd::BusArgs`].
#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Hex-encoded bytes to checksum.
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,

    /// File whose contents to checksum.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Serialize)]
struct CrcOutput {
    crc: String,
    len: usize,
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let data = resolve_data(&args)?;
    let crc = crc16(&data);
    match format {
        OutputFormat::Json => {
            let out = CrcOutput {
                crc: format!("{crc:#06x}"),
                len: data.len(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{crc:#06x}"),
    }
    Ok(SUCCESS)
}

fn resolve_data(args: &CrcArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "crc needs either --hex or --file"))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| CliError::new(USAGE, format!("invalid hex digit: {c:?}")))
        })
        .collect::<CliResult<_>>()?;
    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "hex input has an odd number of digits"));
    }
    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}
