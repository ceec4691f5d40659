use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use moistctl_proto::consts::MAX_POTS;
use moistctl_proto::textcfg::TextConfig;
use moistctl_proto::{GlobalConfig, Message, PotConfig, Rtc};

use crate::cmd::{Bus, BusArgs};
use crate::exit::{config_error, io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub bus: BusArgs,

    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Read the full configuration from the controller and write it as text.
    Export(ExportArgs),
    /// Parse a text configuration and program it into the controller.
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Text configuration to program.
    pub file: PathBuf,
}

pub fn run(args: ConfigArgs, _format: OutputFormat) -> CliResult<i32> {
    let mut bus = args.bus.open()?;
    match args.action {
        ConfigAction::Export(export) => {
            let text = export_text(&mut bus)?;
            match &export.output {
                Some(path) => fs::write(path, text).map_err(|err| {
                    io_error(&format!("failed writing {}", path.display()), err)
                })?,
                None => print!("{text}"),
            }
            Ok(SUCCESS)
        }
        ConfigAction::Import(import) => {
            let text = fs::read_to_string(&import.file).map_err(|err| {
                io_error(&format!("failed reading {}", import.file.display()), err)
            })?;
            import_text(&mut bus, &text)?;
            Ok(SUCCESS)
        }
    }
}

fn export_text(bus: &mut Bus) -> CliResult<String> {
    let mut text = String::new();

    let envelope = bus.request(&Message::RtcFetch)?;
    match envelope.message {
        Some(Message::Rtc(rtc)) => text.push_str(&rtc.to_text()),
        other => return Err(unexpected_reply("RTC fetch", &other)),
    }

    let envelope = bus.request(&Message::GlobalConfigFetch)?;
    match envelope.message {
        Some(Message::GlobalConfig(conf)) => {
            text.push('\n');
            text.push_str(&conf.to_text());
        }
        other => return Err(unexpected_reply("global config fetch", &other)),
    }

    for pot in 0..MAX_POTS as u8 {
        let envelope = bus.request(&Message::PotConfigFetch { pot_number: pot })?;
        match envelope.message {
            Some(Message::PotConfig(conf)) => {
                text.push('\n');
                text.push_str(&conf.to_text());
            }
            other => return Err(unexpected_reply("pot config fetch", &other)),
        }
    }

    Ok(text)
}

fn import_text(bus: &mut Bus, text: &str) -> CliResult<()> {
    let cfg = TextConfig::parse(text).map_err(|err| config_error("invalid config file", err))?;

    if cfg.has_section("RTC") {
        let rtc = Rtc::from_text(text).map_err(|err| config_error("invalid RTC section", err))?;
        bus.send(&Message::Rtc(rtc))?;
    }

    if cfg.has_section("GLOBAL_CONFIG") {
        let global = GlobalConfig::from_text(text)
            .map_err(|err| config_error("invalid global config section", err))?;
        bus.send(&Message::GlobalConfig(global))?;
    }

    for pot in 0..MAX_POTS as u8 {
        if !cfg.has_section(&format!("POT_{pot}_CONFIG")) {
            continue;
        }
        let conf = PotConfig::from_config(pot, &cfg)
            .map_err(|err| config_error("invalid pot config section", err))?;
        bus.send(&Message::PotConfig(conf))?;
    }

    Ok(())
}

fn unexpected_reply(what: &str, got: &Option<Message>) -> CliError {
    CliError::new(INTERNAL, format!("unexpected reply to {what}: {got:?}"))
}
