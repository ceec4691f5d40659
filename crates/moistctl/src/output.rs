use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use moistctl_proto::consts::pot_state_name;
use moistctl_proto::{LogItem, LogKind, ManualMode, PotState, Rtc};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_rtc(rtc: &Rtc, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(rtc),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DATE", "TIME", "DAY OF WEEK"])
                .add_row(vec![
                    format!(
                        "{:04}.{:02}.{:02}",
                        u16::from(rtc.year) + 2000,
                        rtc.month + 1,
                        rtc.day + 1
                    ),
                    format!("{:02}:{:02}:{:02}", rtc.hour, rtc.minute, rtc.second),
                    rtc.day_of_week.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{:04}.{:02}.{:02} {:02}:{:02}:{:02} (dow {})",
                u16::from(rtc.year) + 2000,
                rtc.month + 1,
                rtc.day + 1,
                rtc.hour,
                rtc.minute,
                rtc.second,
                rtc.day_of_week
            );
        }
    }
}

pub fn print_pot_states(states: &[PotState], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&states),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["POT", "STATE", "WATERING", "RAW ADC", "VALUE"]);
            for state in states {
                table.add_row(vec![
                    (state.pot_number + 1).to_string(),
                    pot_state_name(state.state_id),
                    if state.is_watering { "yes" } else { "no" }.to_string(),
                    state.last_measured_raw_value.to_string(),
                    state.last_measured_value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for state in states {
                println!(
                    "pot {}: state={} watering={} raw={} value={}",
                    state.pot_number + 1,
                    pot_state_name(state.state_id),
                    state.is_watering,
                    state.last_measured_raw_value,
                    state.last_measured_value
                );
            }
        }
    }
}

pub fn print_manual_mode(man: &ManualMode, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(man),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "force_stop_watering_mask={:#04x}\nvalve_manual_mask={:#04x}\nvalve_manual_state={:#04x}",
                man.force_stop_watering_mask, man.valve_manual_mask, man.valve_manual_state
            );
        }
    }
}

#[derive(Serialize)]
struct LogItemOutput {
    timestamp: String,
    overflow: bool,
    kind: &'static str,
    text: String,
}

pub fn print_log_item(item: &LogItem, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = LogItemOutput {
                timestamp: item.timestamp.to_string(),
                overflow: item.overflow,
                kind: match item.kind {
                    LogKind::Error { .. } => "error",
                    LogKind::Info { .. } => "info",
                    LogKind::SensorData { .. } => "sensor_data",
                },
                text: item.text(),
            };
            print_json(&out);
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{item}"),
    }
}
