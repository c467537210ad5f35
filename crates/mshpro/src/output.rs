use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mshpro_device::{DeviceStatus, Outcome};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Serialize)]
struct PingOutput<'a> {
    port: &'a str,
    alive: bool,
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    port: &'a str,
    #[serde(flatten)]
    status: &'a DeviceStatus,
}

#[derive(Serialize)]
struct PortsOutput<'a> {
    ports: &'a [String],
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_ping(port: &str, alive: bool, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&PingOutput { port, alive }),
        OutputFormat::Table | OutputFormat::Pretty => {
            let state = if alive { "responding" } else { "not responding" };
            println!("{port}: {state}");
        }
    }
}

pub fn print_status(port: &str, status: &DeviceStatus, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&StatusOutput { port, status }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNEL", "STATE", "SET", "ACTUAL"])
                .add_row(vec![
                    "HEAT".to_string(),
                    on_off(status.heat_on).to_string(),
                    format!("{} °C", status.heat_set),
                    format!("{} °C", status.heat_actual),
                ])
                .add_row(vec![
                    "STIR".to_string(),
                    on_off(status.stir_on).to_string(),
                    format!("{} rpm", status.stir_set),
                    format!("{} rpm", status.stir_actual),
                ]);
            println!("{table}");
            println!(
                "mode {}  heat limit {} °C  alarm {}",
                status.mode,
                status.heat_limit,
                on_off(status.heat_alarm)
            );
        }
        OutputFormat::Pretty => println!("{}", pretty_status(status)),
    }
}

pub fn print_outcomes(outcomes: &[Outcome], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(outcomes),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["RESULT", "SENDS"]);
            for outcome in outcomes {
                table.add_row(vec![outcome.to_string(), outcome.sends().to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for outcome in outcomes {
                println!("{outcome}");
            }
        }
    }
}

pub fn print_ports(ports: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&PortsOutput { ports }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["PORT"]);
            for port in ports {
                table.add_row(vec![port.as_str()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for port in ports {
                println!("{port}");
            }
        }
    }
}

fn pretty_status(status: &DeviceStatus) -> String {
    format!(
        "heat {} set={} actual={} | stir {} set={} actual={} | mode {}",
        on_off(status.heat_on),
        status.heat_set,
        status.heat_actual,
        on_off(status.stir_on),
        status.stir_set,
        status.stir_actual,
        status.mode
    )
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
