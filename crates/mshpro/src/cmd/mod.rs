use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use mshpro_device::{connect_with_config, Hotplate, HotplateConfig, Mode};
use mshpro_transport::SerialLink;

use crate::exit::{hotplate_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod exec;
pub mod heat;
pub mod mode;
pub mod monitor;
pub mod off;
pub mod ping;
pub mod ports;
pub mod status;
pub mod stir;
pub mod version;

/// Options shared by every subcommand.
#[derive(Debug)]
pub struct Global {
    pub port: Option<String>,
    pub timeout: Option<String>,
    pub format: OutputFormat,
}

impl Global {
    /// Attach to the hotplate named by `--port`. The port opens on first use.
    pub fn hotplate(&self) -> CliResult<Hotplate<SerialLink>> {
        let port = self
            .port
            .as_deref()
            .ok_or_else(|| CliError::usage("no serial port given (use --port or MSHPRO_PORT)"))?;

        let mut config = HotplateConfig::default();
        if let Some(timeout) = &self.timeout {
            config.serial = config.serial.with_read_timeout(parse_duration(timeout)?);
        }
        connect_with_config(port, &config).map_err(|err| hotplate_error(port, err))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the hotplate answers.
    Ping(PingArgs),
    /// Show set and measured values.
    Status(StatusArgs),
    /// Heat to a temperature (°C), or "off".
    Heat(HeatArgs),
    /// Stir at a speed (rpm), or "off".
    Stir(StirArgs),
    /// Switch heating and stirring off.
    Off(OffArgs),
    /// Select heating profile A, B or C.
    Mode(ModeArgs),
    /// Run a text command such as "heat 120" or "stir off".
    Exec(ExecArgs),
    /// Poll status until Ctrl-C.
    Monitor(MonitorArgs),
    /// List serial ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, global: &Global) -> CliResult<i32> {
    match command {
        Command::Ping(args) => ping::run(args, global),
        Command::Status(args) => status::run(args, global),
        Command::Heat(args) => heat::run(args, global),
        Command::Stir(args) => stir::run(args, global),
        Command::Off(args) => off::run(args, global),
        Command::Mode(args) => mode::run(args, global),
        Command::Exec(args) => exec::run(args, global),
        Command::Monitor(args) => monitor::run(args, global),
        Command::Ports(args) => ports::run(args, global),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct PingArgs {}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Report stored set values even for channels that are off.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct HeatArgs {
    /// Target temperature in °C, or "off".
    #[arg(value_name = "CELSIUS|off")]
    pub target: String,
}

#[derive(Args, Debug)]
pub struct StirArgs {
    /// Target speed in rpm, or "off".
    #[arg(value_name = "RPM|off")]
    pub target: String,
}

#[derive(Args, Debug, Default)]
pub struct OffArgs {}

#[derive(Args, Debug)]
pub struct ModeArgs {
    #[arg(value_enum, ignore_case = true)]
    pub mode: ModeArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ModeArg {
    A,
    B,
    C,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::A => Mode::A,
            ModeArg::B => Mode::B,
            ModeArg::C => Mode::C,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command words, e.g. `heat 120`.
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Time between polls (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub interval: String,
    /// Stop after N polls.
    #[arg(long)]
    pub count: Option<usize>,
    /// Report stored set values even for channels that are off.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `off` (any case) as `None`, anything else with `parse`.
pub fn parse_target<T: std::str::FromStr>(input: &str, what: &str) -> CliResult<Option<T>> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| CliError::usage(format!("invalid {what}: {input}")))
}

/// Parse durations such as `500ms`, `2s` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
