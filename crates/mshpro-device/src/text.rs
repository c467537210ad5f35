//! One-line text commands: `PING`, `STATUS`, `OFF`, `STIR <rpm|OFF>`,
//! `HEAT <°C|OFF>`, `MODE <A|B|C>`. Case does not matter.

use std::str::FromStr;

use mshpro_frame::Mode;
use serde::Serialize;

use crate::error::HotplateError;
use crate::hotplate::Outcome;
use crate::status::DeviceStatus;

/// A parsed text command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextCommand {
    Ping,
    /// Normalized status.
    Status,
    /// Heat and stir off.
    Off,
    /// `None` switches stirring off.
    Stir(Option<u32>),
    /// `None` switches heating off.
    Heat(Option<f64>),
    Mode(Mode),
}

impl FromStr for TextCommand {
    type Err = HotplateError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.to_uppercase();
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let argument = words.next();

        match name {
            "PING" => Ok(TextCommand::Ping),
            "STATUS" => Ok(TextCommand::Status),
            "OFF" => Ok(TextCommand::Off),
            "STIR" => {
                let argument = required("STIR", argument)?;
                if argument == "OFF" {
                    return Ok(TextCommand::Stir(None));
                }
                argument
                    .parse()
                    .map(|rpm| TextCommand::Stir(Some(rpm)))
                    .map_err(|_| invalid("STIR", argument))
            }
            "HEAT" => {
                let argument = required("HEAT", argument)?;
                if argument == "OFF" {
                    return Ok(TextCommand::Heat(None));
                }
                argument
                    .parse()
                    .map(|celsius| TextCommand::Heat(Some(celsius)))
                    .map_err(|_| invalid("HEAT", argument))
            }
            "MODE" => {
                let argument = required("MODE", argument)?;
                Mode::from_letter(argument)
                    .map(TextCommand::Mode)
                    .ok_or_else(|| invalid("MODE", argument))
            }
            _ => Err(HotplateError::UnknownCommand(name.to_string())),
        }
    }
}

fn required<'a>(
    command: &'static str,
    argument: Option<&'a str>,
) -> Result<&'a str, HotplateError> {
    argument.ok_or(HotplateError::MissingArgument { command })
}

fn invalid(command: &'static str, argument: &str) -> HotplateError {
    HotplateError::InvalidArgument {
        command,
        argument: argument.to_string(),
    }
}

/// Result of [`Hotplate::execute`](crate::Hotplate::execute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TextReply {
    Ping(bool),
    Status(DeviceStatus),
    Outcome(Outcome),
    Outcomes(Vec<Outcome>),
}
