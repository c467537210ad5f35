//! Protocol commands.
//!
//! Opcodes `0xA*` read from the hotplate, `0xB*` change its state. MODE is
//! undocumented by the vendor; it cycles the heating profile A -> B -> C -> A.

use std::fmt;

/// A protocol operation with a fixed opcode and response length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Is the hotplate on and answering.
    Ping,
    /// Mode, on/off flags, heat limit, heat alarm.
    Info,
    /// Set and measured stir speed and temperature.
    Status,
    /// Set stir speed (rpm). Sending any speed toggles stirring on/off.
    Stir,
    /// Set temperature (tenths of °C). Sending any temperature toggles heating on/off.
    Heat,
    /// Cycle heating profile (undocumented).
    Mode,
}

impl Command {
    /// All commands, in opcode order.
    pub const ALL: [Command; 6] = [
        Command::Ping,
        Command::Info,
        Command::Status,
        Command::Stir,
        Command::Heat,
        Command::Mode,
    ];

    pub fn opcode(self) -> u8 {
        match self {
            Command::Ping => 0xA0,
            Command::Info => 0xA1,
            Command::Status => 0xA2,
            Command::Stir => 0xB1,
            Command::Heat => 0xB2,
            Command::Mode => 0xB3,
        }
    }

    /// Look up a command by opcode.
    pub fn from_opcode(opcode: u8) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.opcode() == opcode)
    }

    /// Length of the complete response frame.
    pub fn response_len(self) -> usize {
        match self {
            Command::Info | Command::Status => 11,
            _ => 6,
        }
    }

    /// Whether the request frame carries a value.
    pub fn carries_value(self) -> bool {
        matches!(self, Command::Stir | Command::Heat)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Info => "INFO",
            Command::Status => "STATUS",
            Command::Stir => "STIR",
            Command::Heat => "HEAT",
            Command::Mode => "MODE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
