use bytes::Bytes;

use crate::codec::hex;
use crate::command::Command;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The value is missing or cannot be encoded as an unsigned 16-bit integer.
    #[error("{command}: invalid value: {reason}")]
    InvalidValue { command: Command, reason: String },

    /// Fewer bytes than the command's response length arrived (device timeout).
    #[error("{command}: incomplete response ({actual} of {expected} bytes)")]
    IncompleteResponse {
        command: Command,
        expected: usize,
        actual: usize,
    },

    /// Bad start marker, opcode echo, or checksum.
    #[error("{command}: invalid response: {}", hex(.raw))]
    ResponseFormat { command: Command, raw: Bytes },

    /// The hotplate reported that it could not carry out the command.
    #[error("hotplate error with command {command}")]
    DeviceError { command: Command },

    /// Well-formed frame whose payload could not be decoded.
    #[error("{command}: could not parse response ({reason}): {}", hex(.raw))]
    ParseError {
        command: Command,
        raw: Bytes,
        reason: &'static str,
    },
}

impl FrameError {
    /// The command the failing frame belongs to.
    pub fn command(&self) -> Command {
        match self {
            FrameError::InvalidValue { command, .. }
            | FrameError::IncompleteResponse { command, .. }
            | FrameError::ResponseFormat { command, .. }
            | FrameError::DeviceError { command }
            | FrameError::ParseError { command, .. } => *command,
        }
    }

    /// Raw response bytes, where the failure carries them.
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            FrameError::ResponseFormat { raw, .. } | FrameError::ParseError { raw, .. } => {
                Some(raw.as_ref())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
