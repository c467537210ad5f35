use crate::channel::Channel;

/// Errors that can occur in hotplate operations.
#[derive(Debug, thiserror::Error)]
pub enum HotplateError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] mshpro_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] mshpro_frame::FrameError),

    /// Requested target is outside what the device accepts.
    #[error("{channel} setting {value} outside allowable range {min}-{max}")]
    OutOfRange {
        channel: Channel,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Text command with an unrecognized leading word.
    #[error("could not find command: {0}")]
    UnknownCommand(String),

    /// Text command that needs an argument but got none.
    #[error("{command} needs an argument")]
    MissingArgument { command: &'static str },

    /// Text command argument that could not be parsed.
    #[error("{command}: invalid argument '{argument}'")]
    InvalidArgument {
        command: &'static str,
        argument: String,
    },
}

impl HotplateError {
    /// Whether the device did not answer in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            HotplateError::Transport(err) => err.is_timeout(),
            HotplateError::Frame(mshpro_frame::FrameError::IncompleteResponse { .. }) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, HotplateError>;
