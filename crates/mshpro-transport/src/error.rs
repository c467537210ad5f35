/// Errors that can occur in serial transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the specified serial port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// An I/O error occurred on the byte stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The port path does not exist on this system.
    #[error("port does not exist: {0}")]
    PortNotFound(String),

    /// A transaction is already in flight on this connection.
    #[error("a transaction is already in flight on this connection")]
    Busy,

    /// The reader of the current transaction has not finished yet.
    #[error("reading must be complete before accessing the response")]
    NotComplete,

    /// No transaction has run on this connection.
    #[error("no communication attempted")]
    NoCommunication,

    /// The transaction completed but nothing was received (device timeout).
    #[error("no data received")]
    NoData,

    /// The concurrent reader panicked before returning.
    #[error("reader thread panicked")]
    ReaderPanicked,

    /// The connection has been closed.
    #[error("connection closed")]
    Closed,
}

impl TransportError {
    /// Whether the failure means the device never answered.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::NoData => true,
            TransportError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
