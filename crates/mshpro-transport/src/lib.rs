//! Serial byte-stream transport for MSHPro hotplates.
//!
//! This is the lowest layer of mshpro. It provides:
//! - the [`ByteStream`] capability trait and a [`SerialLink`] that opens real ports
//! - port name resolution from plain indexes (`0` -> `/dev/ttyUSB0` or `COM0`)
//! - a lazily-opened [`Connection`]
//! - the [`Duplex`] transaction: one write with its response read concurrently
//!
//! Everything else builds on the [`Duplex::transact`] primitive provided here.

pub mod connection;
pub mod duplex;
pub mod error;
pub mod port;
pub mod serial;
pub mod traits;

pub use connection::Connection;
pub use duplex::Duplex;
pub use error::{Result, TransportError};
pub use port::{available_ports, resolve_port};
pub use serial::{SerialConfig, SerialLink, SerialStream, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
pub use traits::{ByteStream, Link};
