use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// A connected byte stream.
///
/// This is the capability a [`Duplex`](crate::Duplex) needs from a transport.
/// Reads are bounded by a timeout configured on the stream; a read that times
/// out returns `ErrorKind::TimedOut` (or `Ok(0)`) rather than blocking forever.
pub trait ByteStream: Read + Write + Send + Sized {
    /// Create a second handle to the same stream.
    ///
    /// The duplex reader uses the clone while the writer keeps the original.
    fn try_clone(&self) -> Result<Self>;

    /// Discard bytes received but not yet read.
    fn clear_input(&mut self) -> Result<()>;

    /// Discard bytes written but not yet transmitted.
    fn clear_output(&mut self) -> Result<()>;

    /// Upper bound for reading one whole response. `None` leaves only the
    /// per-read timeout in effect.
    fn read_timeout(&self) -> Option<Duration> {
        None
    }
}

/// Something that can open a [`ByteStream`] on demand.
///
/// A [`Connection`](crate::Connection) holds a link while closed and opens it
/// lazily before the first transaction.
pub trait Link {
    /// The stream produced by [`Link::open`].
    type Stream: ByteStream;

    /// Open the underlying stream.
    fn open(&self) -> Result<Self::Stream>;

    /// Name of the endpoint for diagnostics (usually the port path).
    fn name(&self) -> &str;
}
