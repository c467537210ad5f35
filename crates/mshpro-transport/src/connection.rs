use bytes::Bytes;
use tracing::{debug, info};

use crate::duplex::Duplex;
use crate::error::{Result, TransportError};
use crate::traits::Link;

/// A lazily-opened duplex connection to one device.
///
/// Created closed. The first transaction opens the link; [`Connection::close`]
/// or dropping the connection releases the stream.
pub struct Connection<L: Link> {
    link: L,
    duplex: Option<Duplex<L::Stream>>,
}

impl<L: Link> Connection<L> {
    /// Create a closed connection.
    pub fn new(link: L) -> Self {
        Self { link, duplex: None }
    }

    /// Open the link if it is not open yet.
    pub fn open(&mut self) -> Result<&Duplex<L::Stream>> {
        if self.duplex.is_none() {
            let stream = self.link.open()?;
            self.duplex = Some(Duplex::new(stream)?);
            debug!(port = self.link.name(), "connection open");
        }
        self.duplex.as_ref().ok_or(TransportError::Closed)
    }

    /// Close the link. Closing a closed connection is a no-op.
    pub fn close(&mut self) {
        if self.duplex.take().is_some() {
            info!(port = self.link.name(), "connection closed");
        }
    }

    /// Whether the link is currently open.
    pub fn is_open(&self) -> bool {
        self.duplex.is_some()
    }

    /// Run one exchange, opening the link first if needed.
    pub fn transact(&mut self, request: &[u8], expected_len: usize) -> Result<Bytes> {
        self.open()?.transact(request, expected_len)
    }

    /// Bytes received by the most recent exchange on the open link.
    pub fn last_response(&self) -> Result<Bytes> {
        match self.duplex {
            Some(ref duplex) => duplex.last_response(),
            None => Err(TransportError::Closed),
        }
    }

    /// The link this connection opens.
    pub fn link(&self) -> &L {
        &self.link
    }
}

impl<L: Link> Drop for Connection<L> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<L: Link> std::fmt::Debug for Connection<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("port", &self.link.name())
            .field("open", &self.is_open())
            .finish()
    }
}
