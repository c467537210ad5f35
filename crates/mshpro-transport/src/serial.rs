use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{ByteStream, Link};

/// Baud rate used by MSHPro hotplates.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default read timeout for one response.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial line settings.
///
/// `Default` yields the hotplate's settings: 9600 baud, 8 data bits, no
/// parity, one stop bit, no flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Read timeout; a read that expires returns whatever arrived so far.
    pub read_timeout: Duration,
    /// Write timeout. `None` uses the read timeout.
    pub write_timeout: Option<Duration>,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: None,
        }
    }
}

impl SerialConfig {
    /// Same settings with a different read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// A serial port that can be opened on demand.
#[derive(Debug, Clone)]
pub struct SerialLink {
    port: String,
    config: SerialConfig,
}

impl SerialLink {
    /// Create a link for an already-resolved port name. Nothing is opened yet.
    pub fn new(port: impl Into<String>, config: SerialConfig) -> Self {
        Self {
            port: port.into(),
            config,
        }
    }
}

impl Link for SerialLink {
    type Stream = SerialStream;

    fn open(&self) -> Result<SerialStream> {
        let port = serialport::new(&self.port, self.config.baud_rate)
            .data_bits(self.config.data_bits)
            .parity(self.config.parity)
            .stop_bits(self.config.stop_bits)
            .flow_control(self.config.flow_control)
            .timeout(self.config.read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: self.port.clone(),
                source,
            })?;

        info!(port = %self.port, baud = self.config.baud_rate, "opened serial port");
        Ok(SerialStream {
            inner: port,
            write_timeout: self.config.write_timeout,
        })
    }

    fn name(&self) -> &str {
        &self.port
    }
}

/// An open serial port.
pub struct SerialStream {
    inner: Box<dyn SerialPort>,
    write_timeout: Option<Duration>,
}

impl SerialStream {
    /// Name reported by the OS, if any.
    pub fn port_name(&self) -> Option<String> {
        self.inner.name()
    }
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        // serialport shares one timeout for both directions.
        if let Some(timeout) = self.write_timeout {
            let read_timeout = self.inner.timeout();
            self.inner.set_timeout(timeout)?;
            let written = self.inner.write(buf);
            self.inner.set_timeout(read_timeout)?;
            return written;
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl ByteStream for SerialStream {
    fn try_clone(&self) -> Result<Self> {
        let inner = self
            .inner
            .try_clone()
            .map_err(|err| TransportError::Io(err.into()))?;
        Ok(Self {
            inner,
            write_timeout: self.write_timeout,
        })
    }

    fn clear_input(&mut self) -> Result<()> {
        self.inner
            .clear(ClearBuffer::Input)
            .map_err(|err| TransportError::Io(err.into()))
    }

    fn clear_output(&mut self) -> Result<()> {
        self.inner
            .clear(ClearBuffer::Output)
            .map_err(|err| TransportError::Io(err.into()))
    }

    fn read_timeout(&self) -> Option<Duration> {
        Some(self.inner.timeout())
    }
}

impl Drop for SerialStream {
    fn drop(&mut self) {
        debug!(port = ?self.inner.name(), "closing serial handle");
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("port", &self.inner.name())
            .field("baud", &self.inner.baud_rate().ok())
            .finish()
    }
}
