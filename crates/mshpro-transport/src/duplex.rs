use std::io::{ErrorKind, Write};
use std::sync::{Mutex, PoisonError, TryLockError};
use std::thread;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::error::{Result, TransportError};
use crate::traits::ByteStream;

const READ_CHUNK_SIZE: usize = 64;

/// One write with its response read concurrently, over a shared stream.
///
/// The device may start replying before the request is fully flushed, so the
/// read must already be running when the write starts. Each transaction spawns
/// one scoped reader thread and joins it before returning; from the caller's
/// side a transaction is blocking.
///
/// At most one transaction is in flight per `Duplex`. A second caller gets
/// [`TransportError::Busy`] instead of waiting.
pub struct Duplex<S> {
    halves: Mutex<Halves<S>>,
    last: Mutex<Slot>,
}

struct Halves<S> {
    writer: S,
    reader: S,
}

/// Result of the most recent transaction.
#[derive(Debug, Clone)]
enum Slot {
    Idle,
    Reading,
    Received(Bytes),
    Failed { kind: ErrorKind, message: String },
    Panicked,
}

#[derive(Debug, Clone, Copy)]
enum ReadPlan {
    Exact(usize),
    Until {
        terminator: u8,
        max_len: Option<usize>,
    },
}

impl<S: ByteStream> Duplex<S> {
    /// Wrap an open stream. A second handle is cloned for the reader side.
    pub fn new(stream: S) -> Result<Self> {
        let reader = stream.try_clone()?;
        Ok(Self {
            halves: Mutex::new(Halves {
                writer: stream,
                reader,
            }),
            last: Mutex::new(Slot::Idle),
        })
    }

    /// Write `request` while concurrently reading `expected_len` response bytes.
    ///
    /// A read timeout yields however many bytes arrived. Zero bytes is
    /// [`TransportError::NoData`]; a short non-empty read is returned as is.
    pub fn transact(&self, request: &[u8], expected_len: usize) -> Result<Bytes> {
        self.run(request, ReadPlan::Exact(expected_len))
    }

    /// Like [`Duplex::transact`], but the reader stops after `terminator`
    /// (included in the result), after `max_len` bytes, or at timeout.
    pub fn transact_until(
        &self,
        request: &[u8],
        terminator: u8,
        max_len: Option<usize>,
    ) -> Result<Bytes> {
        self.run(
            request,
            ReadPlan::Until {
                terminator,
                max_len,
            },
        )
    }

    /// Bytes received by the most recent transaction.
    ///
    /// Fails with [`TransportError::NoCommunication`] before any transaction,
    /// [`TransportError::NotComplete`] while one is running, and
    /// [`TransportError::NoData`] if the last one received nothing.
    pub fn last_response(&self) -> Result<Bytes> {
        let slot = self
            .last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        slot_value(slot)
    }

    /// Whether a transaction is currently running.
    pub fn is_busy(&self) -> bool {
        matches!(self.halves.try_lock(), Err(TryLockError::WouldBlock))
    }

    fn run(&self, request: &[u8], plan: ReadPlan) -> Result<Bytes> {
        let mut halves = match self.halves.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(TransportError::Busy),
            // A panicking reader leaves the streams intact; the next transaction
            // clears both buffers anyway.
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        let Halves { writer, reader } = &mut *halves;

        writer.clear_output()?;
        reader.clear_input()?;
        self.set_slot(Slot::Reading);

        let started = Instant::now();
        let deadline = reader.read_timeout().map(|timeout| started + timeout);
        let (written, read) = thread::scope(|scope| {
            let handle = scope.spawn(move || read_response(reader, plan, deadline));
            let written = write_request(writer, request);
            let read = handle.join();
            (written, read)
        });

        let slot = match (written, read) {
            (Err(err), _) => {
                warn!(error = %err, "request write failed");
                failed(&err)
            }
            (Ok(()), Err(_)) => {
                warn!("response reader panicked");
                Slot::Panicked
            }
            (Ok(()), Ok(Err(err))) => {
                warn!(error = %err, "response read failed");
                failed(&err)
            }
            (Ok(()), Ok(Ok(bytes))) => {
                debug!(
                    sent = request.len(),
                    received = bytes.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "transaction complete"
                );
                Slot::Received(Bytes::from(bytes))
            }
        };

        self.set_slot(slot.clone());
        slot_value(slot)
    }

    fn set_slot(&self, slot: Slot) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = slot;
    }
}

impl<S> std::fmt::Debug for Duplex<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last = self
            .last
            .lock()
            .map(|slot| format!("{slot:?}"))
            .unwrap_or_else(|_| "<poisoned>".to_string());
        f.debug_struct("Duplex").field("last", &last).finish()
    }
}

fn failed(err: &std::io::Error) -> Slot {
    Slot::Failed {
        kind: err.kind(),
        message: err.to_string(),
    }
}

fn slot_value(slot: Slot) -> Result<Bytes> {
    match slot {
        Slot::Idle => Err(TransportError::NoCommunication),
        Slot::Reading => Err(TransportError::NotComplete),
        Slot::Received(bytes) if bytes.is_empty() => Err(TransportError::NoData),
        Slot::Received(bytes) => Ok(bytes),
        Slot::Failed { kind, message } => {
            Err(TransportError::Io(std::io::Error::new(kind, message)))
        }
        Slot::Panicked => Err(TransportError::ReaderPanicked),
    }
}

fn write_request<W: Write>(writer: &mut W, request: &[u8]) -> std::io::Result<()> {
    let mut offset = 0usize;
    while offset < request.len() {
        match writer.write(&request[offset..]) {
            Ok(0) => return Err(std::io::Error::from(ErrorKind::WriteZero)),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Read until `plan` is satisfied, the line goes quiet, or `deadline` passes.
/// The deadline bounds the whole response, not each read.
fn read_response<R: std::io::Read>(
    reader: &mut R,
    plan: ReadPlan,
    deadline: Option<Instant>,
) -> std::io::Result<Vec<u8>> {
    let mut collected = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            trace!(received = collected.len(), "response deadline passed");
            break;
        }

        let want = match plan {
            ReadPlan::Exact(len) => {
                if collected.len() >= len {
                    break;
                }
                (len - collected.len()).min(READ_CHUNK_SIZE)
            }
            // One byte at a time so nothing past the terminator is consumed.
            ReadPlan::Until { max_len, .. } => {
                if max_len.is_some_and(|max| collected.len() >= max) {
                    break;
                }
                1
            }
        };

        match reader.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(n) => {
                collected.extend_from_slice(&chunk[..n]);
                if let ReadPlan::Until { terminator, .. } = plan {
                    if chunk[n - 1] == terminator {
                        break;
                    }
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                trace!(received = collected.len(), "read timed out");
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(collected)
}
