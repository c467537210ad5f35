//! In-memory hotplate that speaks the wire protocol and toggles like the
//! real device.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use mshpro_device::Hotplate;
use mshpro_frame::{decode_request, encode_response, Command, Mode, REQUEST_LEN};
use mshpro_transport::{ByteStream, Link, TransportError};

const READ_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct Device {
    pub stir_set: u16,
    pub stir_actual: u16,
    pub heat_set: u16,
    pub heat_actual: u16,
    pub stir_on: bool,
    pub heat_on: bool,
    pub heat_limit: u16,
    pub mode: Mode,
    pub heat_alarm: bool,
    /// Answer nothing at all.
    pub silent: bool,
    /// Refuse this command with the failure acknowledgement.
    pub refuse: Option<Command>,
    /// Frames received, by command.
    pub received: HashMap<Command, usize>,
    /// Values received for STIR/HEAT, in order.
    pub sent_values: Vec<(Command, u16)>,
    pub opens: usize,
    pub pending: Vec<u8>,
    pub rx: VecDeque<u8>,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            stir_set: 0,
            stir_actual: 0,
            heat_set: 0,
            heat_actual: 231,
            stir_on: false,
            heat_on: false,
            heat_limit: 3400,
            mode: Mode::A,
            heat_alarm: false,
            silent: false,
            refuse: None,
            received: HashMap::new(),
            sent_values: Vec::new(),
            opens: 0,
            pending: Vec::new(),
            rx: VecDeque::new(),
        }
    }
}

impl Device {
    pub fn count(&self, command: Command) -> usize {
        self.received.get(&command).copied().unwrap_or(0)
    }

    fn handle(&mut self, frame: &[u8]) {
        let Some((command, value)) = decode_request(frame) else {
            return;
        };
        *self.received.entry(command).or_default() += 1;
        if self.silent {
            return;
        }
        if self.refuse == Some(command) {
            self.rx.extend(encode_response(command, &[0x01, 0x00, 0x00]));
            return;
        }

        let data: Vec<u8> = match command {
            Command::Ping => vec![0; 3],
            Command::Info => {
                let [hi, lo] = self.heat_limit.to_be_bytes();
                vec![
                    self.mode.code(),
                    u8::from(!self.stir_on),
                    u8::from(!self.heat_on),
                    hi,
                    lo,
                    u8::from(!self.heat_alarm),
                    0,
                    0,
                ]
            }
            Command::Status => [self.stir_set, self.stir_actual, self.heat_set, self.heat_actual]
                .iter()
                .flat_map(|v| v.to_be_bytes())
                .collect(),
            Command::Stir => {
                self.sent_values.push((command, value));
                self.stir_set = value;
                self.stir_on = !self.stir_on;
                vec![0; 3]
            }
            Command::Heat => {
                self.sent_values.push((command, value));
                self.heat_set = value;
                self.heat_on = !self.heat_on;
                vec![0; 3]
            }
            Command::Mode => {
                self.mode = self.mode.next();
                vec![0; 3]
            }
        };
        self.rx.extend(encode_response(command, &data));
    }
}

type Shared = Arc<(Mutex<Device>, Condvar)>;

fn lock(shared: &Shared) -> MutexGuard<'_, Device> {
    shared.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A handle on one side of the simulated serial line.
pub struct SimStream {
    shared: Shared,
}

impl Read for SimStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (_, cvar) = &*self.shared;
        let guard = lock(&self.shared);
        let (mut device, _) = cvar
            .wait_timeout_while(guard, READ_TIMEOUT, |d| d.rx.is_empty())
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if device.rx.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"));
        }
        let n = buf.len().min(device.rx.len());
        for (slot, byte) in buf.iter_mut().zip(device.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for SimStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut device = lock(&self.shared);
        device.pending.extend_from_slice(buf);
        while device.pending.len() >= REQUEST_LEN {
            let frame: Vec<u8> = device.pending.drain(..REQUEST_LEN).collect();
            device.handle(&frame);
        }
        drop(device);
        self.shared.1.notify_all();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteStream for SimStream {
    fn try_clone(&self) -> mshpro_transport::Result<Self> {
        Ok(Self {
            shared: Arc::clone(&self.shared),
        })
    }

    fn clear_input(&mut self) -> mshpro_transport::Result<()> {
        lock(&self.shared).rx.clear();
        Ok(())
    }

    fn clear_output(&mut self) -> mshpro_transport::Result<()> {
        lock(&self.shared).pending.clear();
        Ok(())
    }
}

/// Link to a simulated hotplate. Clones share the device.
#[derive(Clone)]
pub struct SimLink {
    shared: Shared,
}

impl SimLink {
    pub fn new(device: Device) -> Self {
        Self {
            shared: Arc::new((Mutex::new(device), Condvar::new())),
        }
    }

    pub fn device(&self) -> MutexGuard<'_, Device> {
        lock(&self.shared)
    }
}

impl Link for SimLink {
    type Stream = SimStream;

    fn open(&self) -> mshpro_transport::Result<SimStream> {
        lock(&self.shared).opens += 1;
        Ok(SimStream {
            shared: Arc::clone(&self.shared),
        })
    }

    fn name(&self) -> &str {
        "sim"
    }
}

/// A link whose port never opens.
pub struct DeadLink;

impl Link for DeadLink {
    type Stream = SimStream;

    fn open(&self) -> mshpro_transport::Result<SimStream> {
        Err(TransportError::PortNotFound("dead".to_string()))
    }

    fn name(&self) -> &str {
        "dead"
    }
}

/// A hotplate on a fresh simulated device, plus a handle on that device.
pub fn hotplate(device: Device) -> (Hotplate<SimLink>, SimLink) {
    let link = SimLink::new(device);
    (Hotplate::new(link.clone()), link)
}
