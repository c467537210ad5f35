use std::fmt;

use bytes::Bytes;
use mshpro_frame::{decode, encode_raw, hex, wire_value, Command, InfoReading, Mode, Response};
use mshpro_frame::{FrameError, StatusReading};
use mshpro_transport::{Connection, Link, SerialLink};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::channel::{Channel, Setting};
use crate::error::{HotplateError, Result};
use crate::status::DeviceStatus;
use crate::text::{TextCommand, TextReply};

/// What a state-changing operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Channel was on at the requested value; nothing sent.
    AlreadyAtTarget { channel: Channel, value: Setting },
    /// Channel was off at the requested value; one send turned it on.
    SwitchedOn { channel: Channel, value: Setting },
    /// Channel was off at another value; one send set it and turned it on.
    SetAndSwitchedOn { channel: Channel, value: Setting },
    /// Channel was on at another value; sent twice (off, then on at the new value).
    Retoggled { channel: Channel, value: Setting },
    /// Channel was already off; nothing sent.
    AlreadyOff { channel: Channel },
    SwitchedOff { channel: Channel },
    ModeUnchanged { mode: Mode },
    ModeCycled { from: Mode, to: Mode, steps: usize },
}

impl Outcome {
    /// Number of state-changing frames this outcome took.
    pub fn sends(&self) -> usize {
        match self {
            Outcome::AlreadyAtTarget { .. }
            | Outcome::AlreadyOff { .. }
            | Outcome::ModeUnchanged { .. } => 0,
            Outcome::SwitchedOn { .. }
            | Outcome::SetAndSwitchedOn { .. }
            | Outcome::SwitchedOff { .. } => 1,
            Outcome::Retoggled { .. } => 2,
            Outcome::ModeCycled { steps, .. } => *steps,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AlreadyAtTarget { channel, value } => {
                write!(f, "{channel} already on at {value}")
            }
            Outcome::SwitchedOn { channel, value } => write!(f, "{channel} switched on at {value}"),
            Outcome::SetAndSwitchedOn { channel, value } => {
                write!(f, "{channel} set to {value} and switched on")
            }
            Outcome::Retoggled { channel, value } => write!(f, "{channel} changed to {value}"),
            Outcome::AlreadyOff { channel } => write!(f, "{channel} already off"),
            Outcome::SwitchedOff { channel } => write!(f, "{channel} switched off"),
            Outcome::ModeUnchanged { mode } => write!(f, "mode already {mode}"),
            Outcome::ModeCycled { from, to, steps } => {
                write!(f, "mode changed {from} -> {to} ({steps} cycles)")
            }
        }
    }
}

/// An MSHPro hotplate/stirrer.
///
/// The device toggles a channel on every value it receives for it. Each
/// operation here reads the current state first and sends only what is
/// needed to reach the requested state, so repeating an operation is safe.
///
/// The serial port is opened before the first command and stays open until
/// [`Hotplate::close`] or drop.
pub struct Hotplate<L: Link = SerialLink> {
    conn: Connection<L>,
}

impl<L: Link> Hotplate<L> {
    /// Lowest accepted heat target, °C.
    pub const HEAT_MIN: f64 = 25.0;
    /// Highest accepted heat target, °C.
    pub const HEAT_MAX: f64 = 340.0;
    /// Lowest accepted stir target, rpm.
    pub const STIR_MIN: u32 = 100;
    /// Highest accepted stir target, rpm.
    pub const STIR_MAX: u32 = 1500;

    /// Wrap a link. Nothing is opened yet.
    pub fn new(link: L) -> Self {
        Self {
            conn: Connection::new(link),
        }
    }

    /// Name of the port this hotplate is attached to.
    pub fn port(&self) -> &str {
        self.conn.link().name()
    }

    /// Open the port now instead of on the first command.
    pub fn open(&mut self) -> Result<()> {
        self.conn.open()?;
        Ok(())
    }

    pub fn close(&mut self) {
        self.conn.close();
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }

    /// Raw bytes of the most recent reply.
    pub fn last_response(&self) -> Result<Bytes> {
        Ok(self.conn.last_response()?)
    }

    /// Whether the device answers. Never fails; any error means `false`.
    pub fn ping(&mut self) -> bool {
        match self.command(Command::Ping, 0) {
            Ok(_) => true,
            Err(err) => {
                debug!(port = self.port(), error = %err, "ping failed");
                false
            }
        }
    }

    /// Mode, on/off flags and heat limit.
    pub fn info(&mut self) -> Result<InfoReading> {
        match self.command(Command::Info, 0)? {
            Response::Info(info) => Ok(info),
            other => Err(unexpected(Command::Info, other)),
        }
    }

    /// Set and measured stir speed and temperature.
    pub fn read_status(&mut self) -> Result<StatusReading> {
        match self.command(Command::Status, 0)? {
            Response::Status(status) => Ok(status),
            other => Err(unexpected(Command::Status, other)),
        }
    }

    /// STATUS and INFO merged. With `normalize`, targets of channels that
    /// are off read as [`Setpoint::Off`](crate::Setpoint::Off).
    pub fn status(&mut self, normalize: bool) -> Result<DeviceStatus> {
        let (status, info) = self.readings()?;
        Ok(DeviceStatus::from_readings(&status, &info, normalize))
    }

    /// Heat to `target` °C, or switch heating off for `None` or zero.
    ///
    /// Targets are truncated to 0.1 °C. If anything goes wrong, including a
    /// target outside [`HEAT_MIN`](Self::HEAT_MIN)..=[`HEAT_MAX`](Self::HEAT_MAX),
    /// heating is switched off before the error is returned.
    pub fn set_heat(&mut self, target: Option<f64>) -> Result<Outcome> {
        let target = match target {
            Some(t) if t != 0.0 => t,
            _ => return self.heat_off(),
        };

        let result = channel_wire_value(Channel::Heat, target, Self::HEAT_MIN, Self::HEAT_MAX)
            .and_then(|wire| self.set_toggle_value(Channel::Heat, wire));

        if let Err(ref err) = result {
            warn!(port = self.port(), error = %err, "heat request failed, forcing heat off");
            if let Err(off_err) = self.heat_off() {
                error!(port = self.port(), error = %off_err, "could not force heat off");
            }
        }
        result
    }

    /// Stir at `target` rpm, or switch stirring off for `None` or zero.
    pub fn set_stir(&mut self, target: Option<u32>) -> Result<Outcome> {
        let target = match target {
            Some(t) if t != 0 => t,
            _ => return self.stir_off(),
        };

        let wire = channel_wire_value(
            Channel::Stir,
            f64::from(target),
            f64::from(Self::STIR_MIN),
            f64::from(Self::STIR_MAX),
        )?;
        self.set_toggle_value(Channel::Stir, wire)
    }

    pub fn heat_off(&mut self) -> Result<Outcome> {
        self.turn_off_one(Channel::Heat)
    }

    pub fn stir_off(&mut self) -> Result<Outcome> {
        self.turn_off_one(Channel::Stir)
    }

    /// Switch heating and stirring off.
    pub fn off(&mut self) -> Result<Vec<Outcome>> {
        self.turn_off(&[Channel::Heat, Channel::Stir])
    }

    /// Switch off each of `channels` that is on, from a single state read.
    ///
    /// Every channel is attempted even if an earlier one fails; the first
    /// failure is returned.
    pub fn turn_off(&mut self, channels: &[Channel]) -> Result<Vec<Outcome>> {
        let (status, info) = self.readings()?;

        let mut outcomes = Vec::with_capacity(channels.len());
        let mut first_err = None;
        for &channel in channels {
            match self.switch_off(channel, &status, &info) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(outcomes),
        }
    }

    /// Cycle the heating profile until it reads `target`.
    pub fn set_mode(&mut self, target: Mode) -> Result<Outcome> {
        let from = self.info()?.mode;
        let steps = from.steps_to(target);
        if steps == 0 {
            info!(port = self.port(), mode = %from, "mode unchanged");
            return Ok(Outcome::ModeUnchanged { mode: from });
        }

        for step in 0..steps {
            self.command(Command::Mode, 0).inspect_err(|err| {
                error!(port = self.port(), step, error = %err, "mode cycle failed")
            })?;
        }
        info!(port = self.port(), %from, to = %target, steps, "mode changed");
        Ok(Outcome::ModeCycled {
            from,
            to: target,
            steps,
        })
    }

    /// Run a parsed text command.
    pub fn execute(&mut self, command: &TextCommand) -> Result<TextReply> {
        Ok(match *command {
            TextCommand::Ping => TextReply::Ping(self.ping()),
            TextCommand::Status => TextReply::Status(self.status(true)?),
            TextCommand::Off => TextReply::Outcomes(self.off()?),
            TextCommand::Stir(target) => TextReply::Outcome(self.set_stir(target)?),
            TextCommand::Heat(target) => TextReply::Outcome(self.set_heat(target)?),
            TextCommand::Mode(mode) => TextReply::Outcome(self.set_mode(mode)?),
        })
    }

    /// Parse and run a line such as `heat 200` or `stir off`.
    pub fn execute_text(&mut self, line: &str) -> Result<TextReply> {
        let command: TextCommand = line.parse()?;
        self.execute(&command)
    }

    fn turn_off_one(&mut self, channel: Channel) -> Result<Outcome> {
        let (status, info) = self.readings()?;
        self.switch_off(channel, &status, &info)
    }

    fn switch_off(
        &mut self,
        channel: Channel,
        status: &StatusReading,
        info: &InfoReading,
    ) -> Result<Outcome> {
        if !channel.is_on(info) {
            info!(port = self.port(), %channel, "already off");
            return Ok(Outcome::AlreadyOff { channel });
        }
        // Re-sending the stored set value toggles the channel off.
        self.send(channel, channel.set_value(status))?;
        info!(port = self.port(), %channel, "switched off");
        Ok(Outcome::SwitchedOff { channel })
    }

    /// Bring `channel` to on at `target` (wire units).
    ///
    /// | set == target | on  | sends |
    /// |---------------|-----|-------|
    /// | yes           | yes | 0     |
    /// | yes           | no  | 1     |
    /// | no            | no  | 1     |
    /// | no            | yes | 2     |
    fn set_toggle_value(&mut self, channel: Channel, target: u16) -> Result<Outcome> {
        let (status, info) = self.readings()?;
        let current = channel.set_value(&status);
        let on = channel.is_on(&info);
        let value = channel.setting(target);

        if current == target {
            if on {
                info!(port = self.port(), %channel, %value, "already at target");
                return Ok(Outcome::AlreadyAtTarget { channel, value });
            }
            self.send(channel, target)?;
            info!(port = self.port(), %channel, %value, "switched on");
            return Ok(Outcome::SwitchedOn { channel, value });
        }

        // Off at another value: this send sets it and switches on.
        // On at another value: this send switches off, the next one back on.
        self.send(channel, target)?;
        if !on {
            info!(port = self.port(), %channel, %value, "set and switched on");
            return Ok(Outcome::SetAndSwitchedOn { channel, value });
        }
        self.send(channel, target)?;
        info!(port = self.port(), %channel, %value, "changed");
        Ok(Outcome::Retoggled { channel, value })
    }

    fn send(&mut self, channel: Channel, value: u16) -> Result<()> {
        self.command(channel.command(), value)
            .map(|_| ())
            .inspect_err(|err| {
                error!(port = self.port(), %channel, value, error = %err, "send failed")
            })
    }

    fn readings(&mut self) -> Result<(StatusReading, InfoReading)> {
        let status = self.read_status()?;
        let info = self.info()?;
        Ok((status, info))
    }

    /// One request/response exchange.
    fn command(&mut self, command: Command, value: u16) -> Result<Response> {
        let request = encode_raw(command, value);
        debug!(port = self.port(), %command, request = %hex(&request), "send");
        let reply = self.conn.transact(&request, command.response_len())?;
        debug!(port = self.port(), %command, response = %hex(&reply), "receive");
        Ok(decode(command, &reply)?)
    }
}

impl<L: Link> fmt::Debug for Hotplate<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hotplate")
            .field("port", &self.port())
            .field("open", &self.is_open())
            .finish()
    }
}

/// Range-check `target` and convert it with the frame codec.
fn channel_wire_value(channel: Channel, target: f64, min: f64, max: f64) -> Result<u16> {
    let out_of_range = || HotplateError::OutOfRange {
        channel,
        value: target,
        min,
        max,
    };
    if !(min..=max).contains(&target) {
        return Err(out_of_range());
    }
    wire_value(channel.command(), target).map_err(|err| match err {
        FrameError::InvalidValue { .. } => out_of_range(),
        other => HotplateError::Frame(other),
    })
}

fn unexpected(command: Command, response: Response) -> HotplateError {
    debug!(%command, ?response, "reply decoded to the wrong reading");
    HotplateError::Frame(FrameError::ParseError {
        command,
        raw: Bytes::new(),
        reason: "reply decoded to the wrong reading",
    })
}
