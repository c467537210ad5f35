use std::fmt;

use mshpro_frame::{Celsius, Command, InfoReading, StatusReading};
use serde::{Serialize, Serializer};

/// A toggle-controlled output of the hotplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Heat,
    Stir,
}

impl Channel {
    /// The command that sets (and toggles) this channel.
    pub fn command(self) -> Command {
        match self {
            Channel::Heat => Command::Heat,
            Channel::Stir => Command::Stir,
        }
    }

    /// Stored set value in wire units, reported even while the channel is off.
    pub fn set_value(self, status: &StatusReading) -> u16 {
        match self {
            Channel::Heat => status.heat_set.tenths(),
            Channel::Stir => status.stir_set,
        }
    }

    pub fn is_on(self, info: &InfoReading) -> bool {
        match self {
            Channel::Heat => info.heat_on,
            Channel::Stir => info.stir_on,
        }
    }

    /// Interpret a wire value for this channel.
    pub fn setting(self, wire: u16) -> Setting {
        match self {
            Channel::Heat => Setting::Temperature(Celsius::from_tenths(wire)),
            Channel::Stir => Setting::Speed(wire),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command().name())
    }
}

/// A channel value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Stir speed in rpm.
    Speed(u16),
    Temperature(Celsius),
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Speed(rpm) => write!(f, "{rpm} rpm"),
            Setting::Temperature(celsius) => write!(f, "{celsius} °C"),
        }
    }
}

impl Serialize for Setting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Setting::Speed(rpm) => serializer.serialize_u16(*rpm),
            Setting::Temperature(celsius) => celsius.serialize(serializer),
        }
    }
}
