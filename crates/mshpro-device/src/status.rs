use std::fmt;

use mshpro_frame::{Celsius, InfoReading, Mode, StatusReading};
use serde::{Serialize, Serializer};

/// A target value, or `Off` in the normalized view of an inactive channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setpoint<T> {
    Off,
    Value(T),
}

impl<T: Copy> Setpoint<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Setpoint::Off => None,
            Setpoint::Value(v) => Some(*v),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Setpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setpoint::Off => f.write_str("Off"),
            Setpoint::Value(v) => v.fmt(f),
        }
    }
}

impl<T: Serialize> Serialize for Setpoint<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Setpoint::Off => serializer.serialize_str("off"),
            Setpoint::Value(v) => v.serialize(serializer),
        }
    }
}

/// Everything STATUS and INFO report, merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    /// Target stir speed (rpm).
    pub stir_set: Setpoint<u16>,
    /// Measured stir speed (rpm).
    pub stir_actual: u16,
    /// Target temperature.
    pub heat_set: Setpoint<Celsius>,
    /// Measured temperature. From the internal sensor, which need not match
    /// the display, unless a probe is attached.
    pub heat_actual: Celsius,
    pub stir_on: bool,
    pub heat_on: bool,
    /// Maximum settable temperature.
    pub heat_limit: Celsius,
    /// Heating profile (undocumented).
    pub mode: Mode,
    /// Undocumented; reported as-is.
    pub heat_alarm: bool,
}

impl DeviceStatus {
    /// Merge a STATUS and an INFO reading.
    ///
    /// The device keeps reporting the last set value of a channel that is
    /// off. With `normalize`, such targets become [`Setpoint::Off`].
    pub fn from_readings(status: &StatusReading, info: &InfoReading, normalize: bool) -> Self {
        let stir_set = if normalize && !info.stir_on {
            Setpoint::Off
        } else {
            Setpoint::Value(status.stir_set)
        };
        let heat_set = if normalize && !info.heat_on {
            Setpoint::Off
        } else {
            Setpoint::Value(status.heat_set)
        };

        Self {
            stir_set,
            stir_actual: status.stir_actual,
            heat_set,
            heat_actual: status.heat_actual,
            stir_on: info.stir_on,
            heat_on: info.heat_on,
            heat_limit: info.heat_limit,
            mode: info.mode,
            heat_alarm: info.heat_alarm,
        }
    }
}
