//! Decoded INFO and STATUS payloads.

use std::fmt;

use serde::{Serialize, Serializer};

/// Temperature in tenths of a degree Celsius, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Celsius(u16);

impl Celsius {
    pub const fn from_tenths(tenths: u16) -> Self {
        Self(tenths)
    }

    /// Convert degrees, truncating toward zero to one decimal place.
    ///
    /// Returns `None` for values that do not fit the wire range
    /// (0.0 to 6553.5) or are not finite.
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        let tenths = (degrees * 10.0).trunc();
        if tenths.is_finite() && (0.0..=u16::MAX as f64).contains(&tenths) {
            Some(Self(tenths as u16))
        } else {
            None
        }
    }

    pub const fn tenths(self) -> u16 {
        self.0
    }

    pub fn degrees(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Celsius {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.degrees())
    }
}

/// Heating profile. Undocumented; A is the factory default.
///
/// Believed to trade speed for overshoot: A reaches the target fastest, C
/// avoids overshooting, B sits between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    A,
    B,
    C,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::A, Mode::B, Mode::C];

    /// Decode the INFO mode byte (1 = A, 2 = B, 3 = C).
    pub fn from_code(code: u8) -> Option<Mode> {
        match code {
            1 => Some(Mode::A),
            2 => Some(Mode::B),
            3 => Some(Mode::C),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Position in the A -> B -> C cycle.
    pub fn index(self) -> usize {
        match self {
            Mode::A => 0,
            Mode::B => 1,
            Mode::C => 2,
        }
    }

    /// Parse `A`, `B` or `C`, ignoring case.
    pub fn from_letter(letter: &str) -> Option<Mode> {
        match letter.trim() {
            "A" | "a" => Some(Mode::A),
            "B" | "b" => Some(Mode::B),
            "C" | "c" => Some(Mode::C),
            _ => None,
        }
    }

    /// Number of MODE cycles needed to get from `self` to `target`.
    pub fn steps_to(self, target: Mode) -> usize {
        (3 + target.index() - self.index()) % 3
    }

    /// The mode one MODE cycle after this one.
    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % 3]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Mode::A => "A",
            Mode::B => "B",
            Mode::C => "C",
        };
        f.write_str(letter)
    }
}

/// INFO payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InfoReading {
    pub mode: Mode,
    pub stir_on: bool,
    pub heat_on: bool,
    /// Maximum settable temperature.
    pub heat_limit: Celsius,
    /// Undocumented flag, passed through as reported.
    pub heat_alarm: bool,
}

/// STATUS payload.
///
/// Set values are the last values sent to the device, whether or not the
/// channel is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReading {
    pub stir_set: u16,
    pub stir_actual: u16,
    pub heat_set: Celsius,
    /// Internal sensor, or the probe when one is attached.
    pub heat_actual: Celsius,
}
