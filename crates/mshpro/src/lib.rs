//! Control MSHPro hotplate/stirrers over their serial protocol.
//!
//! The device toggles heating or stirring on every value it is sent, and
//! answers each 6-byte request with one fixed-size frame. This crate hides
//! both behind idempotent operations.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial byte streams, port resolution, duplex transactions
//! - [`frame`]: request encoding and response decoding
//! - [`device`]: the [`Hotplate`](device::Hotplate) sequencer (behind the `device` feature)
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut plate = mshpro::device::connect("/dev/ttyUSB0")?;
//! plate.set_heat(Some(120.0))?;
//! plate.set_stir(Some(500))?;
//! println!("{:?}", plate.status(true)?);
//! plate.off()?;
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use mshpro_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use mshpro_frame::*;
}

/// Re-export device types (requires `device` feature).
#[cfg(feature = "device")]
pub mod device {
    pub use mshpro_device::*;
}
