//! High-level control of an MSHPro hotplate/stirrer.
//!
//! This is the "just works" layer. The device toggles a channel on or off
//! every time it receives a value for it; [`Hotplate`] hides that behind
//! idempotent operations such as "heat to 200 °C" or "stirring off".

pub mod channel;
pub mod config;
pub mod connector;
pub mod error;
pub mod hotplate;
pub mod status;
pub mod text;

pub use channel::{Channel, Setting};
pub use config::HotplateConfig;
pub use connector::{connect, connect_with_config};
pub use error::{HotplateError, Result};
pub use hotplate::{Hotplate, Outcome};
pub use status::{DeviceStatus, Setpoint};
pub use text::{TextCommand, TextReply};

pub use mshpro_frame::{Celsius, Mode};
