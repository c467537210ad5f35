//! Binary frame codec for the MSHPro hotplate serial protocol.
//!
//! Every exchange is one fixed-size request frame and one fixed-size response:
//! - request: `FE op hi lo 00 sum`, where `sum` is the byte sum of `op hi lo 00`
//! - response: `FD op data.. sum`, with 3 data bytes for acknowledgements and
//!   8 for INFO and STATUS
//!
//! Pure functions only. No I/O happens in this crate.

pub mod codec;
pub mod command;
pub mod error;
pub mod reading;

pub use codec::{
    checksum, decode, decode_request, encode, encode_raw, encode_response, hex, wire_value,
    Response, REQUEST_LEN, REQUEST_START, RESPONSE_START,
};
pub use command::Command;
pub use error::{FrameError, Result};
pub use reading::{Celsius, InfoReading, Mode, StatusReading};
