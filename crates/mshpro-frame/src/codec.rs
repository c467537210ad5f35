use bytes::{BufMut, Bytes, BytesMut};

use crate::command::Command;
use crate::error::{FrameError, Result};
use crate::reading::{Celsius, InfoReading, Mode, StatusReading};

/// Request frames are always 6 bytes.
pub const REQUEST_LEN: usize = 6;

/// First byte of every request frame.
pub const REQUEST_START: u8 = 0xFE;

/// First byte of every response frame.
pub const RESPONSE_START: u8 = 0xFD;

const ACK_OK: [u8; 3] = [0x00, 0x00, 0x00];
const ACK_FAILED: [u8; 3] = [0x01, 0x00, 0x00];

/// A decoded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// PING, STIR, HEAT or MODE succeeded.
    Ack,
    Info(InfoReading),
    Status(StatusReading),
}

/// Sum of all bytes, discarding overflow.
///
/// Shared by both directions: requests sum `op hi lo 00`, responses sum
/// everything between the start marker and the checksum.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Encode a request frame.
///
/// Value-less commands ignore `value`. STIR truncates the value to whole rpm;
/// HEAT truncates to tenths of a degree, so callers must round beforehand.
///
/// Wire format:
/// ```text
/// ┌──────┬────────┬──────────┬──────────┬──────┬──────────┐
/// │ 0xFE │ opcode │ value_hi │ value_lo │ 0x00 │ checksum │
/// └──────┴────────┴──────────┴──────────┴──────┴──────────┘
/// ```
pub fn encode(command: Command, value: Option<f64>) -> Result<Bytes> {
    if !command.carries_value() {
        return Ok(encode_raw(command, 0));
    }
    let value = value.ok_or_else(|| FrameError::InvalidValue {
        command,
        reason: "a value is required".to_string(),
    })?;
    Ok(encode_raw(command, wire_value(command, value)?))
}

/// Encode a request frame from a value already in wire units.
///
/// Value-less commands always carry zero.
pub fn encode_raw(command: Command, value: u16) -> Bytes {
    let value = if command.carries_value() { value } else { 0 };
    let [hi, lo] = value.to_be_bytes();
    let body = [command.opcode(), hi, lo, 0x00];

    let mut dst = BytesMut::with_capacity(REQUEST_LEN);
    dst.put_u8(REQUEST_START);
    dst.put_slice(&body);
    dst.put_u8(checksum(&body));
    dst.freeze()
}

/// Convert a STIR (rpm) or HEAT (°C) value to its 16-bit wire value.
pub fn wire_value(command: Command, value: f64) -> Result<u16> {
    let scaled = match command {
        Command::Stir => value.trunc(),
        Command::Heat => (value * 10.0).trunc(),
        other => {
            return Err(FrameError::InvalidValue {
                command: other,
                reason: "command does not carry a value".to_string(),
            })
        }
    };
    if !scaled.is_finite() || !(0.0..=f64::from(u16::MAX)).contains(&scaled) {
        return Err(FrameError::InvalidValue {
            command,
            reason: format!("{value} is outside the encodable range"),
        });
    }
    Ok(scaled as u16)
}

/// Decode a request frame into its command and wire value.
///
/// This is the device side of the protocol, used by simulators and sniffers.
pub fn decode_request(frame: &[u8]) -> Option<(Command, u16)> {
    if frame.len() != REQUEST_LEN || frame[0] != REQUEST_START {
        return None;
    }
    if frame[5] != checksum(&frame[1..5]) {
        return None;
    }
    let command = Command::from_opcode(frame[1])?;
    Some((command, u16::from_be_bytes([frame[2], frame[3]])))
}

/// Build a response frame around a data payload.
pub fn encode_response(command: Command, data: &[u8]) -> Bytes {
    let mut dst = BytesMut::with_capacity(data.len() + 3);
    dst.put_u8(RESPONSE_START);
    dst.put_u8(command.opcode());
    dst.put_slice(data);
    let sum = checksum(&dst[1..]);
    dst.put_u8(sum);
    dst.freeze()
}

/// Decode the response to `command`.
///
/// Short input is [`FrameError::IncompleteResponse`] and is never parsed.
pub fn decode(command: Command, bytes: &[u8]) -> Result<Response> {
    let expected = command.response_len();
    if bytes.len() < expected {
        return Err(FrameError::IncompleteResponse {
            command,
            expected,
            actual: bytes.len(),
        });
    }

    let last = bytes.len() - 1;
    if bytes[0] != RESPONSE_START
        || bytes[1] != command.opcode()
        || bytes[last] != checksum(&bytes[1..last])
    {
        return Err(FrameError::ResponseFormat {
            command,
            raw: Bytes::copy_from_slice(bytes),
        });
    }

    let data = &bytes[2..last];
    let parse_error = |reason| FrameError::ParseError {
        command,
        raw: Bytes::copy_from_slice(bytes),
        reason,
    };

    match command {
        Command::Ping | Command::Stir | Command::Heat | Command::Mode => {
            if data == ACK_OK {
                Ok(Response::Ack)
            // PING has no failure payload; anything but success is garbage.
            } else if data == ACK_FAILED && command != Command::Ping {
                Err(FrameError::DeviceError { command })
            } else {
                Err(parse_error("unexpected acknowledgement payload"))
            }
        }
        Command::Info => parse_info(data)
            .map(Response::Info)
            .ok_or_else(|| parse_error("bad info payload")),
        Command::Status => parse_status(data)
            .map(Response::Status)
            .ok_or_else(|| parse_error("bad status payload")),
    }
}

fn parse_info(data: &[u8]) -> Option<InfoReading> {
    let mode = Mode::from_code(*data.first()?)?;
    // The device reports "on" as a zero flag.
    Some(InfoReading {
        mode,
        stir_on: *data.get(1)? == 0,
        heat_on: *data.get(2)? == 0,
        heat_limit: Celsius::from_tenths(be_u16(data, 3)?),
        heat_alarm: *data.get(5)? == 0,
    })
}

fn parse_status(data: &[u8]) -> Option<StatusReading> {
    Some(StatusReading {
        stir_set: be_u16(data, 0)?,
        stir_actual: be_u16(data, 2)?,
        heat_set: Celsius::from_tenths(be_u16(data, 4)?),
        heat_actual: Celsius::from_tenths(be_u16(data, 6)?),
    })
}

fn be_u16(data: &[u8], at: usize) -> Option<u16> {
    let pair = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([pair[0], pair[1]]))
}

/// Lower-case hex rendering of raw bytes, space separated.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    fn status_payload(stir_set: u16, stir_actual: u16, heat_set: u16, heat_actual: u16) -> Vec<u8> {
        [stir_set, stir_actual, heat_set, heat_actual]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect()
    }

    /// A device that answers STIR by reporting the received speed in STATUS.
    fn echo_device(request: &[u8]) -> Bytes {
        let (command, value) = decode_request(request).expect("request frame should decode");
        assert_eq!(command, Command::Stir);
        encode_response(Command::Status, &status_payload(value, 0, 0, 0))
    }

    #[test]
    fn value_less_commands_have_fixed_frames() {
        assert_eq!(
            encode(Command::Ping, None).unwrap().as_ref(),
            &[0xFE, 0xA0, 0x00, 0x00, 0x00, 0xA0]
        );
        assert_eq!(
            encode(Command::Info, None).unwrap().as_ref(),
            &[0xFE, 0xA1, 0x00, 0x00, 0x00, 0xA1]
        );
        assert_eq!(
            encode(Command::Status, None).unwrap().as_ref(),
            &[0xFE, 0xA2, 0x00, 0x00, 0x00, 0xA2]
        );
        assert_eq!(
            encode(Command::Mode, Some(12.0)).unwrap().as_ref(),
            &[0xFE, 0xB3, 0x00, 0x00, 0x00, 0xB3]
        );
    }

    #[test]
    fn heat_is_encoded_in_tenths() {
        let frame = encode(Command::Heat, Some(200.0)).unwrap();
        assert_eq!(frame.as_ref(), &[0xFE, 0xB2, 0x07, 0xD0, 0x00, 0x89]);
    }

    #[test]
    fn heat_truncates_extra_decimals() {
        let frame = encode(Command::Heat, Some(25.19)).unwrap();
        assert_eq!(u16::from_be_bytes([frame[2], frame[3]]), 251);
    }

    #[test]
    fn stir_is_encoded_as_whole_rpm() {
        let frame = encode(Command::Stir, Some(1500.7)).unwrap();
        assert_eq!(frame.as_ref(), &[0xFE, 0xB1, 0x05, 0xDC, 0x00, 0x92]);
    }

    #[test]
    fn value_is_required_for_stir_and_heat() {
        assert!(matches!(
            encode(Command::Stir, None),
            Err(FrameError::InvalidValue {
                command: Command::Stir,
                ..
            })
        ));
        assert!(matches!(
            encode(Command::Heat, None),
            Err(FrameError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unencodable_values_are_rejected() {
        assert!(encode(Command::Stir, Some(65535.0)).is_ok());
        assert!(matches!(
            encode(Command::Stir, Some(65536.0)),
            Err(FrameError::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(Command::Stir, Some(-1.0)),
            Err(FrameError::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(Command::Heat, Some(6554.0)),
            Err(FrameError::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(Command::Heat, Some(f64::NAN)),
            Err(FrameError::InvalidValue { .. })
        ));
    }

    #[test]
    fn decode_request_inverts_encode() {
        let frame = encode_raw(Command::Heat, 2534);
        assert_eq!(decode_request(&frame), Some((Command::Heat, 2534)));

        let mut corrupted = frame.to_vec();
        corrupted[5] = corrupted[5].wrapping_add(1);
        assert_eq!(decode_request(&corrupted), None);
    }

    #[test]
    fn decode_ack() {
        for command in [Command::Ping, Command::Stir, Command::Heat, Command::Mode] {
            let frame = encode_response(command, &ACK_OK);
            assert_eq!(decode(command, &frame).unwrap(), Response::Ack);
        }
    }

    #[test]
    fn ping_response_bytes() {
        assert_eq!(
            encode_response(Command::Ping, &ACK_OK).as_ref(),
            &[0xFD, 0xA0, 0x00, 0x00, 0x00, 0xA0]
        );
    }

    #[test]
    fn device_error_payload() {
        let frame = encode_response(Command::Heat, &ACK_FAILED);
        assert!(matches!(
            decode(Command::Heat, &frame),
            Err(FrameError::DeviceError {
                command: Command::Heat
            })
        ));
    }

    #[test]
    fn ping_failure_payload_is_a_parse_error() {
        let frame = encode_response(Command::Ping, &ACK_FAILED);
        let err = decode(Command::Ping, &frame).unwrap_err();
        assert!(matches!(err, FrameError::ParseError { .. }));
        assert_eq!(err.raw(), Some(frame.as_ref()));
    }

    #[test]
    fn unknown_ack_payload_is_a_parse_error() {
        let frame = encode_response(Command::Stir, &[0x02, 0x00, 0x00]);
        assert!(matches!(
            decode(Command::Stir, &frame),
            Err(FrameError::ParseError { .. })
        ));
    }

    #[test]
    fn short_responses_are_incomplete() {
        let frame = encode_response(Command::Status, &status_payload(1, 2, 3, 4));
        for len in 0..frame.len() {
            match decode(Command::Status, &frame[..len]) {
                Err(FrameError::IncompleteResponse {
                    expected, actual, ..
                }) => {
                    assert_eq!(expected, 11);
                    assert_eq!(actual, len);
                }
                other => panic!("length {len}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn bad_marker_echo_or_checksum_is_a_format_error() {
        let good = encode_response(Command::Ping, &ACK_OK).to_vec();

        let mut bad_marker = good.clone();
        bad_marker[0] = 0xFE;
        let mut bad_echo = good.clone();
        bad_echo[1] = 0xA1;
        let mut bad_sum = good.clone();
        bad_sum[5] = 0x00;

        for raw in [bad_marker, bad_echo, bad_sum] {
            let err = decode(Command::Ping, &raw).unwrap_err();
            assert!(matches!(err, FrameError::ResponseFormat { .. }));
            assert_eq!(err.raw(), Some(raw.as_slice()));
            assert_eq!(err.command(), Command::Ping);
        }
    }

    #[test]
    fn decode_info() {
        let frame = encode_response(Command::Info, &[0x02, 0x00, 0x01, 0x0D, 0x48, 0x01, 0, 0]);
        let Response::Info(info) = decode(Command::Info, &frame).unwrap() else {
            panic!("expected info");
        };
        assert_eq!(info.mode, Mode::B);
        assert!(info.stir_on);
        assert!(!info.heat_on);
        assert_eq!(info.heat_limit.tenths(), 3400);
        assert!(!info.heat_alarm);
    }

    #[test]
    fn info_with_unmapped_mode_is_a_parse_error() {
        for code in [0x00, 0x04, 0xFF] {
            let frame = encode_response(Command::Info, &[code, 0, 0, 0, 0, 0, 0, 0]);
            assert!(matches!(
                decode(Command::Info, &frame),
                Err(FrameError::ParseError { .. })
            ));
        }
    }

    #[test]
    fn decode_status() {
        let frame = encode_response(Command::Status, &status_payload(500, 498, 2000, 1874));
        assert_eq!(
            decode(Command::Status, &frame).unwrap(),
            Response::Status(StatusReading {
                stir_set: 500,
                stir_actual: 498,
                heat_set: Celsius::from_tenths(2000),
                heat_actual: Celsius::from_tenths(1874),
            })
        );
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(hex(&[0xFD, 0x00, 0x0A]), "fd 00 0a");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[0xB2, 0x07, 0xD0, 0x00]), 0x89);
        assert_eq!(checksum(&[0xFF, 0x01]), 0x00);
        assert_eq!(checksum(&[]), 0x00);
    }

    #[quickcheck]
    fn stir_round_trips_through_echo_device(rpm: u16) -> bool {
        let request = encode(Command::Stir, Some(f64::from(rpm))).expect("u16 always encodes");
        let reply = echo_device(&request);
        match decode(Command::Status, &reply) {
            Ok(Response::Status(status)) => status.stir_set == rpm,
            _ => false,
        }
    }

    // A single byte change shifts the sum by a non-zero amount mod 256, so it
    // always changes the checksum. Multi-byte changes can collide.
    #[quickcheck]
    fn single_byte_change_changes_checksum(value: u16, index: usize, delta: u8) -> TestResult {
        if delta == 0 {
            return TestResult::discard();
        }
        let frame = encode_raw(Command::Heat, value);
        let mut body = frame[1..5].to_vec();
        let index = index % body.len();
        body[index] = body[index].wrapping_add(delta);
        TestResult::from_bool(checksum(&body) != frame[5])
    }
}
