use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};

/// Resolve a user-supplied port into a platform port name.
///
/// A purely numeric spec is an index: `COM{n}` on Windows, `/dev/ttyUSB{n}`
/// elsewhere. Anything else is used verbatim. With `check_exists`, a path
/// that does not exist yields [`TransportError::PortNotFound`]. Windows COM
/// names are not filesystem paths and are never checked.
pub fn resolve_port(spec: &str, check_exists: bool) -> Result<String> {
    let spec = spec.trim();
    let port = match spec.parse::<u32>() {
        Ok(index) => indexed_port_name(index),
        Err(_) => spec.to_string(),
    };

    if check_exists && !is_com_name(&port) && !Path::new(&port).exists() {
        return Err(TransportError::PortNotFound(port));
    }

    debug!(spec, %port, "resolved serial port");
    Ok(port)
}

#[cfg(windows)]
fn indexed_port_name(index: u32) -> String {
    format!("COM{index}")
}

#[cfg(not(windows))]
fn indexed_port_name(index: u32) -> String {
    format!("/dev/ttyUSB{index}")
}

fn is_com_name(port: &str) -> bool {
    cfg!(windows)
        && port.len() > 3
        && port
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("COM"))
        && port.as_bytes()[3..].iter().all(u8::is_ascii_digit)
}

/// List serial ports known to the OS.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(|err| TransportError::Io(err.into()))?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
