use mshpro_transport::{resolve_port, SerialLink};

use crate::config::HotplateConfig;
use crate::error::Result;
use crate::hotplate::Hotplate;

/// Attach to a hotplate on `port` (a path, a name, or a plain index).
///
/// The port is opened lazily, before the first command.
pub fn connect(port: &str) -> Result<Hotplate<SerialLink>> {
    connect_with_config(port, &HotplateConfig::default())
}

/// Attach with explicit configuration.
pub fn connect_with_config(port: &str, config: &HotplateConfig) -> Result<Hotplate<SerialLink>> {
    let port = resolve_port(port, config.check_port_exists)?;
    Ok(Hotplate::new(SerialLink::new(port, config.serial)))
}
