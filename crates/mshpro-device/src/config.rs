use mshpro_transport::SerialConfig;

/// How to reach a hotplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotplateConfig {
    /// Serial line settings. The default matches the device.
    pub serial: SerialConfig,
    /// Fail with `PortNotFound` up front when the port path does not exist.
    pub check_port_exists: bool,
}

impl Default for HotplateConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            check_port_exists: true,
        }
    }
}
