use mshpro_transport::available_ports;

use crate::cmd::{Global, PortsArgs};
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::print_ports;

pub fn run(_args: PortsArgs, global: &Global) -> CliResult<i32> {
    let ports = available_ports().map_err(|err| transport_error("port listing failed", err))?;
    print_ports(&ports, global.format);
    Ok(SUCCESS)
}
