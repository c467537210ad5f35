use crate::cmd::{Global, PingArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::print_ping;

pub fn run(_args: PingArgs, global: &Global) -> CliResult<i32> {
    let mut plate = global.hotplate()?;
    let alive = plate.ping();
    print_ping(plate.port(), alive, global.format);

    Ok(if alive { SUCCESS } else { HEALTH_CHECK_FAILED })
}
