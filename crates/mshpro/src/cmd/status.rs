use crate::cmd::{Global, StatusArgs};
use crate::exit::{hotplate_error, CliResult, SUCCESS};
use crate::output::print_status;

pub fn run(args: StatusArgs, global: &Global) -> CliResult<i32> {
    let mut plate = global.hotplate()?;
    let status = plate
        .status(!args.raw)
        .map_err(|err| hotplate_error("status failed", err))?;

    print_status(plate.port(), &status, global.format);
    Ok(SUCCESS)
}
