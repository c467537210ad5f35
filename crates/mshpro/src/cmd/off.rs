use crate::cmd::{Global, OffArgs};
use crate::exit::{hotplate_error, CliResult, SUCCESS};
use crate::output::print_outcomes;

pub fn run(_args: OffArgs, global: &Global) -> CliResult<i32> {
    let mut plate = global.hotplate()?;
    let outcomes = plate
        .off()
        .map_err(|err| hotplate_error("off failed", err))?;

    print_outcomes(&outcomes, global.format);
    Ok(SUCCESS)
}
