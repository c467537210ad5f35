use crate::cmd::{Global, ModeArgs};
use crate::exit::{hotplate_error, CliResult, SUCCESS};
use crate::output::print_outcomes;

pub fn run(args: ModeArgs, global: &Global) -> CliResult<i32> {
    let mut plate = global.hotplate()?;
    let outcome = plate
        .set_mode(args.mode.into())
        .map_err(|err| hotplate_error("mode failed", err))?;

    print_outcomes(&[outcome], global.format);
    Ok(SUCCESS)
}
