use crate::cmd::{parse_target, Global, StirArgs};
use crate::exit::{hotplate_error, CliResult, SUCCESS};
use crate::output::print_outcomes;

pub fn run(args: StirArgs, global: &Global) -> CliResult<i32> {
    let target: Option<u32> = parse_target(&args.target, "speed")?;
    let mut plate = global.hotplate()?;
    let outcome = plate
        .set_stir(target)
        .map_err(|err| hotplate_error("stir failed", err))?;

    print_outcomes(&[outcome], global.format);
    Ok(SUCCESS)
}
