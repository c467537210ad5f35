use crate::cmd::{parse_target, Global, HeatArgs};
use crate::exit::{hotplate_error, CliResult, SUCCESS};
use crate::output::print_outcomes;

pub fn run(args: HeatArgs, global: &Global) -> CliResult<i32> {
    let target: Option<f64> = parse_target(&args.target, "temperature")?;
    let mut plate = global.hotplate()?;
    let outcome = plate
        .set_heat(target)
        .map_err(|err| hotplate_error("heat failed", err))?;

    print_outcomes(&[outcome], global.format);
    Ok(SUCCESS)
}
