use mshpro_device::{TextCommand, TextReply};

use crate::cmd::{ExecArgs, Global};
use crate::exit::{hotplate_error, CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_outcomes, print_ping, print_status};

pub fn run(args: ExecArgs, global: &Global) -> CliResult<i32> {
    let line = args.text.join(" ");
    // Parse first so a typo never opens the port.
    let command: TextCommand = line
        .parse()
        .map_err(|err| hotplate_error("exec", err))?;

    let mut plate = global.hotplate()?;
    let reply = plate
        .execute(&command)
        .map_err(|err| hotplate_error("exec failed", err))?;

    match reply {
        TextReply::Ping(alive) => {
            print_ping(plate.port(), alive, global.format);
            if !alive {
                return Ok(HEALTH_CHECK_FAILED);
            }
        }
        TextReply::Status(status) => print_status(plate.port(), &status, global.format),
        TextReply::Outcome(outcome) => print_outcomes(&[outcome], global.format),
        TextReply::Outcomes(outcomes) => print_outcomes(&outcomes, global.format),
    }
    Ok(SUCCESS)
}
