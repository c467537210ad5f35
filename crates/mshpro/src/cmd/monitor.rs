use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::cmd::{parse_duration, Global, MonitorArgs};
use crate::exit::{hotplate_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::print_status;

const TICK: Duration = Duration::from_millis(50);

pub fn run(args: MonitorArgs, global: &Global) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let mut plate = global.hotplate()?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut polls = 0usize;
    let mut failures = 0usize;
    while running.load(Ordering::SeqCst) {
        match plate.status(!args.raw) {
            Ok(status) => {
                failures = 0;
                print_status(plate.port(), &status, global.format);
            }
            // A missed poll is reported and retried; three in a row end the run.
            Err(err) if err.is_timeout() && failures < 2 => {
                failures += 1;
                warn!(port = plate.port(), error = %err, "status poll missed");
            }
            Err(err) => return Err(hotplate_error("status failed", err)),
        }

        polls = polls.saturating_add(1);
        if args.count.is_some_and(|count| polls >= count) {
            break;
        }
        sleep_while(&running, interval);
    }

    Ok(SUCCESS)
}

fn sleep_while(running: &AtomicBool, duration: Duration) {
    let deadline = Instant::now() + duration;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(TICK.min(deadline - now));
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
