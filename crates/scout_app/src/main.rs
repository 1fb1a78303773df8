mod platform;

use std::process::ExitCode;

fn main() -> ExitCode {
    match platform::run_app() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("scout: {err:#}");
            ExitCode::from(platform::EXIT_STARTUP_ERROR)
        }
    }
}
