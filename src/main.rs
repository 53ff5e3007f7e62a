use std::path::PathBuf;
use std::process::ExitCode;

use log::error;

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match tinytracer::run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            error!("{}", why);
            ExitCode::FAILURE
        }
    }
}
