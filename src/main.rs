use std::process::ExitCode;

use anyhow::Result;

use statline::commands;

fn main() -> Result<ExitCode> {
    statline::init_logging();

    let matches = commands::build_cli().get_matches();

    if matches.get_flag("version") {
        commands::version()?;
        return Ok(ExitCode::SUCCESS);
    }

    commands::status(&matches)
}
