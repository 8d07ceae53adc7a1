// Command handlers module
pub mod status;
pub mod version;

use clap::{Arg, ArgAction, Command};

// Re-exports for cleaner imports
pub use status::execute as status;
pub use version::execute as version;

/// Command-line definition
pub fn build_cli() -> Command {
    Command::new("statline")
        .about("Status line generator for i3bar and swaybar")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-wifi")
                .long("no-wifi")
                .help("Do not show the Wi-Fi link quality block")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-notifications")
                .long("no-notifications")
                .help("Do not act as the desktop notification server")
                .action(ArgAction::SetTrue),
        )
}
