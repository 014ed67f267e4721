use clap::Parser;
use tracing::debug;

/// One-line usage printed for `-h` / `--help`.
pub const USAGE: &str = "Usage: arch-maintenance [--all] [-h|--help]  (no arguments opens the interactive menu)";

/// Interactive maintenance menu for Arch Linux
///
/// Only `--all` and `-h`/`--help` are recognised; anything else opens the menu.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(
    name = "arch-maintenance",
    about,
    args_override_self = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Run every maintenance action once, in the curated order, without prompts
    #[arg(long)]
    pub all: bool,

    /// Print usage and exit
    #[arg(short, long)]
    pub help: bool,

    /// Unrecognised arguments, ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

/// What the process was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Help,
    All,
    Interactive,
}

impl Cli {
    /// Parse `args` (including the program name). Parse failures fall back to the menu.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Self::try_parse_from(args).unwrap_or_else(|e| {
            debug!("Ignoring unrecognised arguments: {}", e);
            Self::default()
        });
        if !cli.ignored.is_empty() {
            debug!("Ignoring arguments: {:?}", cli.ignored);
        }
        cli
    }

    pub fn mode(&self) -> RunMode {
        if self.help {
            RunMode::Help
        } else if self.all {
            RunMode::All
        } else {
            RunMode::Interactive
        }
    }
}
