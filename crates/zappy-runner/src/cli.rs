//! Command line parsing.
//!
//! `-h` selects the machine to connect to, so clap's automatic help flag is
//! turned off and `--help` is handled by hand. Any parse failure prints the
//! one-line usage and exits successfully.

use std::ffi::OsString;

use clap::Parser;

/// One-line usage shown for `--help` and for any invalid invocation.
pub const USAGE: &str = "usage: zappy_ai -p PORT -n NAME [-h MACHINE] [--help]";

/// Command line arguments.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "zappy_ai", disable_help_flag = true)]
pub struct Cli {
    /// Server port.
    #[arg(short = 'p', long)]
    pub port: u16,

    /// Team name to join.
    #[arg(short = 'n', long)]
    pub name: String,

    /// Server host name or address.
    #[arg(short = 'h', long, default_value = "localhost")]
    pub machine: String,

    /// Print usage and exit.
    #[arg(long)]
    pub help: bool,
}

/// What the process should do given its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Connect and play.
    Run(Cli),
    /// Print [`USAGE`] and exit 0.
    Usage,
}

/// Parse `args` (program name first).
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.iter().any(|arg| arg == "--help") {
        return Invocation::Usage;
    }
    match Cli::try_parse_from(args) {
        Ok(cli) if !cli.help => Invocation::Run(cli),
        Ok(_) | Err(_) => Invocation::Usage,
    }
}
