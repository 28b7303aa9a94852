// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::{CliArgs, LoaderType};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Missing or malformed arguments (and `--help`) make clap print a message
/// and exit the process. File names and dates are checked separately by
/// `CliArgs::validate`.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
