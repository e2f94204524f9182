//! CLI module for dochistory
//!
//! Every command loads the document from its state file, applies one
//! operation, writes the state back (for mutating commands) and prints a
//! single JSON response.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Switch};
pub use commands::{run, run_command, CommandContext};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
