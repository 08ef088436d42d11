//! # rentpoker CLI Library
//!
//! Command-line front-end for the rentpoker engine and its self-training
//! agents.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["rentpoker", "sim", "--players", "6", "--hands", "500", "--quiet"];
//! let code = rentpoker_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Play a run of hands between learning or heuristic agents
//! - `blinds`: Show the blind schedule for a table
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod ui;

use cli::{Commands, RentpokerCli};
use commands::{handle_blinds_command, handle_cfg_command, handle_sim_command};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// # Arguments
///
/// * `args` - Iterator over command-line arguments (typically `std::env::args()`)
/// * `out` - Output stream for normal output (typically `stdout`)
/// * `err` - Output stream for error messages (typically `stderr`)
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interrupted runs
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["rentpoker", "blinds", "--players", "4", "--stack", "200"];
/// let code = rentpoker_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["sim", "blinds", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let parsed = RentpokerCli::try_parse_from(&argv);
    let result = match parsed {
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    if writeln!(err, "{}", e).is_err()
                        || writeln!(err).is_err()
                        || writeln!(err, "rentpoker").is_err()
                        || writeln!(err, "Usage: rentpoker <command> [options]\n").is_err()
                        || writeln!(err, "Commands:").is_err()
                    {
                        return exit_code::ERROR;
                    }
                    for c in COMMANDS {
                        if writeln!(err, "  {}", c).is_err() {
                            return exit_code::ERROR;
                        }
                    }
                    if writeln!(err, "\nFor full help, run: rentpoker --help").is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::ERROR
                }
            };
        }
        Ok(cli) => match cli.cmd {
            Commands::Sim(args) => handle_sim_command(args, out, err),
            Commands::Blinds {
                players,
                stack,
                rebuys,
                hands,
            } => handle_blinds_command(players, stack, rebuys, hands, out),
            Commands::Cfg => handle_cfg_command(out),
        },
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            if ui::write_error(err, &e.to_string()).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}
