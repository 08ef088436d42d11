//! Command handler modules for the rentpoker CLI.
//!
//! Each command lives in its own module with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed in as parameters
//! - Errors propagated via the `CliError` enum

pub mod blinds;
pub mod cfg;
pub mod sim;

pub use blinds::handle_blinds_command;
pub use cfg::handle_cfg_command;
pub use sim::handle_sim_command;
