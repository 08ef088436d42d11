//! Configuration command handler.
//!
//! Displays the resolved configuration with the source of each value
//! (default, file, env).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "players": {
//!     "value": 6,
//!     "source": "default"
//!   },
//!   "seed": {
//!     "value": 42,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use std::io::Write;

use serde_json::{json, Map, Value};

use crate::config::{self, ValueSource};
use crate::error::CliError;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;

    let fields: [(&str, Value, ValueSource); 6] = [
        ("players", json!(config.players), sources.players),
        ("starting_stack", json!(config.starting_stack), sources.starting_stack),
        ("max_rebuys", json!(config.max_rebuys), sources.max_rebuys),
        ("hands", json!(config.hands), sources.hands),
        ("seed", json!(config.seed), sources.seed),
        ("agent", json!(config.agent), sources.agent),
    ];
    let mut display = Map::new();
    for (name, value, source) in fields {
        display.insert(name.to_string(), json!({ "value": value, "source": source }));
    }
    let text = serde_json::to_string_pretty(&Value::Object(display)).map_err(std::io::Error::other)?;
    writeln!(out, "{}", text)?;
    Ok(())
}
