//! UI helper functions for terminal output formatting.

use std::io::Write;

use rentpoker_engine::logger::StackLine;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// One aligned line per player: name, stack, rebuys, and `OUT` once eliminated.
pub fn write_stacks(out: &mut dyn Write, stacks: &[StackLine]) -> std::io::Result<()> {
    let width = stacks.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for s in stacks {
        write!(
            out,
            "  {:<width$}  {:>7}  rebuys {}",
            s.name,
            s.stack,
            s.rebuys_used,
            width = width
        )?;
        if s.eliminated {
            write!(out, "  OUT")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
