//! Blind schedule command handler.
//!
//! Prints the ten blind levels a table would play, derived from the chips in
//! play and the hand budget.

use std::io::Write;

use rentpoker_engine::blinds::{BlindSchedule, MAX_LEVEL};

use crate::config::{self, Overrides};
use crate::error::CliError;

pub fn handle_blinds_command(
    players: Option<usize>,
    stack: Option<u32>,
    rebuys: Option<u32>,
    hands: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let overrides = Overrides {
        players,
        starting_stack: stack,
        max_rebuys: rebuys,
        hands,
        ..Overrides::default()
    };
    let cfg = config::resolve(&overrides)?.config;
    let table = cfg.table_config();
    let schedule = BlindSchedule::for_table(
        table.starting_stack,
        table.max_rebuys,
        table.players,
        table.hands,
    );

    writeln!(
        out,
        "Total chips: {} ({} players x {} x {} buy-ins)",
        table.total_chips(),
        table.players,
        table.starting_stack,
        table.max_rebuys + 1
    )?;
    writeln!(out, "Hands per level: {}", schedule.level_step())?;
    for level in 1..=MAX_LEVEL as u64 {
        let stakes = schedule.stakes_for((level - 1) * schedule.level_step());
        writeln!(
            out,
            "Level {:>2}  from hand {:>5}  SB {:>5}  BB {:>5}",
            stakes.level,
            (level - 1) * schedule.level_step() + 1,
            stakes.small_blind,
            stakes.big_blind
        )?;
    }
    Ok(())
}
