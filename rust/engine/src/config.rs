use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::game::{MAX_SEATS, MIN_SEATS};

pub const DEFAULT_PLAYERS: usize = 6;
pub const DEFAULT_STARTING_STACK: u32 = 300;
pub const DEFAULT_MAX_REBUYS: u32 = 2;
pub const DEFAULT_HANDS: u64 = 2000;
pub const DEFAULT_SEED: u64 = 0xA1A2_A3A4;

/// Fixed blinds that replace the level schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedBlinds {
    pub small_blind: u32,
    pub big_blind: u32,
}

/// Everything one run of the table needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub players: usize,
    pub starting_stack: u32,
    pub max_rebuys: u32,
    /// Hand budget; also sets how fast the blind levels advance
    pub hands: u64,
    pub seed: u64,
    /// Emit hole cards and hand names at showdown
    pub reveal_showdown: bool,
    pub fixed_blinds: Option<FixedBlinds>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            starting_stack: DEFAULT_STARTING_STACK,
            max_rebuys: DEFAULT_MAX_REBUYS,
            hands: DEFAULT_HANDS,
            seed: DEFAULT_SEED,
            reveal_showdown: true,
            fixed_blinds: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.players) {
            return Err(GameError::InvalidSeatCount(self.players));
        }
        if self.starting_stack == 0 {
            return Err(GameError::InvalidConfig(
                "starting_stack must be positive".into(),
            ));
        }
        if self.total_chips() > u32::MAX as u64 {
            return Err(GameError::InvalidConfig(format!(
                "{} chips in play exceed a single stack's capacity",
                self.total_chips()
            )));
        }
        if self.hands == 0 {
            return Err(GameError::InvalidConfig("hands must be positive".into()));
        }
        if let Some(b) = self.fixed_blinds {
            if b.big_blind == 0 || b.small_blind == 0 || b.small_blind > b.big_blind {
                return Err(GameError::InvalidConfig(format!(
                    "blinds {}/{} must be positive with SB <= BB",
                    b.small_blind, b.big_blind
                )));
            }
        }
        Ok(())
    }

    /// Chips that can ever be on the table: stacks plus every allowed rebuy.
    pub fn total_chips(&self) -> u64 {
        self.starting_stack as u64 * (self.max_rebuys as u64 + 1) * self.players as u64
    }
}
