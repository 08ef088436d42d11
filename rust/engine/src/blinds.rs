//! Blind level schedule.
//!
//! Ten levels are derived once per run from the total chips in play. Each
//! level divides the chip total by a shrinking denominator, so later levels
//! put more pressure on the stacks. The level advances every tenth of the
//! hand budget and stays at level 10 after that.

use serde::{Deserialize, Serialize};

/// Divisors of the total chip count for levels 1 through 10.
pub const LEVEL_DENOMINATORS: [u64; 10] = [1600, 800, 400, 200, 100, 80, 60, 40, 20, 10];

pub const MAX_LEVEL: u8 = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stakes {
    pub level: u8,
    pub small_blind: u32,
    pub big_blind: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlindSchedule {
    big_blinds: [u32; 10],
    level_step: u64,
}

impl BlindSchedule {
    pub fn from_total_chips(total_chips: u64, hands_budget: u64) -> Self {
        let big_blinds = LEVEL_DENOMINATORS.map(|d| {
            let target = (total_chips / d).max(1);
            round_to_top_digit(target).clamp(1, u32::MAX as u64) as u32
        });
        Self {
            big_blinds,
            level_step: (hands_budget / 10).max(1),
        }
    }

    /// Total chips = starting stack x (rebuys + 1) x players.
    pub fn for_table(starting_stack: u32, max_rebuys: u32, players: usize, hands_budget: u64) -> Self {
        let total = starting_stack as u64 * (max_rebuys as u64 + 1) * players as u64;
        Self::from_total_chips(total, hands_budget)
    }

    pub fn big_blinds(&self) -> &[u32; 10] {
        &self.big_blinds
    }

    pub fn level_step(&self) -> u64 {
        self.level_step
    }

    pub fn level_for(&self, hands_played: u64) -> u8 {
        (1 + hands_played / self.level_step).min(MAX_LEVEL as u64) as u8
    }

    pub fn stakes_for(&self, hands_played: u64) -> Stakes {
        let level = self.level_for(hands_played);
        let big_blind = self.big_blinds[level as usize - 1];
        Stakes {
            level,
            small_blind: (big_blind / 2).max(1),
            big_blind,
        }
    }
}

/// Rounds to the leading decimal digit, half up: 15 -> 20, 540 -> 500, 1250 -> 1000.
/// Values below ten are kept; zero maps to 1.
pub fn round_to_top_digit(x: u64) -> u64 {
    if x == 0 {
        return 1;
    }
    if x < 10 {
        return x;
    }
    let base = 10u64.pow(x.ilog10());
    (x + base / 2) / base * base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_on_leading_digit() {
        assert_eq!(round_to_top_digit(0), 1);
        assert_eq!(round_to_top_digit(7), 7);
        assert_eq!(round_to_top_digit(13), 10);
        assert_eq!(round_to_top_digit(15), 20);
        assert_eq!(round_to_top_digit(85), 90);
        assert_eq!(round_to_top_digit(540), 500);
        assert_eq!(round_to_top_digit(1234), 1000);
        assert_eq!(round_to_top_digit(9_600), 10_000);
    }

    #[test]
    fn small_blind_is_half_the_big_blind_but_at_least_one() {
        let s = BlindSchedule::from_total_chips(100, 10);
        let stakes = s.stakes_for(0);
        assert_eq!(stakes.big_blind, 1);
        assert_eq!(stakes.small_blind, 1);
    }
}
