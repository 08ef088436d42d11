//! Chip commitments, side pots and pot distribution.
//!
//! The ledger is created fresh for every hand. It tracks two amounts per seat:
//! the bet of the current street (reset on every street) and the total put in
//! during the hand. Side pots are layered from the hand totals only when the
//! hand is decided.

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::hand::HandStrength;
use crate::player::Player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u64,
    /// Seats that contributed to this layer and have not folded
    pub eligible: Vec<usize>,
}

/// Result of awarding one pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    /// 0-based index into the pot list
    pub pot_index: usize,
    pub amount: u64,
    /// (seat, chips) for each winner, in seat order
    pub shares: Vec<(usize, u64)>,
}

impl PotAward {
    pub fn winners(&self) -> impl Iterator<Item = usize> + '_ {
        self.shares.iter().map(|(seat, _)| *seat)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotLedger {
    bet_in_round: Vec<u32>,
    committed: Vec<u32>,
}

impl PotLedger {
    pub fn new(seats: usize) -> Self {
        Self {
            bet_in_round: vec![0; seats],
            committed: vec![0; seats],
        }
    }

    /// Ledger with preset hand totals, for settling a known commitment snapshot.
    pub fn from_commitments(committed: Vec<u32>) -> Self {
        Self {
            bet_in_round: vec![0; committed.len()],
            committed,
        }
    }

    /// Posts a blind; identical transfer semantics to [`PotLedger::commit`].
    pub fn post_blind(&mut self, player: &mut Player, amount: u32) -> u32 {
        self.commit(player, amount)
    }

    /// Moves `min(amount, stack)` from the player's stack into the pot and
    /// marks the player all-in when the stack reaches zero. Returns the chips moved.
    pub fn commit(&mut self, player: &mut Player, amount: u32) -> u32 {
        let pay = amount.min(player.stack);
        player.stack -= pay;
        self.bet_in_round[player.seat] += pay;
        self.committed[player.seat] += pay;
        if player.stack == 0 {
            player.all_in = true;
        }
        pay
    }

    pub fn bet_in_round(&self, seat: usize) -> u32 {
        self.bet_in_round[seat]
    }

    pub fn committed(&self, seat: usize) -> u32 {
        self.committed[seat]
    }

    pub fn commitments(&self) -> &[u32] {
        &self.committed
    }

    pub fn max_bet_in_round(&self) -> u32 {
        self.bet_in_round.iter().copied().max().unwrap_or(0)
    }

    pub fn total_committed(&self) -> u64 {
        self.committed.iter().map(|&c| c as u64).sum()
    }

    pub fn reset_street(&mut self) {
        self.bet_in_round.iter_mut().for_each(|b| *b = 0);
    }

    /// Layers the hand totals into side pots.
    ///
    /// Repeatedly takes the smallest positive residual among contributors,
    /// forms a pot of that amount times the contributor count, and subtracts it
    /// from every contributor. Eligibility is "contributed and not folded".
    /// Pure with respect to the ledger, so repeated calls agree.
    pub fn build_pots(&self, folded: &[bool]) -> Vec<Pot> {
        let mut resid: Vec<u32> = self.committed.clone();
        let mut pots = Vec::new();
        loop {
            let contributors: Vec<usize> = (0..resid.len()).filter(|&s| resid[s] > 0).collect();
            let Some(layer) = contributors.iter().map(|&s| resid[s]).min() else {
                break;
            };
            let eligible = contributors
                .iter()
                .copied()
                .filter(|&s| !folded.get(s).copied().unwrap_or(false))
                .collect();
            pots.push(Pot {
                amount: layer as u64 * contributors.len() as u64,
                eligible,
            });
            for s in contributors {
                resid[s] -= layer;
            }
        }
        pots
    }

    /// Awards each pot to its best eligible hand(s).
    ///
    /// `scores[seat]` is `None` for seats not at showdown. Ties split by floor
    /// division; the odd chips go one at a time to the tied winners in
    /// `order` (seats clockwise from the button). The total awarded must equal
    /// the total committed, otherwise the hand is broken and
    /// [`GameError::PotMismatch`] is returned.
    pub fn distribute(
        &self,
        pots: &[Pot],
        scores: &[Option<HandStrength>],
        order: &[usize],
    ) -> Result<Vec<PotAward>, GameError> {
        let mut awards = Vec::with_capacity(pots.len());
        for (pot_index, pot) in pots.iter().enumerate() {
            let contenders: Vec<(usize, HandStrength)> = pot
                .eligible
                .iter()
                .filter_map(|&s| scores.get(s).copied().flatten().map(|sc| (s, sc)))
                .collect();
            let Some(best) = contenders.iter().map(|(_, sc)| *sc).max() else {
                tracing::error!(pot_index, amount = pot.amount, "pot has no eligible hand");
                continue;
            };
            let mut winners: Vec<usize> = contenders
                .iter()
                .filter(|(_, sc)| *sc == best)
                .map(|(s, _)| *s)
                .collect();
            winners.sort_unstable();
            awards.push(split_pot(pot_index, pot.amount, &winners, order));
        }
        let distributed: u64 = awards.iter().map(|a| a.amount).sum();
        self.check_conservation(distributed)?;
        Ok(awards)
    }

    /// The whole hand total goes to the last player standing, no showdown.
    pub fn award_uncontested(&self, winner: usize) -> PotAward {
        PotAward {
            pot_index: 0,
            amount: self.total_committed(),
            shares: vec![(winner, self.total_committed())],
        }
    }

    fn check_conservation(&self, distributed: u64) -> Result<(), GameError> {
        let committed = self.total_committed();
        if distributed != committed {
            tracing::error!(distributed, committed, "chip conservation violated");
            return Err(GameError::PotMismatch {
                distributed,
                committed,
            });
        }
        Ok(())
    }
}

fn split_pot(pot_index: usize, amount: u64, winners: &[usize], order: &[usize]) -> PotAward {
    let n = winners.len() as u64;
    let share = amount / n;
    let odd = amount - share * n;

    let mut odd_order: Vec<usize> = order.iter().copied().filter(|s| winners.contains(s)).collect();
    odd_order.extend(winners.iter().filter(|s| !order.contains(s)));

    let mut shares: Vec<(usize, u64)> = winners.iter().map(|&s| (s, share)).collect();
    for i in 0..odd as usize {
        let seat = odd_order[i % odd_order.len()];
        if let Some(entry) = shares.iter_mut().find(|(s, _)| *s == seat) {
            entry.1 += 1;
        }
    }
    PotAward {
        pot_index,
        amount,
        shares,
    }
}
