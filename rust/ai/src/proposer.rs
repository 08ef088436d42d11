//! Turns a table state into a learner query: a situation key, the legal
//! options with their resolved sizes, and a heuristic seed option.

use rand::Rng;
use rentpoker_engine::game::GameState;
use rentpoker_engine::hand::best_hand;
use rentpoker_engine::logger::Street;
use rentpoker_engine::player::{ActionKind, PlayerAction, SizePref, Style};
use rentpoker_engine::rules::LegalActions;

use crate::features::{Draws, MadeClass};
use crate::ranges::{
    hand_category, hole_to_combo, Range, FOURBET_BB, OPEN_SIZE_BB, THREEBET_IP_BB,
    THREEBET_OOP_BB,
};

/// Postflop bet sizes, in percent of the pot.
pub const BET_SIZES_PCT: [u32; 6] = [33, 50, 66, 80, 100, 150];
pub const RAISE_TAGS: [&str; 4] = ["min", "2.5x", "3x", "allin"];

/// Added to the current max bet for a `raise@allin` target; the ledger caps
/// the payment at the stack.
const ALLIN_RAISE: u32 = 1_000_000_000;

/// Unopened seats outside the blinds that open from the early range. The
/// button is one of them; only the cutoff opens the late range.
const EARLY_OPENERS: [&str; 8] = ["UTG", "UTG+1", "UTG+2", "UTG+3", "LJ", "HJ", "BTN(UTG)", "BTN"];

/// Chance of betting air with no bet to face, per unit of persona bluff.
/// A bluff of 0.5 bets a quarter of the time.
const AIR_BET_PER_BLUFF: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Heuristic default; always one of the option keys when present.
    pub seed: Option<String>,
    pub situation: String,
    /// Option keys in proposal order, each with its resolved action.
    pub options: Vec<(String, PlayerAction)>,
}

impl Proposal {
    pub fn keys(&self) -> Vec<String> {
        self.options.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn action_for(&self, key: &str) -> Option<PlayerAction> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, a)| *a)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.iter().any(|(k, _)| k == key)
    }

    fn push(&mut self, key: String, action: PlayerAction) {
        if !self.contains(&key) {
            self.options.push((key, action));
        }
    }
}

/// `N2`, `N3-4` or `N5+` by players still in the hand.
pub fn table_size_bucket(in_hand: usize) -> &'static str {
    match in_hand {
        0..=2 => "N2",
        3..=4 => "N3-4",
        _ => "N5+",
    }
}

/// Smallest stack (chips behind plus this street's bet) among the player and
/// the opponents still in the hand, in big blinds.
pub fn effective_stack_bb(state: &GameState, seat: usize) -> f64 {
    let depth = |s: usize| state.player(s).stack as u64 + state.ledger().bet_in_round(s) as u64;
    let mine = depth(seat);
    let eff = state
        .players()
        .iter()
        .enumerate()
        .filter(|(s, p)| *s != seat && p.in_hand())
        .map(|(s, _)| depth(s))
        .fold(mine, u64::min);
    eff as f64 / state.big_blind().max(1) as f64
}

fn basic_options(legal: LegalActions) -> Proposal {
    let mut p = Proposal {
        seed: None,
        situation: String::new(),
        options: Vec::new(),
    };
    for kind in [
        ActionKind::Fold,
        ActionKind::Check,
        ActionKind::Call,
        ActionKind::AllIn,
    ] {
        if legal.contains(kind) {
            p.push(kind.as_str().to_string(), PlayerAction::from_kind(kind));
        }
    }
    p
}

/// The DecisionProposer. Stateless apart from the random draws some
/// postflop seeds take.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisionProposer;

impl DecisionProposer {
    /// `None` when the seat holds no cards.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        seat: usize,
        rng: &mut R,
    ) -> Option<Proposal> {
        state.player(seat).hole?;
        let mut proposal = if state.street() == Street::Preflop {
            self.preflop(state, seat)
        } else {
            self.postflop(state, seat, rng)
        };
        if let Some(seed) = proposal.seed.take() {
            if proposal.contains(&seed) {
                proposal.seed = Some(seed);
            }
        }
        Some(proposal)
    }

    fn preflop(&self, state: &GameState, seat: usize) -> Proposal {
        let legal = state.legal_actions(seat);
        let mut p = basic_options(legal);
        let Some(hole) = state.player(seat).hole else {
            return p;
        };
        let combo = hole_to_combo(hole);
        let pos = state.position_label(seat).unwrap_or("UTG");
        let bb = state.big_blind().max(1);
        let to_call = state.to_call(seat);
        let raises = state.aggressive_actions_on(Street::Preflop);
        let depth = effective_stack_bb(state, seat);
        let n = state.in_hand_count();

        let pos_group = match pos {
            "SB" | "BTN/SB" => "SB",
            "BB" => "BB",
            "CO" | "BTN" => "LATE",
            _ => "EARLY",
        };
        let facing = match raises {
            0 => "unopen",
            1 => "vs_open",
            _ => "multi",
        };
        let depth_cat = if depth <= 15.0 {
            "short"
        } else if depth <= 30.0 {
            "mid"
        } else {
            "deep"
        };
        let call_cat = if to_call == 0 {
            "zero"
        } else if to_call <= 4 * bb {
            "small"
        } else {
            "big"
        };
        p.situation = format!(
            "P|{}|{}|{}|{}|{}|{}",
            pos_group,
            hand_category(&combo),
            facing,
            depth_cat,
            call_cat,
            table_size_bucket(n)
        );

        let can_raise = legal.contains(ActionKind::Raise);
        let min_total = state.current_max_bet().saturating_add(state.last_raise_size());
        let add_grid = |p: &mut Proposal, tag: &str, grid: &[f64]| -> Vec<String> {
            let mut keys = Vec::new();
            if !can_raise {
                return keys;
            }
            for &size in grid {
                let key = format!("raise@{}{:.1}bb", tag, size);
                let target = ((size * bb as f64).round() as u32).max(min_total);
                p.push(key.clone(), PlayerAction::Raise(Some(target)));
                keys.push(key);
            }
            keys
        };
        // The persona's size preference wins; balanced personas size up as
        // the table gets shorter.
        let size_pref = state.player(seat).persona.size_pref;
        let pick_size = |small: &str, bal: &str, big: &str| -> String {
            match (size_pref, n) {
                (SizePref::Small, _) => small,
                (SizePref::Big, _) => big,
                (SizePref::Balanced, 0..=3) => big,
                (SizePref::Balanced, 4) => bal,
                (SizePref::Balanced, _) => small,
            }
            .to_string()
        };
        let fold_or = |fallback: &str| -> String {
            if legal.contains(ActionKind::Fold) {
                "fold".to_string()
            } else {
                fallback.to_string()
            }
        };

        let seed = match pos_group {
            "BB" if raises == 0 && legal.contains(ActionKind::Check) => Some("check".to_string()),
            "BB" => {
                if Range::ThreeBet.contains(&combo) && can_raise {
                    let keys = add_grid(&mut p, "3b", &THREEBET_OOP_BB);
                    Some(pick_size(&keys[0], &keys[1], &keys[keys.len() - 1]))
                } else if Range::CallVsOpen.contains(&combo) && legal.contains(ActionKind::Call) {
                    Some("call".to_string())
                } else if legal.contains(ActionKind::Fold) {
                    Some("fold".to_string())
                } else {
                    None
                }
            }
            "SB" if raises == 0 => {
                if Range::SbOpen.contains(&combo) && can_raise {
                    let keys = add_grid(&mut p, "open", &OPEN_SIZE_BB);
                    Some(pick_size(&keys[0], &keys[2], &keys[keys.len() - 1]))
                } else {
                    Some(fold_or("check"))
                }
            }
            "SB" => {
                if Range::ThreeBet.contains(&combo) && can_raise {
                    if depth <= 18.0 && legal.contains(ActionKind::AllIn) {
                        Some("allin".to_string())
                    } else {
                        let keys = add_grid(&mut p, "3b", &THREEBET_OOP_BB);
                        Some(keys[1].clone())
                    }
                } else if Range::CallVsOpen.contains(&combo) && legal.contains(ActionKind::Call) {
                    Some("call".to_string())
                } else {
                    Some(fold_or("call"))
                }
            }
            _ if raises == 0 => {
                let range = if EARLY_OPENERS.contains(&pos) {
                    Range::EarlyOpen
                } else {
                    Range::LateOpen
                };
                if range.contains(&combo) && can_raise {
                    let keys = add_grid(&mut p, "open", &OPEN_SIZE_BB);
                    Some(pick_size(&keys[0], &keys[2], &keys[keys.len() - 1]))
                } else {
                    Some(fold_or("check"))
                }
            }
            _ if raises >= 2 => {
                if Range::FourBetShove.contains(&combo) && legal.contains(ActionKind::AllIn) {
                    Some("allin".to_string())
                } else {
                    let keys = add_grid(&mut p, "4b", &FOURBET_BB);
                    match keys.first() {
                        Some(k) => Some(k.clone()),
                        None => Some(fold_or("call")),
                    }
                }
            }
            _ => {
                if Range::ThreeBet.contains(&combo) && can_raise {
                    if depth <= 20.0 && legal.contains(ActionKind::AllIn) {
                        Some("allin".to_string())
                    } else {
                        let grid: &[f64] = if pos_group == "LATE" {
                            &THREEBET_IP_BB
                        } else {
                            &THREEBET_OOP_BB
                        };
                        let keys = add_grid(&mut p, "3b", grid);
                        Some(keys[1].clone())
                    }
                } else if Range::CallVsOpen.contains(&combo) && legal.contains(ActionKind::Call) {
                    let me = state.player(seat);
                    if to_call > 6 * bb && me.stack < 20 * bb && legal.contains(ActionKind::Fold) {
                        Some("fold".to_string())
                    } else {
                        Some("call".to_string())
                    }
                } else {
                    Some(fold_or("call"))
                }
            }
        };
        p.seed = seed;
        p
    }

    fn postflop<R: Rng + ?Sized>(&self, state: &GameState, seat: usize, rng: &mut R) -> Proposal {
        let legal = state.legal_actions(seat);
        let mut p = basic_options(legal);
        let Some(hole) = state.player(seat).hole else {
            return p;
        };
        let street = state.street();
        let bb = state.big_blind();
        let my_bet = state.ledger().bet_in_round(seat);
        let to_call = state.to_call(seat);
        let pot = state.pot_total().max(2 * bb as u64);

        let mut cards = hole.to_vec();
        cards.extend_from_slice(state.board());
        let made = best_hand(&cards)
            .map(|b| MadeClass::from_category(b.strength.category))
            .unwrap_or(MadeClass::Air);
        let draws = if matches!(street, Street::Flop | Street::Turn) {
            Draws::detect(&cards)
        } else {
            Draws::default()
        };

        let ratio = to_call as f64 / pot.max(1) as f64;
        let facing = if to_call == 0 {
            "zero"
        } else if ratio <= 0.25 {
            "small"
        } else if ratio <= 0.5 {
            "mid"
        } else {
            "big"
        };
        let street_letter = match street {
            Street::Flop => "F",
            Street::Turn => "T",
            _ => "R",
        };
        p.situation = format!(
            "{}|{}|{}|{}|{}",
            street_letter,
            made.as_str(),
            draws.letters(),
            facing,
            table_size_bucket(state.in_hand_count())
        );

        let can_bet = legal.contains(ActionKind::Bet);
        let can_raise = legal.contains(ActionKind::Raise);
        if can_bet {
            for pct in BET_SIZES_PCT {
                let amount = ((pot * pct as u64 / 100) as u32).max(bb);
                p.push(
                    format!("bet@{}p", pct),
                    PlayerAction::Bet(Some(my_bet.saturating_add(amount))),
                );
            }
        }
        if can_raise && to_call > 0 {
            let max = state.current_max_bet();
            let last = state.last_raise_size();
            for tag in RAISE_TAGS {
                let add = match tag {
                    "min" => last.max(bb),
                    "2.5x" => (last.saturating_mul(5) / 2).max(bb),
                    "3x" => last.saturating_mul(3).max(bb),
                    _ => ALLIN_RAISE,
                };
                p.push(
                    format!("raise@{}", tag),
                    PlayerAction::Raise(Some(max.saturating_add(add))),
                );
            }
        }

        let persona = state.player(seat).persona;
        let style = persona.style;
        let bet_seed = |p: &Proposal, default_pct: u32| -> Option<String> {
            let prefs: &[u32] = match style {
                Style::Aggressive => &[66, 80, 100, 150],
                Style::Conservative => &[33, 50],
                Style::Balanced => &[50, 66],
            };
            prefs
                .iter()
                .chain(std::iter::once(&default_pct))
                .map(|pct| format!("bet@{}p", pct))
                .find(|k| p.contains(k))
        };
        let raise_seed = |p: &Proposal, default_tag: &str| -> Option<String> {
            let prefs: &[&str] = match style {
                Style::Aggressive => &["3x", "2.5x", "allin", "min"],
                Style::Conservative => &["min", "2.5x", "3x"],
                Style::Balanced => &["2.5x", "3x", "min"],
            };
            prefs
                .iter()
                .chain(std::iter::once(&default_tag))
                .map(|t| format!("raise@{}", t))
                .find(|k| p.contains(k))
        };
        let has = |p: &Proposal, k: &str| p.contains(k);
        let fold_else_call = |p: &Proposal| -> Option<String> {
            Some(if has(p, "fold") { "fold" } else { "call" }.to_string())
        };
        let pot_share = |frac: f64| to_call as f64 <= frac * pot as f64;
        let facing_bet = to_call > 0;

        let seed = match made {
            MadeClass::Monster => {
                if facing_bet && can_raise {
                    raise_seed(&p, "3x")
                } else if !facing_bet && can_bet {
                    bet_seed(&p, 75)
                } else {
                    None
                }
            }
            MadeClass::VeryGood => {
                if facing_bet {
                    if can_raise && rng.random::<f64>() < 0.5 {
                        raise_seed(&p, "2.5x")
                    } else if has(&p, "call") {
                        Some("call".to_string())
                    } else {
                        None
                    }
                } else if can_bet {
                    bet_seed(&p, 65)
                } else {
                    None
                }
            }
            _ if draws.is_strong() => {
                if facing_bet {
                    if pot_share(0.35) && has(&p, "call") {
                        Some("call".to_string())
                    } else if can_raise {
                        raise_seed(&p, "2.5x")
                    } else {
                        None
                    }
                } else if can_bet {
                    bet_seed(&p, 60)
                } else {
                    None
                }
            }
            _ if draws.any() => {
                if facing_bet {
                    if pot_share(0.25) && has(&p, "call") {
                        Some("call".to_string())
                    } else if can_raise && rng.random::<f64>() < 0.3 {
                        raise_seed(&p, "min")
                    } else {
                        fold_else_call(&p)
                    }
                } else if can_bet && rng.random::<f64>() < 0.6 {
                    bet_seed(&p, 50)
                } else {
                    Some("check".to_string())
                }
            }
            MadeClass::Medium => {
                if facing_bet {
                    if pot_share(0.4) && has(&p, "call") {
                        Some("call".to_string())
                    } else {
                        fold_else_call(&p)
                    }
                } else if can_bet && rng.random::<f64>() < 0.5 {
                    bet_seed(&p, 50)
                } else {
                    Some("check".to_string())
                }
            }
            MadeClass::Air => {
                if !facing_bet {
                    if can_bet && rng.random::<f64>() < AIR_BET_PER_BLUFF * persona.bluff {
                        bet_seed(&p, 50)
                    } else {
                        Some("check".to_string())
                    }
                } else {
                    fold_else_call(&p)
                }
            }
        };
        p.seed = seed;
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_size_buckets() {
        assert_eq!(table_size_bucket(2), "N2");
        assert_eq!(table_size_bucket(3), "N3-4");
        assert_eq!(table_size_bucket(4), "N3-4");
        assert_eq!(table_size_bucket(9), "N5+");
    }

    #[test]
    fn proposal_lookup_by_key() {
        let mut p = basic_options({
            let mut l = LegalActions::none();
            l.insert(ActionKind::Fold);
            l.insert(ActionKind::Call);
            l
        });
        p.push("call".to_string(), PlayerAction::Check);
        assert_eq!(p.keys(), vec!["fold".to_string(), "call".to_string()]);
        assert_eq!(p.action_for("call"), Some(PlayerAction::Call));
        assert_eq!(p.action_for("check"), None);
    }
}
