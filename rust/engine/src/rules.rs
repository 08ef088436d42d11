use std::fmt;

use crate::player::{ActionKind, PlayerAction};

/// The betting facts that decide which actions a player may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingContext {
    /// Chips behind
    pub stack: u32,
    /// Chips already put in on this street
    pub bet_in_round: u32,
    pub current_max_bet: u32,
    /// Minimum legal raise increment
    pub last_raise_size: u32,
    pub big_blind: u32,
    /// Non-folded, non-all-in players, the actor included
    pub live_players: usize,
    /// False when the player already acted and has since faced only a
    /// short all-in, which lets them call or fold but not raise
    pub action_open: bool,
}

impl BettingContext {
    pub fn to_call(&self) -> u32 {
        self.current_max_bet.saturating_sub(self.bet_in_round)
    }

    /// Smallest total a raise (or a bet into an existing blind) must reach.
    pub fn min_raise_total(&self) -> u32 {
        self.current_max_bet.saturating_add(self.last_raise_size)
    }

    /// Clamps a requested bet/raise total up to the minimum legal size.
    ///
    /// A missing size defaults to one big blind for a bet and to the previous
    /// raise increment for a raise. Sizes are never clamped down; the ledger
    /// caps the payment at the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use rentpoker_engine::player::ActionKind;
    /// use rentpoker_engine::rules::BettingContext;
    ///
    /// let ctx = BettingContext {
    ///     stack: 300,
    ///     bet_in_round: 0,
    ///     current_max_bet: 0,
    ///     last_raise_size: 3,
    ///     big_blind: 3,
    ///     live_players: 2,
    ///     action_open: true,
    /// };
    /// assert_eq!(ctx.clamp_target(ActionKind::Bet, None), 3);
    /// assert_eq!(ctx.clamp_target(ActionKind::Bet, Some(1)), 3);
    /// assert_eq!(ctx.clamp_target(ActionKind::Bet, Some(40)), 40);
    /// ```
    pub fn clamp_target(&self, kind: ActionKind, requested: Option<u32>) -> u32 {
        let default = match kind {
            ActionKind::Bet => self.bet_in_round.saturating_add(self.big_blind),
            _ => self.bet_in_round.saturating_add(self.last_raise_size),
        };
        let minimum = if self.current_max_bet == 0 && kind == ActionKind::Bet {
            self.big_blind.max(1)
        } else {
            self.min_raise_total()
        };
        requested.unwrap_or(default).max(minimum)
    }
}

/// Set of legal action kinds for one turn.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct LegalActions {
    bits: u8,
}

const ORDER: [ActionKind; 6] = [
    ActionKind::Fold,
    ActionKind::Check,
    ActionKind::Call,
    ActionKind::Bet,
    ActionKind::Raise,
    ActionKind::AllIn,
];

/// Substitution order for a decision outside the legal set.
const FALLBACK: [ActionKind; 4] = [
    ActionKind::Check,
    ActionKind::Call,
    ActionKind::Fold,
    ActionKind::AllIn,
];

impl LegalActions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ActionKind) {
        self.bits |= 1 << kind as u8;
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.bits & (1 << kind as u8) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        ORDER.into_iter().filter(|k| self.contains(*k))
    }

    /// Returns the action unchanged when legal, otherwise the first legal of
    /// check, call, fold, all-in. `None` (no decision) takes the same path.
    pub fn resolve(&self, action: Option<PlayerAction>) -> Option<PlayerAction> {
        match action {
            Some(a) if self.contains(a.kind()) => Some(a),
            _ => FALLBACK
                .into_iter()
                .find(|k| self.contains(*k))
                .map(PlayerAction::from_kind),
        }
    }
}

impl fmt::Debug for LegalActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for LegalActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.iter().map(|k| k.as_str()).collect();
        write!(f, "[{}]", words.join(", "))
    }
}

/// Legal actions for a player who is still able to act.
///
/// Nothing owed: check, plus bet and all-in while an opponent can still
/// respond (only all-in otherwise). Chips owed: fold, plus call and all-in
/// with chips behind, plus raise when a full minimum raise is affordable and
/// an opponent can respond. A player facing only a short all-in after
/// acting keeps call and fold, and all-in only when it does not exceed the call.
///
/// # Examples
///
/// ```
/// use rentpoker_engine::player::ActionKind;
/// use rentpoker_engine::rules::{legal_actions, BettingContext};
///
/// let facing_bb = BettingContext {
///     stack: 299,
///     bet_in_round: 1,
///     current_max_bet: 3,
///     last_raise_size: 3,
///     big_blind: 3,
///     live_players: 2,
///     action_open: true,
/// };
/// let legal = legal_actions(&facing_bb);
/// assert!(legal.contains(ActionKind::Fold));
/// assert!(legal.contains(ActionKind::Call));
/// assert!(legal.contains(ActionKind::Raise));
/// assert!(!legal.contains(ActionKind::Check));
/// ```
pub fn legal_actions(ctx: &BettingContext) -> LegalActions {
    let mut legal = LegalActions::none();
    let can_be_answered = ctx.live_players >= 2;
    if ctx.to_call() == 0 {
        legal.insert(ActionKind::Check);
        if ctx.stack > 0 {
            if can_be_answered {
                legal.insert(ActionKind::Bet);
            }
            legal.insert(ActionKind::AllIn);
        }
    } else {
        legal.insert(ActionKind::Fold);
        if ctx.stack > 0 {
            legal.insert(ActionKind::Call);
            if ctx.action_open || ctx.stack <= ctx.to_call() {
                legal.insert(ActionKind::AllIn);
            }
            let reach = ctx.stack as u64 + ctx.bet_in_round as u64;
            if ctx.action_open && can_be_answered && reach >= ctx.min_raise_total() as u64 {
                legal.insert(ActionKind::Raise);
            }
        }
    }
    legal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(stack: u32, bet: u32, max: u32, live: usize) -> BettingContext {
        BettingContext {
            stack,
            bet_in_round: bet,
            current_max_bet: max,
            last_raise_size: 10,
            big_blind: 10,
            live_players: live,
            action_open: true,
        }
    }

    #[test]
    fn unopened_pot_offers_check_bet_allin() {
        let l = legal_actions(&ctx(100, 0, 0, 3));
        assert_eq!(
            l.iter().collect::<Vec<_>>(),
            vec![ActionKind::Check, ActionKind::Bet, ActionKind::AllIn]
        );
    }

    #[test]
    fn lone_live_player_may_only_check_or_shove() {
        let l = legal_actions(&ctx(100, 0, 0, 1));
        assert_eq!(
            l.iter().collect::<Vec<_>>(),
            vec![ActionKind::Check, ActionKind::AllIn]
        );
    }

    #[test]
    fn short_stack_cannot_raise() {
        // owes 20, would need to reach 40 but only has 25 + 10
        let l = legal_actions(&ctx(25, 10, 30, 3));
        assert!(l.contains(ActionKind::Call));
        assert!(l.contains(ActionKind::AllIn));
        assert!(!l.contains(ActionKind::Raise));
    }

    #[test]
    fn facing_bet_with_no_opponent_to_respond_cannot_raise() {
        let l = legal_actions(&ctx(500, 0, 30, 1));
        assert!(!l.contains(ActionKind::Raise));
        assert!(l.contains(ActionKind::Call));
    }

    #[test]
    fn closed_action_allows_only_call_or_fold() {
        let c = BettingContext {
            action_open: false,
            ..ctx(500, 100, 130, 2)
        };
        let l = legal_actions(&c);
        assert_eq!(
            l.iter().collect::<Vec<_>>(),
            vec![ActionKind::Fold, ActionKind::Call]
        );
        // a stack that cannot cover the call may still go all-in
        let short = BettingContext {
            action_open: false,
            ..ctx(20, 100, 130, 2)
        };
        assert!(legal_actions(&short).contains(ActionKind::AllIn));
    }

    #[test]
    fn fallback_prefers_check_then_call_then_fold() {
        let unopened = legal_actions(&ctx(100, 0, 0, 3));
        assert_eq!(unopened.resolve(Some(PlayerAction::Fold)), Some(PlayerAction::Check));
        let facing = legal_actions(&ctx(100, 0, 30, 3));
        assert_eq!(facing.resolve(Some(PlayerAction::Check)), Some(PlayerAction::Call));
        assert_eq!(facing.resolve(None), Some(PlayerAction::Call));
        let broke = legal_actions(&ctx(0, 0, 30, 3));
        assert_eq!(broke.resolve(Some(PlayerAction::Raise(Some(90)))), Some(PlayerAction::Fold));
    }

    #[test]
    fn raise_without_size_uses_previous_increment() {
        let c = BettingContext {
            last_raise_size: 20,
            ..ctx(500, 10, 30, 3)
        };
        // default my_bet + 20 = 30 is below the 50 minimum
        assert_eq!(c.clamp_target(ActionKind::Raise, None), 50);
        assert_eq!(c.clamp_target(ActionKind::Raise, Some(0)), 50);
        assert_eq!(c.clamp_target(ActionKind::Raise, Some(120)), 120);
    }
}
