use serde::{Deserialize, Serialize};

use crate::blinds::Stakes;
use crate::cards::Card;
use crate::errors::GameError;
use crate::logger::Street;
use crate::player::{ActionKind, Player, PlayerAction, PlayerId};
use crate::pot::PotLedger;
use crate::rules::{legal_actions, BettingContext, LegalActions};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 10;

/// Preflop position names by number of seated players, in the order they
/// are handed out: the seats after the big blind, then button, SB, BB.
fn position_names(n: usize) -> &'static [&'static str] {
    match n {
        2 => &["BTN/SB", "BB"],
        3 => &["BTN(UTG)", "SB", "BB"],
        4 => &["UTG", "BTN", "SB", "BB"],
        5 => &["UTG", "CO", "BTN", "SB", "BB"],
        6 => &["UTG", "HJ", "CO", "BTN", "SB", "BB"],
        7 => &["UTG", "LJ", "HJ", "CO", "BTN", "SB", "BB"],
        8 => &["UTG", "UTG+1", "LJ", "HJ", "CO", "BTN", "SB", "BB"],
        9 => &["UTG", "UTG+1", "UTG+2", "LJ", "HJ", "CO", "BTN", "SB", "BB"],
        10 => &[
            "UTG", "UTG+1", "UTG+2", "UTG+3", "LJ", "HJ", "CO", "BTN", "SB", "BB",
        ],
        _ => &[],
    }
}

/// One public decision, as seen by every player at the table. Blind posts
/// are not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub street: Street,
    pub seat: usize,
    pub player: PlayerId,
    pub action: ActionKind,
    pub amount: u32,
    pub to_total: Option<u32>,
}

/// What applying an action did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// Chips moved from the stack
    pub paid: u32,
    /// Street total after a bet or raise
    pub to_total: Option<u32>,
    /// The action was a full raise and gave everyone else a new turn
    pub reopened: bool,
}

/// Table state for the hand in progress.
///
/// Seats are fixed for the whole run; eliminated players keep their seat
/// and are skipped by every seat walk. Deciders get a shared reference to
/// this state and may read anything public from it.
#[derive(Debug, Clone)]
pub struct GameState {
    players: Vec<Player>,
    button: usize,
    street: Street,
    board: Vec<Card>,
    ledger: PotLedger,
    current_max_bet: u32,
    last_raise_size: u32,
    last_raiser: Option<usize>,
    has_acted: Vec<bool>,
    stakes: Stakes,
    hand_id: u64,
    history: Vec<ActionRecord>,
}

impl GameState {
    pub fn new(players: Vec<Player>) -> Result<Self, GameError> {
        let n = players.len();
        if !(MIN_SEATS..=MAX_SEATS).contains(&n) {
            return Err(GameError::InvalidSeatCount(n));
        }
        Ok(Self {
            players,
            button: 0,
            street: Street::Preflop,
            board: Vec::with_capacity(5),
            ledger: PotLedger::new(n),
            current_max_bet: 0,
            last_raise_size: 1,
            last_raiser: None,
            has_acted: vec![false; n],
            stakes: Stakes {
                level: 1,
                small_blind: 1,
                big_blind: 1,
            },
            hand_id: 0,
            history: Vec::new(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn player(&self, seat: usize) -> &Player {
        &self.players[seat]
    }

    pub fn button(&self) -> usize {
        self.button
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn ledger(&self) -> &PotLedger {
        &self.ledger
    }

    pub fn current_max_bet(&self) -> u32 {
        self.current_max_bet
    }

    pub fn last_raise_size(&self) -> u32 {
        self.last_raise_size
    }

    pub fn last_raiser(&self) -> Option<usize> {
        self.last_raiser
    }

    pub fn has_acted(&self, seat: usize) -> bool {
        self.has_acted[seat]
    }

    pub fn stakes(&self) -> Stakes {
        self.stakes
    }

    pub fn big_blind(&self) -> u32 {
        self.stakes.big_blind
    }

    pub fn hand_id(&self) -> u64 {
        self.hand_id
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    /// Bets, raises and all-ins made on `street`.
    pub fn aggressive_actions_on(&self, street: Street) -> usize {
        self.history
            .iter()
            .filter(|r| r.street == street && r.action.is_aggressive())
            .count()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| !p.eliminated).count()
    }

    pub fn in_hand_count(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    /// Players still able to act (seated, not folded, not all-in).
    pub fn live_count(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Next seat clockwise that still has a player, eliminated seats skipped.
    pub fn seat_after(&self, seat: usize) -> usize {
        let n = self.players.len();
        (1..=n)
            .map(|step| (seat + step) % n)
            .find(|&s| !self.players[s].eliminated)
            .unwrap_or(seat)
    }

    /// First seat, starting at `start` itself, whose player can still act.
    fn first_live_from(&self, start: usize) -> Option<usize> {
        let n = self.players.len();
        (0..n)
            .map(|step| (start + step) % n)
            .find(|&s| self.players[s].can_act())
    }

    /// Next seat after `seat` whose player can still act.
    pub fn next_live_after(&self, seat: usize) -> Option<usize> {
        self.first_live_from((seat + 1) % self.players.len())
    }

    /// Small and big blind seats: the two seated players left of the button.
    pub fn blind_seats(&self) -> (usize, usize) {
        let sb = self.seat_after(self.button);
        (sb, self.seat_after(sb))
    }

    /// Heads-up the small blind opens the action; otherwise the first live
    /// seat after the big blind.
    pub fn preflop_first_actor(&self) -> Option<usize> {
        let (sb, bb) = self.blind_seats();
        if self.alive_count() == 2 {
            self.first_live_from(sb)
        } else {
            self.next_live_after(bb)
        }
    }

    pub fn postflop_first_actor(&self) -> Option<usize> {
        self.next_live_after(self.button)
    }

    /// Position name of every seat for the current button, `None` for
    /// eliminated seats.
    pub fn position_labels(&self) -> Vec<Option<&'static str>> {
        let mut labels = vec![None; self.players.len()];
        let n = self.alive_count();
        let names = position_names(n);
        if names.is_empty() {
            return labels;
        }
        let (sb, bb) = self.blind_seats();
        let order = if n == 2 {
            vec![sb, bb]
        } else {
            let mut seats = Vec::with_capacity(n);
            let mut s = bb;
            for _ in 0..n - 3 {
                s = self.seat_after(s);
                seats.push(s);
            }
            seats.extend([self.button, sb, bb]);
            seats
        };
        for (seat, name) in order.into_iter().zip(names.iter()) {
            labels[seat] = Some(*name);
        }
        labels
    }

    pub fn position_label(&self, seat: usize) -> Option<&'static str> {
        self.position_labels().get(seat).copied().flatten()
    }

    pub fn to_call(&self, seat: usize) -> u32 {
        self.current_max_bet
            .saturating_sub(self.ledger.bet_in_round(seat))
    }

    pub fn pot_total(&self) -> u64 {
        self.ledger.total_committed()
    }

    pub fn betting_context(&self, seat: usize) -> BettingContext {
        BettingContext {
            stack: self.players[seat].stack,
            bet_in_round: self.ledger.bet_in_round(seat),
            current_max_bet: self.current_max_bet,
            last_raise_size: self.last_raise_size,
            big_blind: self.stakes.big_blind,
            live_players: self.live_count(),
            action_open: !self.has_acted[seat],
        }
    }

    pub fn legal_actions(&self, seat: usize) -> LegalActions {
        if !self.players[seat].can_act() {
            return LegalActions::none();
        }
        legal_actions(&self.betting_context(seat))
    }

    /// Resets the per-hand state. A button left on an eliminated seat moves
    /// on to the next seated player first.
    pub(crate) fn begin_hand(&mut self, hand_id: u64, stakes: Stakes) {
        if self.players[self.button].eliminated {
            self.button = self.seat_after(self.button);
        }
        for p in &mut self.players {
            p.reset_for_hand();
        }
        self.ledger = PotLedger::new(self.players.len());
        self.board.clear();
        self.street = Street::Preflop;
        self.history.clear();
        self.current_max_bet = 0;
        self.last_raise_size = stakes.big_blind;
        self.last_raiser = None;
        self.has_acted.iter_mut().for_each(|a| *a = false);
        self.stakes = stakes;
        self.hand_id = hand_id;
    }

    /// Posts a blind for the seat, returning the chips actually paid.
    pub(crate) fn post_blind(&mut self, seat: usize, amount: u32) -> u32 {
        let paid = self.ledger.post_blind(&mut self.players[seat], amount);
        self.current_max_bet = self.ledger.max_bet_in_round();
        paid
    }

    pub(crate) fn deal_hole(&mut self, seat: usize, hole: [Card; 2]) {
        self.players[seat].hole = Some(hole);
    }

    pub(crate) fn push_board(&mut self, cards: &[Card]) {
        self.board.extend_from_slice(cards);
    }

    /// Starts a new betting street: bets-in-round, max bet and acted flags
    /// are cleared and the minimum raise returns to one big blind.
    pub(crate) fn reset_for_street(&mut self, street: Street) {
        self.street = street;
        self.ledger.reset_street();
        self.current_max_bet = 0;
        self.last_raise_size = self.stakes.big_blind;
        self.last_raiser = None;
        self.has_acted.iter_mut().for_each(|a| *a = false);
    }

    /// Applies an action the caller already checked against
    /// [`GameState::legal_actions`].
    pub(crate) fn apply_action(&mut self, seat: usize, action: PlayerAction) -> ActionOutcome {
        let ctx = self.betting_context(seat);
        let prev_max = self.current_max_bet;
        let kind = action.kind();
        let player = &mut self.players[seat];
        let paid = match action {
            PlayerAction::Fold => {
                player.folded = true;
                0
            }
            PlayerAction::Check => 0,
            PlayerAction::Call => self.ledger.commit(player, ctx.to_call()),
            PlayerAction::AllIn => {
                let stack = player.stack;
                self.ledger.commit(player, stack)
            }
            PlayerAction::Bet(target) | PlayerAction::Raise(target) => {
                let total = ctx.clamp_target(kind, target);
                self.ledger
                    .commit(player, total.saturating_sub(ctx.bet_in_round))
            }
        };

        let mut reopened = false;
        let mut to_total = None;
        if kind.is_aggressive() {
            let total = self.ledger.bet_in_round(seat);
            if kind != ActionKind::AllIn {
                to_total = Some(total);
            }
            if total > prev_max {
                let increment = total - prev_max;
                if increment >= self.last_raise_size {
                    self.last_raise_size = increment;
                    self.last_raiser = Some(seat);
                    for (s, p) in self.players.iter().enumerate() {
                        if p.can_act() {
                            self.has_acted[s] = false;
                        }
                    }
                    reopened = true;
                }
                self.current_max_bet = total;
            }
        }
        self.has_acted[seat] = kind != ActionKind::Fold;

        self.history.push(ActionRecord {
            street: self.street,
            seat,
            player: self.players[seat].id,
            action: kind,
            amount: paid,
            to_total,
        });
        ActionOutcome {
            kind,
            paid,
            to_total,
            reopened,
        }
    }

    /// True when no further decision is needed on this street: one player
    /// left in the hand, nobody able to act, or every live player has
    /// matched the max bet and acted (a lone live player only has to match).
    pub fn round_complete(&self) -> bool {
        if self.in_hand_count() <= 1 {
            return true;
        }
        let live: Vec<usize> = (0..self.players.len())
            .filter(|&s| self.players[s].can_act())
            .collect();
        if live.is_empty() {
            return true;
        }
        let matched = live
            .iter()
            .all(|&s| self.ledger.bet_in_round(s) == self.current_max_bet);
        matched && (live.len() == 1 || live.iter().all(|&s| self.has_acted[s]))
    }

    /// Seats still in the hand, clockwise from the first seat left of the
    /// button. Odd chips are handed out in this order.
    pub fn distribution_order(&self) -> Vec<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (self.button + step) % n)
            .filter(|&s| self.players[s].in_hand())
            .collect()
    }

    pub(crate) fn award(&mut self, seat: usize, amount: u64) -> Result<(), GameError> {
        let player = &mut self.players[seat];
        player.stack = u32::try_from(amount)
            .ok()
            .and_then(|chips| player.stack.checked_add(chips))
            .ok_or(GameError::StackOverflow { seat, amount })?;
        Ok(())
    }

    pub(crate) fn move_button(&mut self) {
        self.button = self.seat_after(self.button);
    }
}
