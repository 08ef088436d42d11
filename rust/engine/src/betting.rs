use crate::decision::Decider;
use crate::errors::GameError;
use crate::game::GameState;
use crate::logger::{EventSink, HandEvent, PlayerRef};

/// Turns a single street may take before it is treated as stuck.
pub const MAX_ROUND_TURNS: usize = 1000;

/// Runs one betting street starting at `first`.
///
/// Each live seat in turn is asked for a decision; anything outside the
/// legal set is replaced by the first legal of check, call, fold, all-in.
/// Returns once [`GameState::round_complete`] holds.
pub fn run_betting_round(
    state: &mut GameState,
    deciders: &mut [Box<dyn Decider>],
    sink: &mut dyn EventSink,
    first: Option<usize>,
) -> Result<(), GameError> {
    let Some(mut seat) = first else {
        return Ok(());
    };
    if state.round_complete() {
        return Ok(());
    }

    for _ in 0..MAX_ROUND_TURNS {
        if !state.player(seat).can_act() {
            match state.next_live_after(seat) {
                Some(s) => seat = s,
                None => return Ok(()),
            }
        }

        let legal = state.legal_actions(seat);
        let requested = deciders[seat].decide(state, seat);
        let Some(action) = legal.resolve(requested) else {
            tracing::warn!(seat, "no legal action available");
            return Ok(());
        };
        if requested != Some(action) {
            tracing::debug!(
                seat,
                requested = ?requested,
                applied = ?action,
                legal = %legal,
                "decision replaced by fallback"
            );
        }

        let outcome = state.apply_action(seat, action);
        let p = state.player(seat);
        sink.emit(&HandEvent::Action {
            hand_id: state.hand_id(),
            street: state.street(),
            player: PlayerRef::from(p),
            action: outcome.kind,
            amount: outcome.paid,
            to_total: outcome.to_total,
            pot: state.pot_total(),
            max_bet: state.current_max_bet(),
            stack: p.stack,
        });

        if state.round_complete() {
            return Ok(());
        }
        match state.next_live_after(seat) {
            Some(s) => seat = s,
            None => return Ok(()),
        }
    }

    tracing::error!(
        hand_id = state.hand_id(),
        street = %state.street(),
        "betting round exceeded {} turns",
        MAX_ROUND_TURNS
    );
    Err(GameError::RunawayRound(MAX_ROUND_TURNS))
}
