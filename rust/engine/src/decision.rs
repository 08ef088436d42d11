//! The seam between the engine and whoever makes decisions.
//!
//! The engine asks a [`Decider`] once per turn. Learning agents, scripted
//! players and remote front-ends all sit behind the same trait; the variant
//! is fixed when the engine is built.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::time::Duration;

use crate::engine::HandSummary;
use crate::game::GameState;
use crate::logger::Street;
use crate::player::{PlayerAction, PlayerId};
use crate::rules::LegalActions;

/// Chooses an action for the player in `seat`.
///
/// Returning `None`, or an action outside the legal set, makes the engine
/// substitute the first legal of check, call, fold, all-in.
pub trait Decider: Send {
    fn decide(&mut self, state: &GameState, seat: usize) -> Option<PlayerAction>;

    /// Called once per finished hand, for every decider at the table.
    fn hand_complete(&mut self, _summary: &HandSummary) {}
}

impl<F> Decider for F
where
    F: FnMut(&GameState, usize) -> Option<PlayerAction> + Send,
{
    fn decide(&mut self, state: &GameState, seat: usize) -> Option<PlayerAction> {
        self(state, seat)
    }
}

/// Always checks when possible and folds otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassiveDecider;

impl Decider for PassiveDecider {
    fn decide(&mut self, _state: &GameState, _seat: usize) -> Option<PlayerAction> {
        Some(PlayerAction::Check)
    }
}

/// A decision request sent to a front-end.
#[derive(Debug)]
pub struct DecisionRequest {
    pub hand_id: u64,
    pub street: Street,
    pub seat: usize,
    pub player: PlayerId,
    pub legal: LegalActions,
    pub to_call: u32,
    pub min_raise_total: u32,
    pub stack: u32,
    pub pot: u64,
    reply: SyncSender<PlayerAction>,
}

impl DecisionRequest {
    /// Sends the answer back. False when the engine stopped waiting.
    pub fn respond(self, action: PlayerAction) -> bool {
        self.reply.send(action).is_ok()
    }
}

/// Forwards each turn to another thread and blocks for the answer.
///
/// Waiting is bounded; a timeout or a dropped receiver yields no decision.
pub struct ChannelDecider {
    requests: SyncSender<DecisionRequest>,
    timeout: Duration,
}

impl ChannelDecider {
    /// Creates the decider and the receiving end a front-end listens on.
    pub fn channel(timeout: Duration) -> (Self, Receiver<DecisionRequest>) {
        let (tx, rx) = mpsc::sync_channel(1);
        (
            Self {
                requests: tx,
                timeout,
            },
            rx,
        )
    }
}

impl Decider for ChannelDecider {
    fn decide(&mut self, state: &GameState, seat: usize) -> Option<PlayerAction> {
        let (reply, answer) = mpsc::sync_channel(1);
        let ctx = state.betting_context(seat);
        let request = DecisionRequest {
            hand_id: state.hand_id(),
            street: state.street(),
            seat,
            player: state.player(seat).id,
            legal: state.legal_actions(seat),
            to_call: ctx.to_call(),
            min_raise_total: ctx.min_raise_total(),
            stack: ctx.stack,
            pot: state.pot_total(),
            reply,
        };
        if self.requests.send(request).is_err() {
            tracing::debug!(seat, "decision channel closed");
            return None;
        }
        match answer.recv_timeout(self.timeout) {
            Ok(action) => Some(action),
            Err(e) => {
                tracing::debug!(seat, error = %e, "no decision received");
                None
            }
        }
    }
}
