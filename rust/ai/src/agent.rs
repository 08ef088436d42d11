//! The self-training agent: proposer options ranked by a shared learner.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rentpoker_engine::decision::Decider;
use rentpoker_engine::engine::HandSummary;
use rentpoker_engine::game::GameState;
use rentpoker_engine::player::PlayerAction;

use crate::learner::{DecisionTrace, PolicyLearner};
use crate::proposer::DecisionProposer;

/// A learner the agent writes to while the caller keeps a handle for saving.
pub type SharedLearner = Arc<Mutex<PolicyLearner>>;

pub fn shared(learner: PolicyLearner) -> SharedLearner {
    Arc::new(Mutex::new(learner))
}

/// Locks a shared learner. A poisoned lock still yields the table.
pub fn lock(learner: &SharedLearner) -> MutexGuard<'_, PolicyLearner> {
    learner.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct LearningAgent {
    learner: SharedLearner,
    proposer: DecisionProposer,
    rng: ChaCha20Rng,
    traces: Vec<DecisionTrace>,
}

impl LearningAgent {
    pub fn new(learner: SharedLearner, seed: u64) -> Self {
        Self {
            learner,
            proposer: DecisionProposer,
            rng: ChaCha20Rng::seed_from_u64(seed),
            traces: Vec::new(),
        }
    }

    pub fn learner(&self) -> &SharedLearner {
        &self.learner
    }

    /// Decisions taken so far in the current hand.
    pub fn traces(&self) -> &[DecisionTrace] {
        &self.traces
    }
}

impl Decider for LearningAgent {
    fn decide(&mut self, state: &GameState, seat: usize) -> Option<PlayerAction> {
        let proposal = self.proposer.propose(state, seat, &mut self.rng)?;
        let keys = proposal.keys();
        let chosen = lock(&self.learner)
            .suggest(&mut self.rng, &proposal.situation, &keys, proposal.seed.as_deref())?
            .to_string();
        tracing::trace!(
            seat,
            situation = %proposal.situation,
            option = %chosen,
            seed = ?proposal.seed,
            "learner choice"
        );
        let action = proposal.action_for(&chosen);
        self.traces.push(DecisionTrace {
            player: state.player(seat).id,
            situation: proposal.situation,
            option: chosen,
        });
        action
    }

    fn hand_complete(&mut self, summary: &HandSummary) {
        if self.traces.is_empty() {
            return;
        }
        let mut learner = lock(&self.learner);
        learner.update(&self.traces, &summary.deltas, summary.stakes.big_blind);
        learner.record_hand();
        self.traces.clear();
    }
}
