//! Heuristic AI implementation for poker gameplay.
//!
//! Plays the proposer's seed option directly, with no learning. Useful as a
//! fixed opponent and for checking that a learning table beats its own prior.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rentpoker_engine::decision::Decider;
use rentpoker_engine::game::GameState;
use rentpoker_engine::player::{ActionKind, PlayerAction};

use crate::proposer::DecisionProposer;

/// Fixed-strategy opponent built on the proposer's heuristics.
///
/// # Strategy
///
/// **Preflop:** position-based opening, 3-bet and 4-bet ranges with sizes
/// from the standard grids.
///
/// **Postflop:** made-hand class and draws decide between betting, raising,
/// calling and folding; bet sizes follow the player's persona style.
///
/// When the heuristic has no opinion the AI checks if it can and folds
/// otherwise.
///
/// # Example
///
/// ```rust
/// use rentpoker_ai::baseline::HeuristicAI;
/// use rentpoker_engine::config::TableConfig;
/// use rentpoker_engine::decision::Decider;
/// use rentpoker_engine::engine::Engine;
/// use rentpoker_engine::logger::NullSink;
///
/// let cfg = TableConfig { players: 4, ..TableConfig::default() };
/// let deciders: Vec<Box<dyn Decider>> = (0..4u64)
///     .map(|i| Box::new(HeuristicAI::new(i)) as Box<dyn Decider>)
///     .collect();
/// let mut engine = Engine::new(cfg, deciders, Box::new(NullSink)).unwrap();
/// assert!(engine.play_hand().unwrap().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicAI {
    proposer: DecisionProposer,
    rng: ChaCha20Rng,
}

impl HeuristicAI {
    /// Create a new HeuristicAI.
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed for the random draws some postflop seeds take
    pub fn new(seed: u64) -> Self {
        Self {
            proposer: DecisionProposer,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for HeuristicAI {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Decider for HeuristicAI {
    fn decide(&mut self, state: &GameState, seat: usize) -> Option<PlayerAction> {
        let proposal = self.proposer.propose(state, seat, &mut self.rng)?;
        if let Some(action) = proposal.seed.as_deref().and_then(|k| proposal.action_for(k)) {
            return Some(action);
        }
        if state.legal_actions(seat).contains(ActionKind::Check) {
            Some(PlayerAction::Check)
        } else {
            Some(PlayerAction::Fold)
        }
    }
}
