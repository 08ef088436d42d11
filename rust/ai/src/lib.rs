//! # rentpoker-ai: Self-Training Agents for No-Limit Hold'em
//!
//! Deciders that plug into the engine's [`Decider`] seam.
//!
//! ## Core Components
//!
//! - [`learner`] - Bandit-style policy table with JSON snapshots
//! - [`proposer`] - Situation keys, sized options and heuristic seeds
//! - [`agent`] - [`agent::LearningAgent`], which lets the learner choose among the proposer's options
//! - [`baseline`] - [`baseline::HeuristicAI`], which plays the seed option without learning
//! - [`ranges`] / [`features`] - Preflop ranges and postflop hand features
//! - [`create_ai`] - Factory for a seat's decider
//!
//! ## Quick Start
//!
//! ```rust
//! use rentpoker_ai::{create_ai, AgentKind};
//! use rentpoker_engine::config::TableConfig;
//! use rentpoker_engine::engine::Engine;
//! use rentpoker_engine::logger::NullSink;
//!
//! let cfg = TableConfig { players: 3, ..TableConfig::default() };
//! let seats: Vec<_> = (1..=3).map(|id| create_ai(AgentKind::Learning, id, 42)).collect();
//! let learner = seats[0].learner.clone().unwrap();
//! let deciders = seats.into_iter().map(|s| s.decider).collect();
//! let mut engine = Engine::new(cfg, deciders, Box::new(NullSink)).unwrap();
//! for _ in 0..20 {
//!     engine.play_hand().unwrap();
//! }
//! assert!(!rentpoker_ai::agent::lock(&learner).is_empty());
//! ```
//!
//! ## AI Types
//!
//! - `"learning"` - [`agent::LearningAgent`] backed by its own policy table
//! - `"heuristic"` - [`baseline::HeuristicAI`]

use std::fmt;
use std::str::FromStr;

use rentpoker_engine::decision::Decider;
use rentpoker_engine::player::PlayerId;
use thiserror::Error;

pub mod agent;
pub mod baseline;
pub mod features;
pub mod learner;
pub mod proposer;
pub mod ranges;

use agent::{LearningAgent, SharedLearner};
use baseline::HeuristicAI;
use learner::PolicyLearner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentKind {
    #[default]
    Learning,
    Heuristic,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Learning => "learning",
            AgentKind::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown agent type: {0} (expected learning or heuristic)")]
pub struct UnknownAgent(pub String);

impl FromStr for AgentKind {
    type Err = UnknownAgent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "learning" => Ok(AgentKind::Learning),
            "heuristic" | "baseline" => Ok(AgentKind::Heuristic),
            other => Err(UnknownAgent(other.to_string())),
        }
    }
}

/// A seat's decider, plus the learner handle when the decider learns.
pub struct Seat {
    pub decider: Box<dyn Decider>,
    pub learner: Option<SharedLearner>,
}

/// Factory function to create the decider for one seat.
///
/// # Arguments
///
/// * `kind` - Which agent to build
/// * `player_id` - The player the decider plays for; learning agents only
///   learn from this player's results
/// * `seed` - Run seed; each player draws from its own derived stream
///
/// # Example
///
/// ```rust
/// use rentpoker_ai::{create_ai, AgentKind};
///
/// let seat = create_ai(AgentKind::Heuristic, 1, 7);
/// assert!(seat.learner.is_none());
/// ```
pub fn create_ai(kind: AgentKind, player_id: PlayerId, seed: u64) -> Seat {
    let stream = agent_seed(seed, player_id);
    match kind {
        AgentKind::Learning => {
            let learner = agent::shared(PolicyLearner::new(player_id));
            Seat {
                decider: Box::new(LearningAgent::new(learner.clone(), stream)),
                learner: Some(learner),
            }
        }
        AgentKind::Heuristic => Seat {
            decider: Box::new(HeuristicAI::new(stream)),
            learner: None,
        },
    }
}

/// Per-player RNG seed derived from the run seed.
pub fn agent_seed(seed: u64, player_id: PlayerId) -> u64 {
    seed ^ (player_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kinds_parse() {
        assert_eq!("learning".parse(), Ok(AgentKind::Learning));
        assert_eq!("Heuristic".parse(), Ok(AgentKind::Heuristic));
        assert_eq!(
            "random".parse::<AgentKind>(),
            Err(UnknownAgent("random".to_string()))
        );
    }

    #[test]
    fn agent_streams_differ_per_player() {
        assert_ne!(agent_seed(1, 1), agent_seed(1, 2));
        assert_eq!(agent_seed(1, 3), agent_seed(1, 3));
    }
}
