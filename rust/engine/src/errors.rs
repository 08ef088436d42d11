use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Pot mismatch: distributed {distributed}, committed {committed}")]
    PotMismatch { distributed: u64, committed: u64 },
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Table needs 2..=10 seats, got {0}")]
    InvalidSeatCount(usize),
    #[error("Expected {expected} deciders, got {actual}")]
    DeciderCountMismatch { expected: usize, actual: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Betting round did not terminate after {0} turns")]
    RunawayRound(usize),
    #[error("Awarding {amount} chips overflows the stack of seat {seat}")]
    StackOverflow { seat: usize, amount: u64 },
}

impl GameError {
    /// Broken-invariant errors abort the run rather than the hand.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::PotMismatch { .. }
                | GameError::DeckExhausted
                | GameError::RunawayRound(_)
                | GameError::StackOverflow { .. }
        )
    }
}
