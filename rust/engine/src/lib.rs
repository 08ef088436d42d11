//! # rentpoker-engine: Multi-player No-Limit Hold'em Core
//!
//! A deterministic table engine for 2 to 10 players. It evaluates hands,
//! runs the betting streets, layers side pots and pays them out, raises the
//! blinds on a schedule derived from the chips in play, and reports every
//! step as a structured event.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Seeded deck shuffling with ChaCha20 RNG
//! - [`hand`] - Five-of-seven hand evaluation and comparison
//! - [`blinds`] - Ten-level blind schedule
//! - [`player`] - Seats, personas and action types
//! - [`rules`] - Legal action sets and bet sizing clamps
//! - [`pot`] - Chip commitments, side pots and distribution
//! - [`game`] - Table state, seat walks and action application
//! - [`betting`] - One betting street
//! - [`decision`] - The [`decision::Decider`] trait and a channel-backed decider
//! - [`engine`] - Hand lifecycle and the run loop
//! - [`logger`] - Hand events and sinks
//! - [`config`] - Table configuration
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use rentpoker_engine::cards::Card;
//! use rentpoker_engine::hand::{best_hand, Category};
//!
//! let cards: Vec<Card> = ["Ah", "Kh", "Qh", "Jh", "Th", "2c", "3d"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let best = best_hand(&cards).unwrap();
//! assert_eq!(best.strength.category, Category::StraightFlush);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! All shuffles come from a seeded stream:
//!
//! ```rust
//! use rentpoker_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.deal_n(5).unwrap(), b.deal_n(5).unwrap());
//! ```

pub mod betting;
pub mod blinds;
pub mod cards;
pub mod config;
pub mod deck;
pub mod decision;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
