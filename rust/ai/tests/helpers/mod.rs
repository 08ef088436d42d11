#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rentpoker_ai::baseline::HeuristicAI;
use rentpoker_ai::proposer::{DecisionProposer, Proposal};
use rentpoker_engine::config::{FixedBlinds, TableConfig};
use rentpoker_engine::decision::Decider;
use rentpoker_engine::game::GameState;
use rentpoker_engine::logger::Street;
use rentpoker_engine::player::PlayerAction;

/// A proposal together with the facts it was made from.
#[derive(Debug, Clone)]
pub struct Seen {
    pub street: Street,
    pub position: Option<&'static str>,
    pub to_call: u32,
    pub proposal: Proposal,
}

/// Heuristic players that also record every proposal made for them.
pub fn recording_table(n: usize, seed: u64) -> (Vec<Box<dyn Decider>>, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let deciders = (0..n)
        .map(|i| {
            let seen = Arc::clone(&seen);
            let mut rng = ChaCha20Rng::seed_from_u64(seed + i as u64);
            let mut inner = HeuristicAI::new(seed + 100 + i as u64);
            Box::new(move |state: &GameState, seat: usize| -> Option<PlayerAction> {
                if let Some(proposal) = DecisionProposer.propose(state, seat, &mut rng) {
                    seen.lock().unwrap().push(Seen {
                        street: state.street(),
                        position: state.position_label(seat),
                        to_call: state.to_call(seat),
                        proposal,
                    });
                }
                inner.decide(state, seat)
            }) as Box<dyn Decider>
        })
        .collect();
    (deciders, seen)
}

pub fn table(players: usize, stack: u32, seed: u64) -> TableConfig {
    TableConfig {
        players,
        starting_stack: stack,
        max_rebuys: 0,
        hands: 200,
        seed,
        reveal_showdown: true,
        fixed_blinds: Some(FixedBlinds {
            small_blind: 1,
            big_blind: 3,
        }),
    }
}
