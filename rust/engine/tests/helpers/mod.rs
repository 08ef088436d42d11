#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rentpoker_engine::config::{FixedBlinds, TableConfig};
use rentpoker_engine::decision::Decider;
use rentpoker_engine::game::GameState;
use rentpoker_engine::logger::{EventSink, HandEvent};
use rentpoker_engine::player::{ActionKind, PlayerAction};

/// Plays a fixed list of actions, then lets the fallback take over.
pub struct Scripted {
    actions: VecDeque<PlayerAction>,
}

impl Decider for Scripted {
    fn decide(&mut self, _state: &GameState, _seat: usize) -> Option<PlayerAction> {
        self.actions.pop_front()
    }
}

pub fn scripted(per_seat: Vec<Vec<PlayerAction>>) -> Vec<Box<dyn Decider>> {
    per_seat
        .into_iter()
        .map(|a| {
            Box::new(Scripted {
                actions: a.into(),
            }) as Box<dyn Decider>
        })
        .collect()
}

pub fn always(action: PlayerAction, n: usize) -> Vec<Box<dyn Decider>> {
    (0..n)
        .map(|_| {
            Box::new(move |_: &GameState, _: usize| Some(action)) as Box<dyn Decider>
        })
        .collect()
}

/// Event sink whose contents stay readable after the engine takes it.
#[derive(Clone, Default)]
pub struct SharedLog(pub Arc<Mutex<Vec<HandEvent>>>);

impl SharedLog {
    pub fn events(&self) -> Vec<HandEvent> {
        self.0.lock().unwrap().clone()
    }

    /// (player name, action, amount) of every action on the given street.
    pub fn actions_on(&self, street: &str) -> Vec<(String, ActionKind, u32)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HandEvent::Action {
                    street: s,
                    player,
                    action,
                    amount,
                    ..
                } if s.as_str() == street => Some((player.name, action, amount)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for SharedLog {
    fn emit(&mut self, event: &HandEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

pub fn fixed_table(players: usize, stack: u32, sb: u32, bb: u32) -> TableConfig {
    TableConfig {
        players,
        starting_stack: stack,
        max_rebuys: 0,
        hands: 100,
        seed: 7,
        reveal_showdown: true,
        fixed_blinds: Some(FixedBlinds {
            small_blind: sb,
            big_blind: bb,
        }),
    }
}
