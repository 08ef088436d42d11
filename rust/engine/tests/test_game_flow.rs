mod helpers;

use std::sync::atomic::AtomicBool;

use helpers::{always, fixed_table, SharedLog};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rentpoker_engine::config::TableConfig;
use rentpoker_engine::decision::{Decider, PassiveDecider};
use rentpoker_engine::engine::Engine;
use rentpoker_engine::errors::GameError;
use rentpoker_engine::game::GameState;
use rentpoker_engine::logger::{HandEvent, JsonlSink, NullSink, Street};
use rentpoker_engine::player::{ActionKind, PlayerAction};

fn random_deciders(n: usize, seed: u64) -> Vec<Box<dyn Decider>> {
    (0..n)
        .map(|i| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed + i as u64);
            Box::new(move |state: &GameState, seat: usize| -> Option<PlayerAction> {
                let legal: Vec<ActionKind> = state.legal_actions(seat).iter().collect();
                let kind = *legal.choose(&mut rng)?;
                let max = state.current_max_bet();
                Some(match kind {
                    ActionKind::Bet => PlayerAction::Bet(Some(rng.random_range(0..=60))),
                    ActionKind::Raise => PlayerAction::Raise(Some(max + rng.random_range(0..=80))),
                    k => PlayerAction::from_kind(k),
                })
            }) as Box<dyn Decider>
        })
        .collect()
}

fn passive(n: usize) -> Vec<Box<dyn Decider>> {
    (0..n).map(|_| Box::new(PassiveDecider) as Box<dyn Decider>).collect()
}

fn chips_in_play(engine: &Engine) -> u64 {
    engine.state().players().iter().map(|p| p.stack as u64).sum()
}

fn chips_bought(engine: &Engine) -> u64 {
    let cfg = engine.config();
    let rebuys: u64 = engine
        .state()
        .players()
        .iter()
        .map(|p| p.rebuys_used as u64)
        .sum();
    cfg.starting_stack as u64 * (cfg.players as u64 + rebuys)
}

#[test]
fn random_play_conserves_chips_and_terminates() {
    let cfg = TableConfig {
        players: 6,
        hands: 300,
        seed: 11,
        ..TableConfig::default()
    };
    let mut engine = Engine::new(cfg, random_deciders(6, 99), Box::new(NullSink)).unwrap();
    for _ in 0..300 {
        match engine.play_hand().unwrap() {
            Some(summary) => {
                assert_eq!(summary.deltas.values().sum::<i64>(), 0);
                assert_eq!(chips_in_play(&engine), chips_bought(&engine));
            }
            None => break,
        }
    }
}

#[test]
fn ten_handed_tables_play_out() {
    let cfg = TableConfig {
        players: 10,
        hands: 50,
        seed: 5,
        ..TableConfig::default()
    };
    let mut engine = Engine::new(cfg, random_deciders(10, 1), Box::new(NullSink)).unwrap();
    let stop = AtomicBool::new(false);
    let summary = engine.run(50, &stop).unwrap();
    assert!(summary.hands_played > 0);
    assert_eq!(chips_in_play(&engine), chips_bought(&engine));
}

#[test]
fn same_seed_replays_the_same_game() {
    let run = || {
        let log = SharedLog::default();
        let cfg = TableConfig {
            players: 4,
            hands: 40,
            seed: 3,
            ..TableConfig::default()
        };
        let mut engine = Engine::new(cfg, random_deciders(4, 8), Box::new(log.clone())).unwrap();
        engine.run(40, &AtomicBool::new(false)).unwrap();
        log.events()
    };
    assert_eq!(run(), run());
}

#[test]
fn blinds_rise_with_the_hand_count() {
    let log = SharedLog::default();
    let cfg = TableConfig {
        players: 6,
        hands: 20,
        ..TableConfig::default()
    };
    let mut engine = Engine::new(cfg, passive(6), Box::new(log.clone())).unwrap();
    engine.run(5, &AtomicBool::new(false)).unwrap();
    let bbs: Vec<(u8, u32)> = log
        .events()
        .into_iter()
        .filter_map(|e| match e {
            HandEvent::StreetStart {
                street: Street::Preflop,
                stakes,
                ..
            } => Some((stakes.level, stakes.big_blind)),
            _ => None,
        })
        .collect();
    assert_eq!(bbs, vec![(1, 3), (1, 3), (2, 6), (2, 6), (3, 10)]);
}

#[test]
fn button_moves_one_seat_per_hand() {
    let mut engine = Engine::new(fixed_table(3, 300, 1, 2), passive(3), Box::new(NullSink)).unwrap();
    assert_eq!(engine.state().button(), 0);
    engine.play_hand().unwrap();
    assert_eq!(engine.state().button(), 1);
    engine.play_hand().unwrap();
    assert_eq!(engine.state().button(), 2);
    engine.play_hand().unwrap();
    assert_eq!(engine.state().button(), 0);
}

#[test]
fn busted_players_are_eliminated_without_rebuys() {
    let log = SharedLog::default();
    let mut engine = Engine::new(
        fixed_table(2, 300, 1, 3),
        always(PlayerAction::AllIn, 2),
        Box::new(log.clone()),
    )
    .unwrap();
    let summary = engine.run(100, &AtomicBool::new(false)).unwrap();
    assert!(!summary.stopped);
    assert!(summary.hands_played < 100);
    assert_eq!(summary.stacks.iter().filter(|s| s.eliminated).count(), 1);
    let leader = summary.leader.unwrap();
    assert_eq!(summary.stacks[leader - 1].stack, 600);
    let events = log.events();
    assert!(events.iter().any(|e| matches!(e, HandEvent::Eliminated { .. })));
    assert!(matches!(
        events.last(),
        Some(HandEvent::GameOver { reason }) if reason == "fewer than two players remain"
    ));
}

#[test]
fn busted_players_rebuy_while_allowed() {
    let log = SharedLog::default();
    let cfg = TableConfig {
        max_rebuys: 1,
        ..fixed_table(2, 300, 1, 3)
    };
    let mut engine = Engine::new(cfg, always(PlayerAction::AllIn, 2), Box::new(log.clone())).unwrap();
    engine.run(200, &AtomicBool::new(false)).unwrap();
    assert!(log.events().iter().any(|e| matches!(
        e,
        HandEvent::Rebuy {
            stack: 300,
            rebuys_used: 1,
            ..
        }
    )));
    assert_eq!(chips_in_play(&engine), chips_bought(&engine));
    assert!(engine.state().players().iter().all(|p| p.rebuys_used <= 1));
}

#[test]
fn stop_flag_prevents_new_hands() {
    let log = SharedLog::default();
    let mut engine = Engine::new(fixed_table(3, 300, 1, 2), passive(3), Box::new(log.clone())).unwrap();
    let summary = engine.run(10, &AtomicBool::new(true)).unwrap();
    assert!(summary.stopped);
    assert_eq!(summary.hands_played, 0);
    assert_eq!(
        log.events(),
        vec![HandEvent::GameOver {
            reason: "stop requested".into()
        }]
    );
}

#[test]
fn wrong_number_of_deciders_is_rejected() {
    let err = Engine::new(fixed_table(3, 300, 1, 2), passive(2), Box::new(NullSink))
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "Expected 3 deciders, got 2"
    );
}

#[test]
fn largest_allowed_stacks_keep_every_chip() {
    let mut engine = Engine::new(
        fixed_table(2, 2_000_000_000, 1, 3),
        always(PlayerAction::AllIn, 2),
        Box::new(NullSink),
    )
    .unwrap();
    let summary = engine.run(20, &AtomicBool::new(false)).unwrap();
    assert!(summary.hands_played >= 1);
    assert_eq!(chips_in_play(&engine), 4_000_000_000);
    assert_eq!(chips_in_play(&engine), chips_bought(&engine));
}

#[test]
fn tables_too_deep_for_one_stack_are_rejected() {
    let err = Engine::new(
        fixed_table(2, 3_000_000_000, 1, 3),
        always(PlayerAction::AllIn, 2),
        Box::new(NullSink),
    )
    .err()
    .unwrap();
    assert!(matches!(err, GameError::InvalidConfig(_)), "{err}");
}

#[test]
fn jsonl_sink_writes_one_object_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("events.jsonl");
    {
        let sink = JsonlSink::create(&path).unwrap();
        let mut engine = Engine::new(fixed_table(3, 300, 1, 2), passive(3), Box::new(sink)).unwrap();
        engine.run(2, &AtomicBool::new(false)).unwrap();
    }
    let text = std::fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records[0]["type"], "hand_start");
    assert!(records.iter().all(|r| r["ts"].is_string()));
    assert_eq!(records.last().unwrap()["type"], "game_over");
    let starts = records.iter().filter(|r| r["type"] == "hand_start").count();
    assert_eq!(starts, 2);
}
