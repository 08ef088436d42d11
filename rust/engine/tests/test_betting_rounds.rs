mod helpers;

use std::sync::{Arc, Mutex};

use helpers::{always, fixed_table, scripted, SharedLog};
use rentpoker_engine::decision::Decider;
use rentpoker_engine::engine::Engine;
use rentpoker_engine::game::GameState;
use rentpoker_engine::logger::{HandEvent, LineHook};
use rentpoker_engine::player::{ActionKind, PlayerAction};
use rentpoker_engine::rules::LegalActions;

#[test]
fn heads_up_limp_and_check_down() {
    let log = SharedLog::default();
    // seat 1 is the small blind with the button on seat 0
    let deciders = scripted(vec![
        vec![PlayerAction::Check],
        vec![PlayerAction::Call, PlayerAction::Check],
    ]);
    let mut engine = Engine::new(fixed_table(2, 300, 1, 3), deciders, Box::new(log.clone())).unwrap();
    let summary = engine.play_hand().unwrap().unwrap();

    assert_eq!(
        log.actions_on("PREFLOP"),
        vec![
            ("Player2".to_string(), ActionKind::Call, 2),
            ("Player1".to_string(), ActionKind::Check, 0),
        ]
    );
    let flop = log.actions_on("FLOP");
    assert_eq!(flop.len(), 2);
    assert_eq!(flop[0].0, "Player2");
    assert!(flop.iter().all(|a| a.1 == ActionKind::Check));
    assert!(summary.showdown);
    assert_eq!(summary.deltas.values().sum::<i64>(), 0);
    let stacks: u32 = engine.state().players().iter().map(|p| p.stack).sum();
    assert_eq!(stacks, 600);
}

#[test]
fn fold_to_the_big_blind_ends_the_hand() {
    let log = SharedLog::default();
    let deciders = scripted(vec![vec![], vec![PlayerAction::Fold]]);
    let mut engine = Engine::new(fixed_table(2, 300, 1, 3), deciders, Box::new(log.clone())).unwrap();
    let summary = engine.play_hand().unwrap().unwrap();
    assert!(!summary.showdown);
    assert_eq!(summary.delta(1), 1);
    assert_eq!(summary.delta(2), -1);
    assert!(log
        .events()
        .iter()
        .any(|e| matches!(e, HandEvent::UncontestedWin { amount: 4, .. })));
}

#[test]
fn short_all_in_does_not_reopen_the_action() {
    let log = SharedLog::default();
    // button seat 0, SB seat 1, BB seat 2 (130 chips)
    let deciders = scripted(vec![
        vec![PlayerAction::Raise(Some(100)), PlayerAction::Raise(Some(400))],
        vec![PlayerAction::Call, PlayerAction::Raise(Some(500))],
        vec![PlayerAction::AllIn],
    ]);
    let mut engine = Engine::new(fixed_table(3, 1000, 10, 20), deciders, Box::new(log.clone())).unwrap();
    engine.players_mut()[2].stack = 130;
    engine.play_hand().unwrap().unwrap();

    assert_eq!(
        log.actions_on("PREFLOP"),
        vec![
            ("Player1".to_string(), ActionKind::Raise, 100),
            ("Player2".to_string(), ActionKind::Call, 90),
            ("Player3".to_string(), ActionKind::AllIn, 110),
            ("Player1".to_string(), ActionKind::Call, 30),
            ("Player2".to_string(), ActionKind::Call, 30),
        ]
    );
}

#[test]
fn players_facing_a_short_all_in_may_only_call_or_fold() {
    let seen: Arc<Mutex<Vec<LegalActions>>> = Arc::default();
    let record = seen.clone();
    let mut turns = 0;
    let opener = move |state: &GameState, seat: usize| {
        turns += 1;
        if turns == 1 {
            Some(PlayerAction::Raise(Some(100)))
        } else {
            record.lock().unwrap().push(state.legal_actions(seat));
            Some(PlayerAction::Call)
        }
    };
    let deciders: Vec<Box<dyn Decider>> = vec![
        Box::new(opener),
        Box::new(|_: &GameState, _: usize| Some(PlayerAction::Call)),
        Box::new(|_: &GameState, _: usize| Some(PlayerAction::AllIn)),
    ];
    let mut engine = Engine::new(fixed_table(3, 1000, 10, 20), deciders, Box::new(SharedLog::default())).unwrap();
    engine.players_mut()[2].stack = 130;
    engine.play_hand().unwrap().unwrap();

    let first = seen.lock().unwrap()[0];
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        vec![ActionKind::Fold, ActionKind::Call]
    );
}

#[test]
fn full_raise_reopens_the_action() {
    let log = SharedLog::default();
    // UTG opens, SB re-raises a full increment, UTG gets to act again
    let deciders = scripted(vec![
        vec![PlayerAction::Raise(Some(60)), PlayerAction::Call],
        vec![PlayerAction::Raise(Some(200))],
        vec![PlayerAction::Fold],
    ]);
    let mut engine = Engine::new(fixed_table(3, 1000, 10, 20), deciders, Box::new(log.clone())).unwrap();
    engine.play_hand().unwrap().unwrap();
    let pre = log.actions_on("PREFLOP");
    assert_eq!(pre[1], ("Player2".to_string(), ActionKind::Raise, 190));
    assert_eq!(pre[3], ("Player1".to_string(), ActionKind::Call, 140));
}

#[test]
fn illegal_decisions_fall_back_to_check_or_call() {
    let log = SharedLog::default();
    // everyone tries to check; owing chips turns the check into a call
    let mut engine = Engine::new(fixed_table(4, 300, 1, 3), always(PlayerAction::Check, 4), Box::new(log.clone())).unwrap();
    engine.play_hand().unwrap().unwrap();
    let pre = log.actions_on("PREFLOP");
    let kinds: Vec<ActionKind> = pre.iter().map(|a| a.1).collect();
    assert_eq!(
        kinds,
        vec![ActionKind::Call, ActionKind::Call, ActionKind::Call, ActionKind::Check]
    );
    assert_eq!(log.actions_on("RIVER").len(), 4);
}

#[test]
fn undersized_bets_are_clamped_to_the_minimum() {
    let log = SharedLog::default();
    let deciders = scripted(vec![
        vec![PlayerAction::Check, PlayerAction::Call],
        vec![PlayerAction::Call, PlayerAction::Bet(Some(1))],
    ]);
    let mut engine = Engine::new(fixed_table(2, 300, 1, 3), deciders, Box::new(log.clone())).unwrap();
    engine.play_hand().unwrap().unwrap();
    let flop = log.actions_on("FLOP");
    assert_eq!(flop[0], ("Player2".to_string(), ActionKind::Bet, 3));
    assert_eq!(flop[1], ("Player1".to_string(), ActionKind::Call, 3));
}

#[test]
fn text_lines_keep_their_layout() {
    let lines: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = {
        let lines = lines.clone();
        LineHook::new(move |l: &str| lines.lock().unwrap().push(l.to_string()))
    };
    let deciders = scripted(vec![vec![PlayerAction::Check], vec![PlayerAction::Call]]);
    let mut engine = Engine::new(fixed_table(2, 300, 1, 3), deciders, Box::new(sink)).unwrap();
    engine.play_hand().unwrap().unwrap();
    let lines = lines.lock().unwrap();
    assert_eq!(lines[0], "============ HAND 1 START ============");
    assert_eq!(lines[1], "[H1] PREFLOP  (BTN seat=0)  [Level 1  SB=1 BB=3]");
    assert_eq!(lines[2], "[H1 PREFLOP] Player2 posts blind 1  (stack 299)");
    assert_eq!(lines[3], "[H1 PREFLOP] Player1 posts blind 3  (stack 297)");
    assert_eq!(lines[4], "[H1 PREFLOP] Player2 call 2 | pot≈6 max=3 stack=297");
    assert!(lines[6].starts_with("[H1] FLOP  Board: "));
    assert!(lines.iter().any(|l| l == "Showdown:"));
    assert!(lines.iter().any(|l| l.starts_with("-> Pot#1 6 awarded to ")));
    assert!(lines
        .last()
        .unwrap()
        .starts_with("Stacks: Player1:"));
}
