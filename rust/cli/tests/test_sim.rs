use rentpoker_cli::run;
use serial_test::serial;
use std::fs;

fn clear_env() {
    for key in [
        "RENTPOKER_CONFIG",
        "RENTPOKER_SEED",
        "RENTPOKER_PLAYERS",
        "RENTPOKER_STACK",
        "RENTPOKER_REBUYS",
        "RENTPOKER_HANDS",
        "RENTPOKER_AGENT",
        "RENTPOKER_SIM_BREAK_AFTER",
    ] {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn sim(args: &[&str]) -> (i32, String, String) {
    let mut argv = vec!["rentpoker", "sim"];
    argv.extend_from_slice(args);
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
#[serial]
fn sim_prints_hand_log_and_summary() {
    clear_env();
    let (code, stdout, stderr) = sim(&["--players", "4", "--hands", "5", "--seed", "1"]);
    assert_eq!(code, 0, "stderr={}", stderr);
    assert!(stdout.contains("[H1 PREFLOP]"));
    assert!(stdout.contains("Game ends: "));
    assert!(stdout.contains("Hands played: "));
    assert!(stdout.contains("Leader: Player"));
    assert_eq!(stdout.lines().filter(|l| l.starts_with("  Player") && l.contains("  rebuys ")).count(), 4);
}

#[test]
#[serial]
fn quiet_sim_prints_only_the_summary() {
    clear_env();
    let (code, stdout, _) = sim(&["--players", "3", "--hands", "20", "--quiet"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("[H1 PREFLOP]"));
    assert!(stdout.starts_with("Hands played: "));
}

#[test]
#[serial]
fn same_seed_same_output() {
    clear_env();
    let args = ["--players", "5", "--hands", "30", "--seed", "77", "--quiet"];
    let (_, a, _) = sim(&args);
    let (_, b, _) = sim(&args);
    assert_eq!(a, b);
}

#[test]
#[serial]
fn events_file_gets_one_json_object_per_line() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("events.jsonl");
    let path_str = path.to_string_lossy().into_owned();
    let (code, _, stderr) = sim(&[
        "--players", "3", "--hands", "10", "--quiet", "--events", &path_str,
    ]);
    assert_eq!(code, 0, "stderr={}", stderr);

    let contents = fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(records.iter().all(|r| r["ts"].is_string()));
    assert_eq!(records.first().unwrap()["type"], "hand_start");
    assert_eq!(records.last().unwrap()["type"], "game_over");
}

#[test]
#[serial]
fn policies_round_trip_through_files() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("run1.json");
    let second = dir.path().join("nested").join("run2.json");
    let first_str = first.to_string_lossy().into_owned();
    let second_str = second.to_string_lossy().into_owned();

    let (code, _, stderr) = sim(&[
        "--players", "3", "--hands", "40", "--seed", "5", "--quiet", "--policy-out", &first_str,
    ]);
    assert_eq!(code, 0, "stderr={}", stderr);
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
    let players = saved["players"].as_object().unwrap();
    assert_eq!(players.len(), 3);
    let learned = players["1"]["meta"]["hands_learned"].as_u64().unwrap();
    assert!(learned > 0);
    assert!(players["1"]["meta"]["persona"]["style"].is_string());
    assert!(!players["1"]["table"].as_object().unwrap().is_empty());

    let (code, _, stderr) = sim(&[
        "--players", "3", "--hands", "40", "--seed", "6", "--quiet", "--policy-in", &first_str,
        "--policy-out", &second_str,
    ]);
    assert_eq!(code, 0, "stderr={}", stderr);
    let resumed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&second).unwrap()).unwrap();
    let meta = &resumed["players"]["1"]["meta"];
    assert!(meta["hands_learned"].as_u64().unwrap() > learned);
    assert_eq!(meta["source"].as_str(), Some(first_str.as_str()));
    assert_eq!(meta["persona"], players["1"]["meta"]["persona"]);
}

#[test]
#[serial]
fn a_bare_table_warm_starts_every_seat() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bare.json");
    fs::write(&input, r#"{"P|BB|trash|unopen|deep|zero|N3-4|check": {"n": 12, "q": 0.4}}"#).unwrap();
    let output = dir.path().join("out.json");
    let (code, _, stderr) = sim(&[
        "--players", "3", "--hands", "5", "--quiet",
        "--policy-in", input.to_str().unwrap(),
        "--policy-out", output.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr={}", stderr);
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    for id in ["1", "2", "3"] {
        let entry = &saved["players"][id]["table"]["P|BB|trash|unopen|deep|zero|N3-4|check"];
        assert!(entry["n"].as_u64().unwrap() >= 12, "player {}", id);
    }
}

#[test]
#[serial]
fn missing_policy_file_is_an_error() {
    clear_env();
    let (code, _, stderr) = sim(&["--hands", "1", "--policy-in", "/nonexistent/policy.json"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid input: cannot load policy /nonexistent/policy.json"));
    assert_eq!(stderr.matches("cannot load policy").count(), 1, "stderr={}", stderr);
}

#[test]
#[serial]
fn unwritable_event_log_is_reported_once() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let path = blocker.join("events.jsonl");
    let (code, _, stderr) = sim(&[
        "--players", "2", "--hands", "1", "--quiet", "--events", path.to_str().unwrap(),
    ]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid input: cannot create event log"));
    assert_eq!(stderr.matches("Error:").count(), 1, "stderr={}", stderr);
}

#[test]
#[serial]
fn heuristic_agents_warn_about_policy_files() {
    clear_env();
    let (code, _, stderr) = sim(&[
        "--players", "2", "--hands", "3", "--quiet", "--agent", "heuristic", "--policy-out",
        "/nonexistent/never-written.json",
    ]);
    assert_eq!(code, 0);
    assert!(stderr.contains("WARNING: heuristic agents do not learn"));
}

#[test]
#[serial]
fn invalid_arguments_exit_with_2() {
    clear_env();
    let (code, _, stderr) = sim(&["--players", "1"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Configuration error"));
    assert_eq!(stderr.lines().filter(|l| l.starts_with("Error:")).count(), 1);

    let (code, _, stderr) = sim(&["--agent", "random"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown agent type"));
}

#[test]
#[serial]
fn break_after_stops_between_hands() {
    clear_env();
    unsafe {
        std::env::set_var("RENTPOKER_SIM_BREAK_AFTER", "3");
    }
    let (code, stdout, _) = sim(&["--players", "4", "--hands", "50", "--quiet"]);
    clear_env();
    assert_eq!(code, 130);
    assert!(stdout.contains("Hands played: 3"));
    assert!(stdout.contains("Interrupted: stopped after 3/50 hands"));
}
