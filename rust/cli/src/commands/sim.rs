//! Simulation command handler.
//!
//! Seats one agent per player, plays the hand budget and prints the final
//! stacks. Learning agents can start from a saved policy file and save what
//! they learned at the end of the run.
//!
//! # Policy files
//!
//! A policy file maps player ids to snapshots:
//!
//! ```json
//! { "players": { "1": { "meta": { ... }, "table": { ... } }, "2": ... } }
//! ```
//!
//! A single snapshot (or a bare table) is also accepted and warm-starts
//! every seat.
//!
//! # Environment Variables
//!
//! - `RENTPOKER_SIM_BREAK_AFTER`: stop after N hands (for testing)

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rentpoker_ai::agent::{lock, SharedLearner};
use rentpoker_ai::learner::{PolicyError, PolicySnapshot};
use rentpoker_ai::{create_ai, AgentKind};
use rentpoker_engine::engine::Engine;
use rentpoker_engine::logger::{EventSink, HandEvent, JsonlSink, LineHook, Tee};
use rentpoker_engine::player::{Persona, PlayerId};
use serde::{Deserialize, Serialize};

use crate::cli::SimArgs;
use crate::config::{self, Overrides};
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PolicyFile {
    players: BTreeMap<PlayerId, PolicySnapshot>,
}

enum LoadedPolicy {
    PerPlayer(BTreeMap<PlayerId, PolicySnapshot>),
    Shared(PolicySnapshot),
}

impl LoadedPolicy {
    fn for_player(&self, id: PlayerId) -> Option<&PolicySnapshot> {
        match self {
            LoadedPolicy::PerPlayer(map) => map.get(&id),
            LoadedPolicy::Shared(s) => Some(s),
        }
    }
}

fn load_policy(path: &str) -> Result<LoadedPolicy, PolicyError> {
    let text = std::fs::read_to_string(path)?;
    if let Ok(file) = serde_json::from_str::<PolicyFile>(&text) {
        return Ok(LoadedPolicy::PerPlayer(file.players));
    }
    PolicySnapshot::from_json(&text).map(LoadedPolicy::Shared)
}

fn save_policy(
    path: &Path,
    learners: &[(PlayerId, Persona, SharedLearner)],
) -> Result<(), CliError> {
    ensure_parent_dir(path)?;
    let saved_at = chrono::Utc::now().to_rfc3339();
    let mut file = PolicyFile::default();
    for (id, persona, learner) in learners {
        let mut snap = lock(learner).snapshot();
        snap.meta.player_id = *id;
        snap.meta.persona = Some(*persona);
        snap.meta.saved_at = Some(saved_at.clone());
        file.players.insert(*id, snap);
    }
    let json = serde_json::to_string_pretty(&file).map_err(PolicyError::from)?;
    std::fs::write(path, json + "\n")?;
    Ok(())
}

/// Sets the stop flag once `limit` hands have finished.
struct StopAfter {
    limit: u64,
    finished: u64,
    stop: Arc<AtomicBool>,
}

impl EventSink for StopAfter {
    fn emit(&mut self, event: &HandEvent) {
        if let HandEvent::StackSummary { .. } = event {
            self.finished += 1;
            if self.finished >= self.limit {
                self.stop.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// Handle the sim command.
///
/// # Arguments
///
/// * `args` - Parsed `sim` flags; unset flags fall back to env, file and defaults
/// * `out` - Hand log (unless `--quiet`) and the final summary
/// * `err` - Warnings; errors are returned and reported by the caller
///
/// # Returns
///
/// `Ok(())` when the run ends normally, `CliError::Interrupted` when it was
/// stopped early (policies are still saved first).
pub fn handle_sim_command(
    args: SimArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let overrides = Overrides {
        players: args.players,
        starting_stack: args.stack,
        max_rebuys: args.rebuys,
        hands: args.hands,
        seed: args.seed,
        agent: args.agent.clone(),
    };
    let cfg = config::resolve(&overrides)?.config;
    let kind = cfg.agent_kind()?;
    let table = cfg.table_config();

    let loaded = args
        .policy_in
        .as_deref()
        .map(|path| {
            load_policy(path).map_err(|e| {
                CliError::InvalidInput(format!("cannot load policy {}: {}", path, e))
            })
        })
        .transpose()?;
    if kind == AgentKind::Heuristic && (args.policy_in.is_some() || args.policy_out.is_some()) {
        ui::display_warning(err, "heuristic agents do not learn; policy files are ignored")?;
    }

    let mut persona_rng = ChaCha20Rng::seed_from_u64(table.seed);
    let mut personas = Vec::with_capacity(table.players);
    let mut deciders = Vec::with_capacity(table.players);
    let mut learners = Vec::new();
    for id in 1..=table.players {
        let mut persona = Persona::random(&mut persona_rng);
        let seat = create_ai(kind, id, table.seed);
        if let Some(learner) = seat.learner {
            if let (Some(policy), Some(path)) = (&loaded, &args.policy_in) {
                if let Some(snap) = policy.for_player(id) {
                    let mut l = lock(&learner);
                    l.merge(&snap.table);
                    l.meta_mut().hands_learned = snap.meta.hands_learned;
                    l.meta_mut().source = snap.meta.source.clone().or_else(|| Some(path.clone()));
                    if let Some(p) = snap.meta.persona {
                        persona = p;
                    }
                    tracing::debug!(player = id, entries = l.len(), "policy loaded");
                }
            }
            learners.push((id, persona, learner));
        }
        personas.push(persona);
        deciders.push(seat.decider);
    }

    let stop = Arc::new(AtomicBool::new(false));
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut sink = Tee::new();
    if !args.quiet {
        let lines = Arc::clone(&lines);
        sink = sink.with(LineHook::new(move |line: &str| {
            lines
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(line.to_string())
        }));
    }
    if let Some(path) = &args.events {
        let jsonl = JsonlSink::create(path).map_err(|e| {
            CliError::InvalidInput(format!("cannot create event log {}: {}", path, e))
        })?;
        sink = sink.with(jsonl);
    }
    if let Some(limit) = std::env::var("RENTPOKER_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        sink = sink.with(StopAfter {
            limit,
            finished: 0,
            stop: Arc::clone(&stop),
        });
    }

    tracing::info!(
        players = table.players,
        hands = table.hands,
        seed = table.seed,
        agent = %kind,
        "starting run"
    );
    let mut engine = Engine::with_personas(table.clone(), personas, deciders, Box::new(sink))?;
    let result = engine.run(table.hands, &stop);
    drop(engine);

    for line in lines
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .iter()
    {
        writeln!(out, "{}", line)?;
    }
    let summary = result?;

    if let Some(path) = &args.policy_out
        && !learners.is_empty()
    {
        save_policy(Path::new(path), &learners)?;
        tracing::info!(path = %path, players = learners.len(), "policies saved");
    }

    writeln!(out, "Hands played: {}", summary.hands_played)?;
    ui::write_stacks(out, &summary.stacks)?;
    if let Some(leader) = summary.leader
        && let Some(line) = summary.stacks.iter().find(|s| s.id == leader)
    {
        writeln!(out, "Leader: {} ({})", line.name, line.stack)?;
    }

    if summary.stopped {
        let msg = format!("stopped after {}/{} hands", summary.hands_played, table.hands);
        writeln!(out, "Interrupted: {}", msg)?;
        return Err(CliError::Interrupted(msg));
    }
    Ok(())
}
