//! Bandit-style policy table.
//!
//! Values are keyed by `"{situation}|{option}"`. Selection is epsilon-greedy
//! with a preference for options tried fewer than [`COLD_VISITS`] times, then
//! an optimistic argmax that gives the proposer's seed option a small bonus.
//! Updates are exponential moving averages of the stack change per big blind.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rand::seq::IndexedRandom;
use rand::Rng;
use rentpoker_engine::player::{Persona, PlayerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EPSILON: f64 = 0.06;
pub const ALPHA: f64 = 0.22;
/// Score bonus for the proposer's seed option.
pub const SEED_BONUS: f64 = 0.06;
/// Optimism term `OPTIMISM / (n + 1)` added to every value.
pub const OPTIMISM: f64 = 0.1;
/// Options seen fewer times than this are cold.
pub const COLD_VISITS: u32 = 3;
/// Cold options are explored with probability `EPSILON * COLD_EXPLORATION_FACTOR`.
pub const COLD_EXPLORATION_FACTOR: f64 = 2.0;
/// Per-hand rewards are clamped to +/- this many big blinds.
pub const REWARD_CLAMP: f64 = 50.0;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("policy JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStats {
    pub n: u32,
    pub q: f64,
}

/// A decision this agent made during the current hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub player: PlayerId,
    pub situation: String,
    pub option: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyMeta {
    pub player_id: PlayerId,
    pub persona: Option<Persona>,
    /// Hands this table has learned from, across all runs
    pub hands_learned: u64,
    pub saved_at: Option<String>,
    /// File the table was first loaded from
    pub source: Option<String>,
}

pub type PolicyTable = BTreeMap<String, ActionStats>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub meta: PolicyMeta,
    pub table: PolicyTable,
}

/// Accepts both the `{meta, table}` layout and a bare table.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Full(PolicySnapshot),
    Bare(PolicyTable),
}

impl PolicySnapshot {
    pub fn from_json(text: &str) -> Result<Self, PolicyError> {
        Ok(match serde_json::from_str(text)? {
            SnapshotFile::Full(s) => s,
            SnapshotFile::Bare(table) => PolicySnapshot {
                meta: PolicyMeta::default(),
                table,
            },
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(match serde_json::from_reader(reader)? {
            SnapshotFile::Full(s) => s,
            SnapshotFile::Bare(table) => PolicySnapshot {
                meta: PolicyMeta::default(),
                table,
            },
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PolicyError> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self)?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyLearner {
    meta: PolicyMeta,
    table: PolicyTable,
}

impl PolicyLearner {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            meta: PolicyMeta {
                player_id,
                ..PolicyMeta::default()
            },
            table: PolicyTable::new(),
        }
    }

    pub fn from_snapshot(snapshot: PolicySnapshot) -> Self {
        Self {
            meta: snapshot.meta,
            table: snapshot.table,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.meta.player_id
    }

    pub fn meta(&self) -> &PolicyMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut PolicyMeta {
        &mut self.meta
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn key(situation: &str, option: &str) -> String {
        format!("{}|{}", situation, option)
    }

    pub fn stats(&self, situation: &str, option: &str) -> ActionStats {
        self.table
            .get(&Self::key(situation, option))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_stats(&mut self, situation: &str, option: &str, stats: ActionStats) {
        self.table.insert(Self::key(situation, option), stats);
    }

    /// Copies every entry of `other` into this table, replacing entries
    /// with the same key.
    pub fn merge(&mut self, other: &PolicyTable) {
        self.table
            .extend(other.iter().map(|(k, v)| (k.clone(), *v)));
    }

    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            meta: self.meta.clone(),
            table: self.table.clone(),
        }
    }

    /// Picks one of `options` for `situation`, or `None` when there are none.
    pub fn suggest<'o, R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        situation: &str,
        options: &'o [String],
        seed: Option<&str>,
    ) -> Option<&'o str> {
        if options.is_empty() {
            return None;
        }
        let cold: Vec<&String> = options
            .iter()
            .filter(|o| self.stats(situation, o).n < COLD_VISITS)
            .collect();
        if !cold.is_empty() && rng.random::<f64>() < EPSILON * COLD_EXPLORATION_FACTOR {
            return cold.choose(rng).map(|o| o.as_str());
        }
        if rng.random::<f64>() < EPSILON {
            return options.choose(rng).map(|o| o.as_str());
        }

        let mut best: Option<(&str, f64)> = None;
        for o in options {
            let st = self.stats(situation, o);
            let mut score = st.q + OPTIMISM / (st.n as f64 + 1.0);
            if seed == Some(o.as_str()) {
                score += SEED_BONUS;
            }
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((o.as_str(), score));
            }
        }
        best.map(|(o, _)| o)
    }

    /// Moves each traced value toward this player's reward for the hand.
    ///
    /// The reward is the stack change divided by `scale_unit` (the big blind,
    /// at least 1) and clamped to +/- [`REWARD_CLAMP`]. Traces of other
    /// players are ignored.
    pub fn update(
        &mut self,
        traces: &[DecisionTrace],
        rewards: &BTreeMap<PlayerId, i64>,
        scale_unit: u32,
    ) {
        let player = self.meta.player_id;
        let raw = rewards.get(&player).copied().unwrap_or(0);
        let r = (raw as f64 / scale_unit.max(1) as f64).clamp(-REWARD_CLAMP, REWARD_CLAMP);
        for tr in traces.iter().filter(|t| t.player == player) {
            let st = self
                .table
                .entry(Self::key(&tr.situation, &tr.option))
                .or_default();
            st.n += 1;
            st.q += ALPHA * (r - st.q);
        }
    }

    pub fn record_hand(&mut self) {
        self.meta.hands_learned += 1;
    }
}
