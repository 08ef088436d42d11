//! Hand events and the sinks that consume them.
//!
//! The engine reports progress only through [`EventSink::emit`]. Each event
//! is a tagged [`HandEvent`]; [`TextLog`] renders the stable one-line text
//! format that log tailers parse, [`JsonlSink`] writes one JSON object per
//! event.

use std::fmt;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::blinds::Stakes;
use crate::cards::{format_cards, Card};
use crate::hand::Category;
use crate::player::{ActionKind, Player, PlayerId};

/// Betting street of a hold'em hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub fn as_str(self) -> &'static str {
        match self {
            Street::Preflop => "PREFLOP",
            Street::Flop => "FLOP",
            Street::Turn => "TURN",
            Street::River => "RIVER",
        }
    }

    /// Community cards visible once this street is dealt.
    pub fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

impl From<&Player> for PlayerRef {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackLine {
    pub id: PlayerId,
    pub name: String,
    pub stack: u32,
    pub rebuys_used: u32,
    pub eliminated: bool,
}

impl From<&Player> for StackLine {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            stack: p.stack,
            rebuys_used: p.rebuys_used,
            eliminated: p.eliminated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandEvent {
    HandStart {
        hand_id: u64,
        button: usize,
    },
    Rebuy {
        player: PlayerRef,
        stack: u32,
        rebuys_used: u32,
    },
    Eliminated {
        player: PlayerRef,
    },
    StreetStart {
        hand_id: u64,
        street: Street,
        board: Vec<Card>,
        button: usize,
        stakes: Stakes,
    },
    BlindPost {
        hand_id: u64,
        player: PlayerRef,
        amount: u32,
        stack: u32,
    },
    Action {
        hand_id: u64,
        street: Street,
        player: PlayerRef,
        action: ActionKind,
        /// Chips moved by this action
        amount: u32,
        /// Street total after a bet or raise
        to_total: Option<u32>,
        pot: u64,
        max_bet: u32,
        stack: u32,
    },
    ShowdownStart {
        hand_id: u64,
    },
    ShowdownReveal {
        hand_id: u64,
        player: PlayerRef,
        hole: [Card; 2],
        category: Category,
        best_five: [Card; 5],
    },
    PotAward {
        hand_id: u64,
        pot_index: usize,
        amount: u64,
        winners: Vec<PlayerRef>,
    },
    UncontestedWin {
        hand_id: u64,
        player: PlayerRef,
        amount: u64,
    },
    StackSummary {
        hand_id: u64,
        stacks: Vec<StackLine>,
    },
    GameOver {
        reason: String,
    },
}

impl fmt::Display for HandEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandEvent::HandStart { hand_id, .. } => {
                write!(f, "{} HAND {} START {}", "=".repeat(12), hand_id, "=".repeat(12))
            }
            HandEvent::Rebuy {
                player,
                stack,
                rebuys_used,
            } => write!(f, "{} rebuys for {} (R{})", player.name, stack, rebuys_used),
            HandEvent::Eliminated { player } => write!(f, "{} is eliminated", player.name),
            HandEvent::StreetStart {
                hand_id,
                street: Street::Preflop,
                button,
                stakes,
                ..
            } => write!(
                f,
                "[H{}] PREFLOP  (BTN seat={})  [Level {}  SB={} BB={}]",
                hand_id, button, stakes.level, stakes.small_blind, stakes.big_blind
            ),
            HandEvent::StreetStart {
                hand_id,
                street,
                board,
                ..
            } => write!(f, "[H{}] {}  Board: {}", hand_id, street, format_cards(board)),
            HandEvent::BlindPost {
                hand_id,
                player,
                amount,
                stack,
            } => write!(
                f,
                "[H{} PREFLOP] {} posts blind {}  (stack {})",
                hand_id, player.name, amount, stack
            ),
            HandEvent::Action {
                hand_id,
                street,
                player,
                action,
                amount,
                to_total,
                pot,
                max_bet,
                stack,
            } => {
                let amt = if *amount == 0 {
                    String::new()
                } else {
                    amount.to_string()
                };
                let extra = to_total
                    .map(|t| format!(" ->total {}", t))
                    .unwrap_or_default();
                write!(
                    f,
                    "[H{} {}] {} {} {}{} | pot≈{} max={} stack={}",
                    hand_id, street, player.name, action, amt, extra, pot, max_bet, stack
                )
            }
            HandEvent::ShowdownStart { .. } => f.write_str("Showdown:"),
            HandEvent::ShowdownReveal {
                player,
                hole,
                category,
                best_five,
                ..
            } => write!(
                f,
                "  {}: {}  -> {} [{}]",
                player.name,
                format_cards(hole),
                category.label(),
                format_cards(best_five)
            ),
            HandEvent::PotAward {
                pot_index,
                amount,
                winners,
                ..
            } => {
                let names: Vec<&str> = winners.iter().map(|w| w.name.as_str()).collect();
                write!(
                    f,
                    "-> Pot#{} {} awarded to {}",
                    pot_index + 1,
                    amount,
                    names.join(", ")
                )
            }
            HandEvent::UncontestedWin { player, amount, .. } => {
                write!(f, "-> {} wins uncontested pot of {}", player.name, amount)
            }
            HandEvent::StackSummary { stacks, .. } => {
                let parts: Vec<String> = stacks
                    .iter()
                    .map(|s| {
                        format!(
                            "{}:{}(R{}){}",
                            s.name,
                            s.stack,
                            s.rebuys_used,
                            if s.eliminated { "X" } else { "" }
                        )
                    })
                    .collect();
                write!(f, "Stacks: {}", parts.join(" | "))
            }
            HandEvent::GameOver { reason } => write!(f, "Game ends: {}", reason),
        }
    }
}

/// Receives every event the engine produces, in order.
pub trait EventSink {
    fn emit(&mut self, event: &HandEvent);
}

/// Collects events in memory.
impl EventSink for Vec<HandEvent> {
    fn emit(&mut self, event: &HandEvent) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: &HandEvent) {
        (**self).emit(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &HandEvent) {}
}

/// Renders each event as one text line into a writer.
pub struct TextLog<W: Write> {
    writer: W,
}

impl<W: Write> TextLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for TextLog<W> {
    fn emit(&mut self, event: &HandEvent) {
        if let Err(e) = writeln!(self.writer, "{}", event) {
            tracing::warn!(error = %e, "text log write failed");
        }
    }
}

/// Adapts a plain text-line callback into a sink.
pub struct LineHook<F: FnMut(&str)> {
    hook: F,
}

impl<F: FnMut(&str)> LineHook<F> {
    pub fn new(hook: F) -> Self {
        Self { hook }
    }
}

impl<F: FnMut(&str)> EventSink for LineHook<F> {
    fn emit(&mut self, event: &HandEvent) {
        (self.hook)(&event.to_string());
    }
}

/// Forwards every event to each inner sink.
#[derive(Default)]
pub struct Tee {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Tee {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl EventSink for Tee {
    fn emit(&mut self, event: &HandEvent) {
        for s in &mut self.sinks {
            s.emit(event);
        }
    }
}

#[derive(Serialize)]
struct Stamped<'a> {
    ts: String,
    #[serde(flatten)]
    event: &'a HandEvent,
}

/// Appends events to a JSONL file, one object per line, stamped with an
/// RFC 3339 timestamp.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    pub fn write(&mut self, event: &HandEvent) -> std::io::Result<()> {
        let rec = Stamped {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            event,
        };
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        if matches!(
            event,
            HandEvent::StackSummary { .. } | HandEvent::GameOver { .. }
        ) {
            self.writer.flush()?;
        }
        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn emit(&mut self, event: &HandEvent) {
        if let Err(e) = self.write(event) {
            tracing::warn!(error = %e, "event log write failed");
        }
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p2() -> PlayerRef {
        PlayerRef {
            id: 2,
            name: "Player2".into(),
        }
    }

    #[test]
    fn text_log_writes_one_line_per_event() {
        let mut log = TextLog::new(Vec::new());
        log.emit(&HandEvent::Action {
            hand_id: 3,
            street: Street::Flop,
            player: p2(),
            action: ActionKind::Bet,
            amount: 12,
            to_total: Some(12),
            pot: 30,
            max_bet: 12,
            stack: 288,
        });
        log.emit(&HandEvent::Action {
            hand_id: 3,
            street: Street::Flop,
            player: p2(),
            action: ActionKind::Check,
            amount: 0,
            to_total: None,
            pot: 30,
            max_bet: 0,
            stack: 288,
        });
        log.emit(&HandEvent::GameOver {
            reason: "hand budget reached".into(),
        });
        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[H3 FLOP] Player2 bet 12 ->total 12 | pot≈30 max=12 stack=288",
                "[H3 FLOP] Player2 check  | pot≈30 max=0 stack=288",
                "Game ends: hand budget reached",
            ]
        );
    }

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_value(HandEvent::UncontestedWin {
            hand_id: 1,
            player: p2(),
            amount: 4,
        })
        .unwrap();
        assert_eq!(json["type"], "uncontested_win");
        assert_eq!(json["player"]["name"], "Player2");
    }
}
