use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// 1-based player identifier. Stable for the whole run.
pub type PlayerId = usize;

/// The kind of a betting action, without sizing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    #[serde(rename = "allin")]
    AllIn,
}

impl ActionKind {
    /// Action word used in text events and option keys.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "allin",
        }
    }

    pub fn is_aggressive(self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise | ActionKind::AllIn)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision returned by a decider.
/// `Bet` and `Raise` carry an optional target total for the player's bet this street.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if no bet to call)
    Check,
    /// Call the current bet
    Call,
    /// Open the betting, to the given total
    Bet(Option<u32>),
    /// Raise the current bet, to the given total
    Raise(Option<u32>),
    /// Bet all remaining chips
    AllIn,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Bet(_) => ActionKind::Bet,
            PlayerAction::Raise(_) => ActionKind::Raise,
            PlayerAction::AllIn => ActionKind::AllIn,
        }
    }

    /// Unsized action for a kind; bet and raise fall back to default sizing.
    pub fn from_kind(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Bet => PlayerAction::Bet(None),
            ActionKind::Raise => PlayerAction::Raise(None),
            ActionKind::AllIn => PlayerAction::AllIn,
        }
    }

    pub fn target_total(&self) -> Option<u32> {
        match self {
            PlayerAction::Bet(t) | PlayerAction::Raise(t) => *t,
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[serde(rename = "agg")]
    Aggressive,
    #[serde(rename = "bal")]
    Balanced,
    #[serde(rename = "con")]
    Conservative,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Aggressive => "agg",
            Style::Balanced => "bal",
            Style::Conservative => "con",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePref {
    Small,
    #[serde(rename = "bal")]
    Balanced,
    Big,
}

impl SizePref {
    pub fn as_str(self) -> &'static str {
        match self {
            SizePref::Small => "small",
            SizePref::Balanced => "bal",
            SizePref::Big => "big",
        }
    }
}

/// Fixed per-agent bias used only to seed proposals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub style: Style,
    pub size_pref: SizePref,
    pub bluff: f64,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            style: Style::Balanced,
            size_pref: SizePref::Balanced,
            bluff: 0.5,
        }
    }
}

impl Persona {
    /// Style weights agg:bal:con = 3:5:2, size weights small:bal:big = 2:5:3.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let size_pref = match rng.random_range(0..10) {
            0..=1 => SizePref::Small,
            2..=6 => SizePref::Balanced,
            _ => SizePref::Big,
        };
        let style = match rng.random_range(0..10) {
            0..=2 => Style::Aggressive,
            3..=7 => Style::Balanced,
            _ => Style::Conservative,
        };
        let base: f64 = match style {
            Style::Aggressive => 0.65,
            Style::Balanced => 0.5,
            Style::Conservative => 0.35,
        };
        let bluff = (base + rng.random_range(-0.05..=0.05)).clamp(0.0, 1.0);
        Self {
            style,
            size_pref,
            bluff,
        }
    }
}

/// A seated player. Stack and rebuy count carry over between hands;
/// the per-hand flags and hole cards are reset at hand start.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub seat: usize,
    pub stack: u32,
    pub rebuys_used: u32,
    pub folded: bool,
    pub all_in: bool,
    pub eliminated: bool,
    pub hole: Option<[Card; 2]>,
    pub persona: Persona,
}

impl Player {
    pub fn new(id: PlayerId, seat: usize, stack: u32, persona: Persona) -> Self {
        Self {
            id,
            name: format!("Player{}", id),
            seat,
            stack,
            rebuys_used: 0,
            folded: false,
            all_in: false,
            eliminated: false,
            hole: None,
            persona,
        }
    }

    /// Seated and not folded.
    pub fn in_hand(&self) -> bool {
        !self.eliminated && !self.folded
    }

    /// Still able to act this hand.
    pub fn can_act(&self) -> bool {
        self.in_hand() && !self.all_in
    }

    pub fn reset_for_hand(&mut self) {
        self.folded = false;
        self.all_in = false;
        self.hole = None;
    }
}
