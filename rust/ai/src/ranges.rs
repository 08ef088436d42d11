//! Preflop hand ranges and sizing grids.
//!
//! Hands are named as combos: higher rank first, then `s` (suited) or `o`
//! (offsuit); pairs carry no suffix (`AA`, `AKs`, `T9o`).

use rentpoker_engine::cards::Card;

/// Open-raise sizes, in big blinds.
pub const OPEN_SIZE_BB: [f64; 4] = [2.2, 2.5, 3.0, 3.5];
pub const THREEBET_IP_BB: [f64; 3] = [8.5, 9.5, 11.0];
pub const THREEBET_OOP_BB: [f64; 3] = [9.5, 11.0, 12.0];
pub const FOURBET_BB: [f64; 3] = [20.0, 24.0, 28.0];

const EARLY_OPEN: &[&str] = &[
    "AA", "KK", "QQ", "JJ", "TT", "99", "AKs", "AQs", "AJs", "ATs", "KQs", "KJs", "QJs", "JTs",
    "T9s", "98s", "A9s", "A8s", "AKo", "AQo", "AJo", "KQo",
];

const LATE_OPEN_EXTRA: &[&str] = &[
    "88", "77", "66", "KTs", "QTs", "J9s", "T8s", "97s", "87s", "76s", "65s", "A7s", "A6s", "A5s",
    "A4s", "A3s", "A2s", "KJo", "QJo", "JTo", "T9o", "A9o", "ATo",
];

const SB_OPEN_EXTRA: &[&str] = &[
    "88", "77", "66", "55", "KTs", "QTs", "J9s", "T9s", "98s", "87s", "76s", "A7s", "A6s", "A5s",
    "A4s", "A3s", "A2s", "KJo", "QJo", "JTo", "ATo", "A9o",
];

const THREE_BET: &[&str] = &["AA", "KK", "QQ", "JJ", "AKs", "AQs", "AKo"];

const CALL_VS_OPEN: &[&str] = &[
    "TT", "99", "88", "77", "AJs", "ATs", "A9s", "KQs", "KJs", "QJs", "JTs", "T9s", "98s", "A5s",
    "A4s", "A3s", "A2s", "AQo", "AJo", "KQo", "KJo", "QJo", "JTo",
];

const PREMIUM: &[&str] = &["AA", "KK", "QQ", "AKs", "AKo"];

/// Hands that shove over a 3-bet.
const FOUR_BET_SHOVE: &[&str] = &["AA", "KK", "AKs", "AKo"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    EarlyOpen,
    LateOpen,
    SbOpen,
    ThreeBet,
    CallVsOpen,
    Premium,
    FourBetShove,
}

impl Range {
    pub fn contains(self, combo: &str) -> bool {
        match self {
            Range::EarlyOpen => EARLY_OPEN.contains(&combo),
            Range::LateOpen => EARLY_OPEN.contains(&combo) || LATE_OPEN_EXTRA.contains(&combo),
            Range::SbOpen => EARLY_OPEN.contains(&combo) || SB_OPEN_EXTRA.contains(&combo),
            Range::ThreeBet => THREE_BET.contains(&combo),
            Range::CallVsOpen => CALL_VS_OPEN.contains(&combo),
            Range::Premium => PREMIUM.contains(&combo),
            Range::FourBetShove => FOUR_BET_SHOVE.contains(&combo),
        }
    }
}

pub fn hole_to_combo(hole: [Card; 2]) -> String {
    let (hi, lo) = if hole[0].rank >= hole[1].rank {
        (hole[0], hole[1])
    } else {
        (hole[1], hole[0])
    };
    let mut combo = String::with_capacity(3);
    combo.push(hi.rank.to_char());
    combo.push(lo.rank.to_char());
    if hi.rank != lo.rank {
        combo.push(if hi.suit == lo.suit { 's' } else { 'o' });
    }
    combo
}

/// Coarse preflop hand bucket used in situation keys.
pub fn hand_category(combo: &str) -> &'static str {
    if Range::Premium.contains(combo) {
        "premium"
    } else if Range::EarlyOpen.contains(combo) {
        "strong"
    } else if Range::LateOpen.contains(combo) || combo.ends_with('s') {
        "spec"
    } else {
        "trash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(a: &str, b: &str) -> [Card; 2] {
        [a.parse().unwrap(), b.parse().unwrap()]
    }

    #[test]
    fn combos_put_the_high_card_first() {
        assert_eq!(hole_to_combo(hole("9h", "Th")), "T9s");
        assert_eq!(hole_to_combo(hole("Kd", "Ac")), "AKo");
        assert_eq!(hole_to_combo(hole("7s", "7d")), "77");
    }

    #[test]
    fn late_range_extends_the_early_range() {
        assert!(Range::LateOpen.contains("AA"));
        assert!(Range::LateOpen.contains("65s"));
        assert!(!Range::EarlyOpen.contains("65s"));
        assert!(Range::SbOpen.contains("55"));
        assert!(!Range::LateOpen.contains("55"));
    }

    #[test]
    fn categories() {
        assert_eq!(hand_category("AKo"), "premium");
        assert_eq!(hand_category("JJ"), "strong");
        assert_eq!(hand_category("A2s"), "spec");
        assert_eq!(hand_category("32s"), "spec");
        assert_eq!(hand_category("72o"), "trash");
    }
}
