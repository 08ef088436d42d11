use serde::{Deserialize, Serialize};

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

/// Totally ordered score of a five-card hand.
/// Derived ordering compares the category first, then `kickers` left to right.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks, zero padded
    pub kickers: [u8; 5],
}

/// Best five-card selection out of a larger set.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BestHand {
    pub strength: HandStrength,
    pub cards: [Card; 5],
}

pub fn evaluate_five(cards: &[Card; 5]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = straight_high_from_mask(rank_mask);

    // (count, rank) groups, larger groups first, higher ranks first within a size
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let mut desc: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    desc.sort_unstable_by(|a, b| b.cmp(a));

    let strength = |category, ks: &[u8]| {
        let mut kickers = [0u8; 5];
        kickers[..ks.len()].copy_from_slice(ks);
        HandStrength { category, kickers }
    };

    if let (true, Some(high)) = (is_flush, straight) {
        return strength(Category::StraightFlush, &[high]);
    }
    match (groups[0].0, groups.get(1).map(|g| g.0)) {
        (4, _) => return strength(Category::FourOfAKind, &[groups[0].1, groups[1].1]),
        (3, Some(2)) => return strength(Category::FullHouse, &[groups[0].1, groups[1].1]),
        _ => {}
    }
    if is_flush {
        return strength(Category::Flush, &desc);
    }
    if let Some(high) = straight {
        return strength(Category::Straight, &[high]);
    }
    let ranks: Vec<u8> = groups.iter().map(|g| g.1).collect();
    match (groups[0].0, groups[1].0) {
        (3, _) => strength(Category::ThreeOfAKind, &ranks),
        (2, 2) => strength(Category::TwoPair, &ranks),
        (2, _) => strength(Category::OnePair, &ranks),
        _ => strength(Category::HighCard, &desc),
    }
}

/// Maximum over every five-card subset of `cards` (normally 5 to 7 cards).
/// Returns `None` when fewer than five cards are supplied.
pub fn best_hand(cards: &[Card]) -> Option<BestHand> {
    let n = cards.len();
    if n < 5 {
        return None;
    }
    let mut best: Option<BestHand> = None;
    let mut idx = [0usize, 1, 2, 3, 4];
    loop {
        let five = idx.map(|i| cards[i]);
        let strength = evaluate_five(&five);
        if best.is_none_or(|b| strength > b.strength) {
            best = Some(BestHand {
                strength,
                cards: five,
            });
        }
        // advance to the next lexicographic 5-combination
        let mut i = 5;
        while i > 0 && idx[i - 1] == n - 5 + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return best;
        }
        idx[i - 1] += 1;
        for j in i..5 {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// High card of the best straight in a rank bitmask (bit `r` set for rank `r`).
/// An ace also plays low, so the wheel reports 5.
pub fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    (5..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        (m & window) == window
    })
}
