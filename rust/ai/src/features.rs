//! Postflop hand features: made-hand class and draws.

use rentpoker_engine::cards::Card;
use rentpoker_engine::hand::Category;

/// Rank bitmask with the ace also set as rank 1.
fn rank_mask(cards: &[Card]) -> u16 {
    let mut mask = 0u16;
    for c in cards {
        let r = c.rank.value();
        mask |= 1 << r;
        if r == 14 {
            mask |= 1 << 1;
        }
    }
    mask
}

/// Four or more cards of one suit.
pub fn has_flush_draw(cards: &[Card]) -> bool {
    let mut counts = [0u8; 4];
    for c in cards {
        counts[c.suit.index()] += 1;
    }
    counts.iter().any(|&n| n >= 4)
}

/// Four consecutive ranks anywhere, ace counting high and low.
pub fn has_open_ended(cards: &[Card]) -> bool {
    let mask = rank_mask(cards);
    (1..=11u8).any(|lo| {
        let run = 0b1111u16 << lo;
        mask & run == run
    })
}

/// Some five-rank straight window holds exactly four of our ranks.
pub fn has_gutshot(cards: &[Card]) -> bool {
    let mask = rank_mask(cards);
    (5..=14u8).any(|hi| {
        let window = 0b11111u16 << (hi - 4);
        (mask & window).count_ones() == 4
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Draws {
    pub flush: bool,
    pub open_ended: bool,
    pub gutshot: bool,
}

impl Draws {
    pub fn detect(cards: &[Card]) -> Self {
        Self {
            flush: has_flush_draw(cards),
            open_ended: has_open_ended(cards),
            gutshot: has_gutshot(cards),
        }
    }

    pub fn count(&self) -> usize {
        [self.flush, self.open_ended, self.gutshot]
            .iter()
            .filter(|&&d| d)
            .count()
    }

    pub fn is_strong(&self) -> bool {
        self.count() >= 2
    }

    pub fn any(&self) -> bool {
        self.count() >= 1
    }

    /// `F`, `O`, `G` letters for the draws present, or `N` for none.
    pub fn letters(&self) -> String {
        let mut s = String::new();
        if self.flush {
            s.push('F');
        }
        if self.open_ended {
            s.push('O');
        }
        if self.gutshot {
            s.push('G');
        }
        if s.is_empty() {
            s.push('N');
        }
        s
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MadeClass {
    /// Full house or better
    Monster,
    /// Trips, straight or flush
    VeryGood,
    /// One or two pair
    Medium,
    Air,
}

impl MadeClass {
    pub fn from_category(category: Category) -> Self {
        match category {
            Category::FullHouse | Category::FourOfAKind | Category::StraightFlush => {
                MadeClass::Monster
            }
            Category::ThreeOfAKind | Category::Straight | Category::Flush => MadeClass::VeryGood,
            Category::OnePair | Category::TwoPair => MadeClass::Medium,
            Category::HighCard => MadeClass::Air,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MadeClass::Monster => "monster",
            MadeClass::VeryGood => "very",
            MadeClass::Medium => "mid",
            MadeClass::Air => "air",
        }
    }
}
