use crate::card::{Card, NUM_CARDS_DECK};
use arrayvec::ArrayVec;
use derivative::Derivative;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const NUM_FOUNDATIONS: usize = 4;
pub const NUM_COLUMNS: usize = 7;

/// What a pile is used for. Decides how its cards are shown and which
/// rules apply to it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize)]
pub enum Role {
    Stock,
    Waste,
    Foundation,
    TableauHidden,
    TableauRevealed,
    Transfer,
}

/// Addressable piles of the table. Declaration order is the tie-break order
/// used when resolving drop targets.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PileId {
    Stock,
    Waste,
    Foundation(u8),
    Column(u8),
}

impl PileId {
    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::Stock, PileId::Waste]
            .into_iter()
            .chain((0..NUM_FOUNDATIONS as u8).map(PileId::Foundation))
            .chain((0..NUM_COLUMNS as u8).map(PileId::Column))
    }

    pub fn is_column(&self) -> bool {
        matches!(self, PileId::Column(_))
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PileId::Stock => write!(f, "stock"),
            PileId::Waste => write!(f, "waste"),
            PileId::Foundation(idx) => write!(f, "f{}", idx + 1),
            PileId::Column(idx) => write!(f, "c{}", idx + 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePileIdError(String);

impl fmt::Display for ParsePileIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown pile `{}` (expected stock, waste, f1..f4 or c1..c7)",
            self.0
        )
    }
}

impl std::error::Error for ParsePileIdError {}

impl FromStr for PileId {
    type Err = ParsePileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let numbered = |rest: &str, limit: usize| {
            rest.parse::<usize>()
                .ok()
                .filter(|n| (1..=limit).contains(n))
                .map(|n| (n - 1) as u8)
        };
        let parsed = match lowered.as_str() {
            "s" | "stock" => Some(PileId::Stock),
            "w" | "waste" => Some(PileId::Waste),
            other => {
                if let Some(rest) = other.strip_prefix('f') {
                    numbered(rest, NUM_FOUNDATIONS).map(PileId::Foundation)
                } else if let Some(rest) = other.strip_prefix('c') {
                    numbered(rest, NUM_COLUMNS).map(PileId::Column)
                } else {
                    None
                }
            }
        };
        parsed.ok_or_else(|| ParsePileIdError(s.to_string()))
    }
}

/// Ordered cards, bottom to top.
#[derive(Clone, Derivative, PartialEq, Eq, Hash)]
#[derivative(Debug, Default)]
pub struct Pile {
    #[derivative(Default(value = "Role::Transfer"))]
    role: Role,
    #[derivative(Debug(format_with = "fmt_cards"))]
    cards: ArrayVec<Card, NUM_CARDS_DECK>,
}

fn fmt_cards(cards: &ArrayVec<Card, NUM_CARDS_DECK>, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_list()
        .entries(cards.iter().map(|card| card.label()))
        .finish()
}

impl Pile {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            cards: ArrayVec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn bottom(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Appends `cards` in order, keeping their relative order.
    pub fn extend_from_slice(&mut self, cards: &[Card]) {
        self.cards.extend(cards.iter().copied());
    }

    /// Moves every card of `other` onto this pile, leaving `other` empty.
    pub fn append(&mut self, other: &mut Pile) {
        self.cards.extend(other.cards.drain(..));
    }

    /// Removes the run from `start` to the top.
    pub fn split_off(&mut self, start: usize) -> Vec<Card> {
        assert!(
            start <= self.cards.len(),
            "split index {} past the top of a {} card pile",
            start,
            self.cards.len()
        );
        self.cards.drain(start..).collect()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
