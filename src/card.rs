use colored::Colorize;
use serde::Serialize;
use std::fmt;

pub const NUM_CARDS_DECK: usize = 52;
pub const RANKS_PER_SUIT: u8 = 13;

pub const ACE: u8 = 1;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Spades,
    Hearts,
}

impl Suit {
    /// Suit-major order used for card indices: clubs 0..13, diamonds 13..26,
    /// spades 26..39, hearts 39..52.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Spades, Suit::Hearts];

    pub fn color(self) -> Color {
        match self {
            Suit::Diamonds | Suit::Hearts => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
        }
    }

    fn ordinal(self) -> u8 {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Spades => 2,
            Suit::Hearts => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

/// A playing card. Identity is rank + suit; the color is derived.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub fn new(rank: u8, suit: Suit) -> Self {
        assert!(
            (ACE..=KING).contains(&rank),
            "card rank must be within 1..=13, got {}",
            rank
        );
        Self { rank, suit }
    }

    /// Inverse of [`Card::index`].
    pub fn from_index(index: u8) -> Self {
        assert!(
            (index as usize) < NUM_CARDS_DECK,
            "card index must be below 52, got {}",
            index
        );
        let suit = Suit::ALL[(index / RANKS_PER_SUIT) as usize];
        Self::new(index % RANKS_PER_SUIT + 1, suit)
    }

    pub fn index(&self) -> u8 {
        self.suit.ordinal() * RANKS_PER_SUIT + (self.rank - 1)
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn is_ace(&self) -> bool {
        self.rank == ACE
    }

    pub fn is_king(&self) -> bool {
        self.rank == KING
    }

    pub fn rank_label(&self) -> &'static str {
        match self.rank {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "10",
            JACK => "J",
            QUEEN => "Q",
            KING => "K",
            _ => unreachable!(),
        }
    }

    /// Uncoloured label such as `10♦`.
    pub fn label(&self) -> String {
        format!("{}{}", self.rank_label(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = self.label();
        match self.color() {
            Color::Red => write!(f, "{}", label.red()),
            Color::Black => write!(f, "{}", label.bold()),
        }
    }
}

/// `top` is exactly one rank above `bottom`.
pub fn are_card_ranks_sequential(bottom: Card, top: Card) -> bool {
    top.rank == bottom.rank + 1
}

pub fn are_card_colors_different(card1: Card, card2: Card) -> bool {
    card1.color() != card2.color()
}

pub fn are_card_suits_the_same(card1: Card, card2: Card) -> bool {
    card1.suit == card2.suit
}

/// Whether `top` may sit on `bottom` in a tableau column.
pub fn can_be_placed_on_top_of(bottom: Card, top: Card) -> bool {
    are_card_ranks_sequential(top, bottom) && are_card_colors_different(bottom, top)
}

/// Whether `card` may sit on `top` in a foundation (`None` = empty foundation).
pub fn can_be_built_on_foundation(top: Option<Card>, card: Card) -> bool {
    match top {
        None => card.is_ace(),
        Some(top) => are_card_suits_the_same(top, card) && are_card_ranks_sequential(top, card),
    }
}
