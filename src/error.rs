use crate::pile::PileId;
use std::fmt;

/// Why a pick-up or drop request could not be carried out. No pile is
/// changed when one of these is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The stock is drawn from, not picked up from.
    StockNotLiftable,
    EmptyPile(PileId),
    IndexOutOfRange { pile: PileId, index: usize, len: usize },
    /// The index points into the face-down part of a column.
    FaceDown { pile: PileId, index: usize },
    /// Waste and foundations only give up their top card.
    NotTopCard { pile: PileId, index: usize },
    /// Cards from an earlier pick-up are still held.
    AlreadyHolding(PileId),
    NothingHeld,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::StockNotLiftable => write!(f, "cards cannot be picked up from the stock"),
            MoveError::EmptyPile(pile) => write!(f, "{} is empty", pile),
            MoveError::IndexOutOfRange { pile, index, len } => {
                write!(f, "{} has {} cards, no card at index {}", pile, len, index)
            }
            MoveError::FaceDown { pile, index } => {
                write!(f, "card {} of {} is face down", index, pile)
            }
            MoveError::NotTopCard { pile, index } => {
                write!(f, "only the top card of {} can be picked up, not {}", pile, index)
            }
            MoveError::AlreadyHolding(origin) => {
                write!(f, "already holding cards picked up from {}", origin)
            }
            MoveError::NothingHeld => write!(f, "no cards are being held"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Why a drop sent the held cards back to where they came from. This is a
/// normal game outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The drop did not land on any pile.
    NoTarget,
    SamePile,
    /// Stock and waste never accept dropped cards.
    NotADropTarget,
    FoundationTakesOneCard,
    FoundationNeedsAce,
    FoundationOutOfSequence,
    ColumnNeedsKing,
    ColumnOutOfSequence,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            RejectReason::NoTarget => "dropped outside every pile",
            RejectReason::SamePile => "dropped back on its own pile",
            RejectReason::NotADropTarget => "cards cannot be dropped there",
            RejectReason::FoundationTakesOneCard => "foundations take one card at a time",
            RejectReason::FoundationNeedsAce => "an empty foundation only takes an ace",
            RejectReason::FoundationOutOfSequence => "foundations build up by suit",
            RejectReason::ColumnNeedsKing => "an empty column only takes a king",
            RejectReason::ColumnOutOfSequence => {
                "columns build down in alternating colors"
            }
        };
        f.write_str(text)
    }
}
