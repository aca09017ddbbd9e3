//! Transfers between piles: picking cards up into the hand, dropping them
//! on a destination (or sending them back), and the double-click move to
//! the foundations.

use crate::card::{
    are_card_ranks_sequential, are_card_suits_the_same, can_be_built_on_foundation,
    can_be_placed_on_top_of, Card,
};
use crate::error::{MoveError, RejectReason};
use crate::game::Game;
use crate::layout::{resolve_drop_target, Rect};
use crate::pile::PileId;
use log::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Accepted { from: PileId, to: PileId, cards: usize },
    /// The held cards went back to `to`, their origin, unchanged.
    Returned { to: PileId, reason: RejectReason },
}

impl DropOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DropOutcome::Accepted { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoMove {
    Moved { from: PileId, to: PileId, card: Card },
    NoOp,
}

impl Game {
    /// Lifts the cards from `index` to the top of `pile` into the hand.
    ///
    /// For a column, `index` counts from the bottom of the whole column,
    /// face-down cards included, the same way [`Game::pile_snapshot`]
    /// lists them.
    pub fn pick_up(&mut self, pile: PileId, index: usize) -> Result<&[Card], MoveError> {
        if let Some(origin) = self.transfer.origin {
            return Err(MoveError::AlreadyHolding(origin));
        }
        let start = self.liftable_start(pile, index)?;
        let run = self.pile_mut(pile).split_off(start);
        self.transfer.cards.extend_from_slice(&run);
        self.transfer.origin = Some(pile);
        debug!("picked up {} card(s) from {}", run.len(), pile);
        Ok(self.transfer.cards())
    }

    /// Index into the playable pile of `pile` where the lifted run starts.
    fn liftable_start(&self, pile: PileId, index: usize) -> Result<usize, MoveError> {
        match pile {
            PileId::Stock => Err(MoveError::StockNotLiftable),
            PileId::Waste | PileId::Foundation(_) => {
                let len = self.pile(pile).len();
                if len == 0 {
                    Err(MoveError::EmptyPile(pile))
                } else if index >= len {
                    Err(MoveError::IndexOutOfRange { pile, index, len })
                } else if index != len - 1 {
                    Err(MoveError::NotTopCard { pile, index })
                } else {
                    Ok(index)
                }
            }
            PileId::Column(idx) => {
                let column = &self.columns[idx as usize];
                let hidden = column.hidden().len();
                if column.revealed().is_empty() {
                    Err(MoveError::EmptyPile(pile))
                } else if index >= column.len() {
                    Err(MoveError::IndexOutOfRange {
                        pile,
                        index,
                        len: column.len(),
                    })
                } else if index < hidden {
                    Err(MoveError::FaceDown { pile, index })
                } else {
                    Ok(index - hidden)
                }
            }
        }
    }

    /// Drops the held cards on `target`, or sends them back to their origin
    /// when `target` is `None` or refuses them.
    pub fn drop_on(&mut self, target: Option<PileId>) -> Result<DropOutcome, MoveError> {
        let origin = self.transfer.origin.ok_or(MoveError::NothingHeld)?;
        let Some(target) = target else {
            return Ok(self.return_held(origin, RejectReason::NoTarget));
        };
        if target == origin {
            return Ok(self.return_held(origin, RejectReason::SamePile));
        }
        if let Err(reason) = self.check_drop(target, self.transfer.cards()) {
            return Ok(self.return_held(origin, reason));
        }

        let mut held = std::mem::take(&mut self.transfer.cards);
        let count = held.len();
        self.pile_mut(target).append(&mut held);
        self.transfer.cards = held;
        self.transfer.origin = None;
        debug!("dropped {} card(s) from {} on {}", count, origin, target);

        if let PileId::Column(idx) = origin {
            self.settle_column(idx as usize);
        }
        self.check_win();
        Ok(DropOutcome::Accepted {
            from: origin,
            to: target,
            cards: count,
        })
    }

    /// Drops the held cards on whichever pile `region` overlaps the most.
    pub fn drop_at(&mut self, region: Rect) -> Result<DropOutcome, MoveError> {
        if !self.transfer.is_active() {
            return Err(MoveError::NothingHeld);
        }
        let candidates = self.layout.pile_bounds(self);
        let target = resolve_drop_target(&candidates, region);
        self.drop_on(target)
    }

    /// Puts held cards back where they came from. Returns their origin.
    pub fn cancel_transfer(&mut self) -> Option<PileId> {
        let origin = self.transfer.origin?;
        self.return_held(origin, RejectReason::NoTarget);
        Some(origin)
    }

    fn return_held(&mut self, origin: PileId, reason: RejectReason) -> DropOutcome {
        let mut held = std::mem::take(&mut self.transfer.cards);
        debug!("returning {} card(s) to {}: {}", held.len(), origin, reason);
        self.pile_mut(origin).append(&mut held);
        self.transfer.cards = held;
        self.transfer.origin = None;
        DropOutcome::Returned { to: origin, reason }
    }

    /// Whether `run` (bottom card first) may be dropped on `target`.
    pub fn check_drop(&self, target: PileId, run: &[Card]) -> Result<(), RejectReason> {
        let Some(&bottom) = run.first() else {
            return Err(RejectReason::NoTarget);
        };
        match target {
            PileId::Stock | PileId::Waste => Err(RejectReason::NotADropTarget),
            PileId::Foundation(idx) => {
                let top = self.foundations[idx as usize].top();
                if run.len() != 1 {
                    Err(RejectReason::FoundationTakesOneCard)
                } else if can_be_built_on_foundation(top, bottom) {
                    Ok(())
                } else if top.is_none() {
                    Err(RejectReason::FoundationNeedsAce)
                } else {
                    Err(RejectReason::FoundationOutOfSequence)
                }
            }
            PileId::Column(idx) => match self.columns[idx as usize].revealed().top() {
                None if bottom.is_king() => Ok(()),
                None => Err(RejectReason::ColumnNeedsKing),
                Some(top) if can_be_placed_on_top_of(top, bottom) => Ok(()),
                Some(_) => Err(RejectReason::ColumnOutOfSequence),
            },
        }
    }

    /// Double-click: sends the top card of the waste or a column to the
    /// first foundation that takes it.
    pub fn auto_move(&mut self, pile: PileId) -> AutoMove {
        if self.transfer.is_active() {
            warn!("auto-move requested while holding cards; returning them first");
            self.cancel_transfer();
        }
        let card = match pile {
            PileId::Waste | PileId::Column(_) => self.pile(pile).top(),
            PileId::Stock | PileId::Foundation(_) => None,
        };
        let Some(card) = card else {
            return AutoMove::NoOp;
        };
        let Some(dest) = self.auto_move_destination(card) else {
            debug!("no foundation takes {}", card.label());
            return AutoMove::NoOp;
        };

        self.pile_mut(pile).pop();
        self.foundations[dest].push(card);
        let to = PileId::Foundation(dest as u8);
        debug!("auto-moved {} from {} to {}", card.label(), pile, to);
        if let PileId::Column(idx) = pile {
            self.settle_column(idx as usize);
        }
        self.check_win();
        AutoMove::Moved {
            from: pile,
            to,
            card,
        }
    }

    /// Aces go to the first empty foundation; other cards to the first
    /// foundation topped by their suit at one rank lower.
    fn auto_move_destination(&self, card: Card) -> Option<usize> {
        if card.is_ace() {
            return self.foundations.iter().position(|f| f.is_empty());
        }
        self.foundations.iter().position(|foundation| {
            foundation.top().map_or(false, |top| {
                are_card_suits_the_same(top, card) && are_card_ranks_sequential(top, card)
            })
        })
    }

    /// A click on a column whose face-up run is empty turns its top hidden
    /// card over. Returns whether a card was revealed.
    pub fn flip_column(&mut self, column: u8) -> bool {
        if self.transfer.is_active() {
            self.cancel_transfer();
        }
        let idx = column as usize;
        if !self.columns[idx].needs_reveal() {
            return false;
        }
        self.settle_column(idx);
        true
    }

    pub fn held(&self) -> &[Card] {
        self.transfer.cards()
    }
}
