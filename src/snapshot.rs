//! Read-only views of the table for rendering, serializable to JSON.

use crate::card::{Card, Color};
use crate::game::{Game, Stats};
use crate::pile::PileId;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub card: Card,
    pub color: Color,
    pub face_up: bool,
}

impl CardView {
    fn new(card: Card, face_up: bool) -> Self {
        Self {
            card,
            color: card.color(),
            face_up,
        }
    }
}

/// Cards of one pile, bottom to top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PileSnapshot {
    pub pile: PileId,
    pub cards: Vec<CardView>,
}

impl PileSnapshot {
    pub fn face_up(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().filter(|view| view.face_up).map(|view| view.card)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeldSnapshot {
    pub origin: PileId,
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub deal: u64,
    pub piles: Vec<PileSnapshot>,
    pub held: Option<HeldSnapshot>,
    pub stats: Stats,
    pub won: bool,
}

impl TableSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Game {
    /// A column lists its face-down cards first, then its face-up run; the
    /// stock is all face down and every other pile all face up.
    pub fn pile_snapshot(&self, pile: PileId) -> PileSnapshot {
        let cards = match pile {
            PileId::Stock => self
                .stock
                .cards()
                .iter()
                .map(|&card| CardView::new(card, false))
                .collect(),
            PileId::Column(idx) => {
                let column = self.column(idx as usize);
                let hidden = column.hidden().cards().iter().map(|&c| CardView::new(c, false));
                let revealed = column.revealed().cards().iter().map(|&c| CardView::new(c, true));
                hidden.chain(revealed).collect()
            }
            PileId::Waste | PileId::Foundation(_) => self
                .pile(pile)
                .cards()
                .iter()
                .map(|&card| CardView::new(card, true))
                .collect(),
        };
        PileSnapshot { pile, cards }
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            deal: self.deal_number(),
            piles: PileId::all().map(|pile| self.pile_snapshot(pile)).collect(),
            held: self.transfer().origin().map(|origin| HeldSnapshot {
                origin,
                cards: self.held().to_vec(),
            }),
            stats: self.stats(),
            won: self.won_current_hand(),
        }
    }
}
