//! Table state and the game-level operations: dealing, drawing from the
//! stock, win detection and the session's win/loss record.
//!
//! Card transfers between piles (pick-up, drop, auto-move) live in
//! [`crate::moves`].

use crate::card::{Card, NUM_CARDS_DECK, RANKS_PER_SUIT};
use crate::celebration::{Celebration, CelebrationFrame};
use crate::column::Column;
use crate::deck;
use crate::layout::TableLayout;
use crate::pile::{Pile, PileId, Role, NUM_COLUMNS, NUM_FOUNDATIONS};
use derivative::Derivative;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize)]
pub enum DrawMode {
    #[default]
    One,
    Three,
}

impl DrawMode {
    pub fn count(self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }
}

impl TryFrom<u8> for DrawMode {
    type Error = u8;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(DrawMode::One),
            3 => Ok(DrawMode::Three),
            other => Err(other),
        }
    }
}

/// Win/loss record for the current draw mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub wins: u32,
    pub losses: u32,
    /// `None` until the first game is dealt.
    pub draw_mode: Option<DrawMode>,
}

/// Notifications for the rendering layer, drained with
/// [`Game::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A face-down card of this column (0-based) was turned up.
    CardRevealed(u8),
    WinDetected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StockAction {
    /// Cards moved from stock to waste, in the order they were drawn.
    Drawn(Vec<Card>),
    /// This many waste cards went back to the stock.
    Recycled(usize),
    NoOp,
}

/// Cards currently held by the player and the pile they came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Transfer {
    pub(crate) cards: Pile,
    pub(crate) origin: Option<PileId>,
}

impl Transfer {
    pub fn cards(&self) -> &[Card] {
        self.cards.cards()
    }

    pub fn origin(&self) -> Option<PileId> {
        self.origin
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}

#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Game {
    pub(crate) stock: Pile,
    pub(crate) waste: Pile,
    pub(crate) foundations: [Pile; NUM_FOUNDATIONS],
    pub(crate) columns: [Column; NUM_COLUMNS],
    pub(crate) transfer: Transfer,
    pub(crate) stats: Stats,
    pub(crate) won_current_hand: bool,
    /// Incremented by every deal; tags the celebration of that deal.
    pub(crate) deal_number: u64,
    #[derivative(Debug = "ignore")]
    pub(crate) layout: TableLayout,
    #[derivative(Debug = "ignore")]
    pub(crate) events: Vec<GameEvent>,
    #[derivative(Debug = "ignore")]
    pub(crate) celebration: Option<Celebration>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// An empty table; nothing is dealt until [`Game::new_game`].
    pub fn new() -> Self {
        Self::with_layout(TableLayout::default())
    }

    pub fn with_layout(layout: TableLayout) -> Self {
        Self {
            stock: Pile::new(Role::Stock),
            waste: Pile::new(Role::Waste),
            foundations: std::array::from_fn(|_| Pile::new(Role::Foundation)),
            columns: Default::default(),
            transfer: Transfer::default(),
            stats: Stats::default(),
            won_current_hand: false,
            deal_number: 0,
            layout,
            events: Vec::new(),
            celebration: None,
        }
    }

    /// Clears the table, reshuffles and deals.
    pub fn new_game(&mut self, draw_mode: DrawMode) {
        self.new_game_with_deck(draw_mode, deck::shuffled());
    }

    /// Like [`Game::new_game`] but deals `cards` in the given order. The
    /// last card of `cards` is dealt first.
    pub fn new_game_with_deck(&mut self, draw_mode: DrawMode, cards: Vec<Card>) {
        match self.stats.draw_mode {
            Some(previous) if previous == draw_mode => {
                if !self.won_current_hand {
                    self.stats.losses += 1;
                }
            }
            _ => {
                self.stats.wins = 0;
                self.stats.losses = 0;
            }
        }
        self.stats.draw_mode = Some(draw_mode);
        self.won_current_hand = false;
        self.deal_number += 1;
        self.celebration = None;
        self.events.clear();

        self.clear_table();
        self.deal(cards);
        info!(
            "dealt game #{} (draw {}), record {}-{}",
            self.deal_number,
            draw_mode.count(),
            self.stats.wins,
            self.stats.losses
        );
    }

    fn clear_table(&mut self) {
        self.stock.clear();
        self.waste.clear();
        self.foundations.iter_mut().for_each(Pile::clear);
        self.columns.iter_mut().for_each(Column::clear);
        self.transfer.cards.clear();
        self.transfer.origin = None;
    }

    /// Column `c` receives `c` face-down cards then one face-up card, dealt
    /// diagonally from the stock top.
    fn deal(&mut self, cards: Vec<Card>) {
        assert_eq!(
            cards.len(),
            NUM_CARDS_DECK,
            "a deal needs exactly {} cards",
            NUM_CARDS_DECK
        );
        let mut seen = [false; NUM_CARDS_DECK];
        for card in &cards {
            let slot = &mut seen[card.index() as usize];
            assert!(!*slot, "card {} appears twice in the deal", card.label());
            *slot = true;
        }

        self.stock.extend_from_slice(&cards);
        for round in 0..NUM_COLUMNS {
            for col in round..NUM_COLUMNS {
                let Some(card) = self.stock.pop() else {
                    unreachable!("a 52 card stock cannot run out during the deal");
                };
                if col == round {
                    self.columns[col].revealed.push(card);
                } else {
                    self.columns[col].hidden.push(card);
                }
            }
        }
    }

    /// Draws `draw_mode` cards from stock to waste, or turns the waste back
    /// over onto the stock once the stock is empty.
    pub fn draw(&mut self) -> StockAction {
        if self.transfer.is_active() {
            warn!("draw requested while holding cards; returning them first");
            self.cancel_transfer();
        }

        let action = if !self.stock.is_empty() {
            let mut drawn = Vec::with_capacity(self.draw_count());
            for _ in 0..self.draw_count() {
                match self.stock.pop() {
                    Some(card) => {
                        self.waste.push(card);
                        drawn.push(card);
                    }
                    None => break,
                }
            }
            debug!("drew {} card(s), {} left in stock", drawn.len(), self.stock.len());
            StockAction::Drawn(drawn)
        } else if !self.waste.is_empty() {
            let count = self.waste.len();
            while let Some(card) = self.waste.pop() {
                self.stock.push(card);
            }
            info!("recycled {} waste cards into the stock", count);
            StockAction::Recycled(count)
        } else {
            debug!("stock and waste are both empty");
            StockAction::NoOp
        };

        self.check_win();
        action
    }

    pub fn draw_count(&self) -> usize {
        self.stats.draw_mode.unwrap_or_default().count()
    }

    /// All four foundations are complete.
    pub fn is_won(&self) -> bool {
        self.foundations
            .iter()
            .all(|foundation| foundation.len() == RANKS_PER_SUIT as usize)
    }

    /// Records the win the first time the table is found complete.
    pub fn check_win(&mut self) -> bool {
        if !self.is_won() {
            return false;
        }
        if !self.won_current_hand {
            self.won_current_hand = true;
            self.stats.wins += 1;
            self.events.push(GameEvent::WinDetected);
            self.celebration = Some(Celebration::new(
                self.deal_number,
                &self.foundations,
                &self.layout,
            ));
            info!(
                "game #{} won, record {}-{}",
                self.deal_number, self.stats.wins, self.stats.losses
            );
        }
        true
    }

    /// Applies the auto-reveal rule to column `idx`.
    pub(crate) fn settle_column(&mut self, idx: usize) {
        if let Some(card) = self.columns[idx].reveal() {
            debug!("revealed {} in column {}", card.label(), idx + 1);
            self.events.push(GameEvent::CardRevealed(idx as u8));
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn won_current_hand(&self) -> bool {
        self.won_current_hand
    }

    pub fn deal_number(&self) -> u64 {
        self.deal_number
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn column(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub fn foundation(&self, idx: usize) -> &Pile {
        &self.foundations[idx]
    }

    /// The playable pile behind `id`; for a column that is its face-up run.
    pub fn pile(&self, id: PileId) -> &Pile {
        match id {
            PileId::Stock => &self.stock,
            PileId::Waste => &self.waste,
            PileId::Foundation(idx) => &self.foundations[idx as usize],
            PileId::Column(idx) => &self.columns[idx as usize].revealed,
        }
    }

    pub(crate) fn pile_mut(&mut self, id: PileId) -> &mut Pile {
        match id {
            PileId::Stock => &mut self.stock,
            PileId::Waste => &mut self.waste,
            PileId::Foundation(idx) => &mut self.foundations[idx as usize],
            PileId::Column(idx) => &mut self.columns[idx as usize].revealed,
        }
    }

    /// Cards on the table plus any held ones. Always 52 once dealt.
    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.waste.len()
            + self.foundations.iter().map(Pile::len).sum::<usize>()
            + self.columns.iter().map(Column::len).sum::<usize>()
            + self.transfer.cards.len()
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    /// Advances the win celebration of deal `deal`. Ticks for an older deal
    /// are ignored.
    pub fn step_celebration(&mut self, deal: u64) -> Option<CelebrationFrame> {
        match self.celebration.as_mut() {
            Some(celebration) if celebration.deal() == deal => celebration.step(),
            _ => None,
        }
    }

    pub fn cancel_celebration(&mut self) {
        self.celebration = None;
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n--------- Foundations ---------")?;
        self.foundations.iter().try_for_each(|foundation| {
            match foundation.top() {
                Some(card) => write!(f, "[{}]\t", card),
                None => write!(f, "[  ]\t"),
            }
        })?;
        writeln!(f)?;
        writeln!(f, "--------- Columns -------------")?;
        self.columns.iter().enumerate().try_for_each(|(idx, column)| {
            write!(f, "c{}: ", idx + 1)?;
            column.hidden().cards().iter().try_for_each(|_| write!(f, "## "))?;
            column
                .revealed()
                .cards()
                .iter()
                .try_for_each(|card| write!(f, "{} ", card))?;
            writeln!(f)
        })?;
        writeln!(f, "--------- Stock ---------------")?;
        writeln!(f, "{} card(s)", self.stock.len())?;
        writeln!(f, "--------- Waste ---------------")?;
        let shown = self.waste.len().saturating_sub(self.draw_count());
        self.waste.cards()[shown..]
            .iter()
            .try_for_each(|card| write!(f, "{} ", card))?;
        if let Some(origin) = self.transfer.origin() {
            writeln!(f)?;
            writeln!(f, "--------- Holding from {} ---", origin)?;
            self.transfer
                .cards()
                .iter()
                .try_for_each(|card| write!(f, "{} ", card))?;
        }
        Ok(())
    }
}
