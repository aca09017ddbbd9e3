use crate::card::Card;
use crate::pile::{Pile, Role};

/// One tableau column: a face-down backing pile under a face-up playable run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Column {
    pub(crate) hidden: Pile,
    pub(crate) revealed: Pile,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            hidden: Pile::new(Role::TableauHidden),
            revealed: Pile::new(Role::TableauRevealed),
        }
    }
}

impl Column {
    pub fn hidden(&self) -> &Pile {
        &self.hidden
    }

    pub fn revealed(&self) -> &Pile {
        &self.revealed
    }

    pub fn len(&self) -> usize {
        self.hidden.len() + self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty() && self.revealed.is_empty()
    }

    /// Whether the auto-reveal rule has something to do.
    pub fn needs_reveal(&self) -> bool {
        self.revealed.is_empty() && !self.hidden.is_empty()
    }

    /// Turns the top hidden card face up when the revealed run is empty.
    /// Returns the revealed card, if any.
    pub fn reveal(&mut self) -> Option<Card> {
        if !self.needs_reveal() {
            return None;
        }
        let card = self.hidden.pop()?;
        self.revealed.push(card);
        Some(card)
    }

    pub fn clear(&mut self) {
        self.hidden.clear();
        self.revealed.clear();
    }
}
