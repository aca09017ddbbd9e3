//! Table geometry: where each pile sits, and which pile a dragged run lands
//! on.

use crate::game::Game;
use crate::pile::{PileId, NUM_COLUMNS, NUM_FOUNDATIONS};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The shared region, or `None` when the rectangles only touch or are
    /// apart.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    pub fn overlap_area(&self, other: &Rect) -> i64 {
        self.intersection(other).map_or(0, |shared| shared.area())
    }
}

/// Picks the pile `region` overlaps the most. A later pile only wins with a
/// strictly larger area, so ties go to the earliest entry of `candidates`.
pub fn resolve_drop_target(candidates: &[(PileId, Rect)], region: Rect) -> Option<PileId> {
    let mut best: Option<(PileId, i64)> = None;
    for &(pile, bounds) in candidates {
        let area = bounds.overlap_area(&region);
        if area == 0 {
            continue;
        }
        match best {
            Some((_, best_area)) if best_area >= area => {}
            _ => best = Some((pile, area)),
        }
    }
    best.map(|(pile, _)| pile)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLayout {
    pub card_width: i32,
    pub card_height: i32,
    /// Vertical distance between consecutive face-up cards of a column.
    pub stagger: i32,
    /// How far up and left the face-down part of a column peeks out.
    pub hidden_offset: i32,
    pub stock: (i32, i32),
    pub waste: (i32, i32),
    pub foundations: [(i32, i32); NUM_FOUNDATIONS],
    pub columns: [(i32, i32); NUM_COLUMNS],
    pub table_width: i32,
    pub table_height: i32,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            card_width: 69,
            card_height: 100,
            stagger: 20,
            hidden_offset: 3,
            stock: (50, 100),
            waste: (150, 100),
            foundations: [(350, 100), (450, 100), (550, 100), (650, 100)],
            columns: std::array::from_fn(|i| (50 + 100 * i as i32, 250)),
            table_width: 850,
            table_height: 700,
        }
    }
}

impl TableLayout {
    /// Top-left corner of the bottom card of `pile`.
    pub fn pile_origin(&self, pile: PileId) -> (i32, i32) {
        match pile {
            PileId::Stock => self.stock,
            PileId::Waste => self.waste,
            PileId::Foundation(idx) => self.foundations[idx as usize],
            PileId::Column(idx) => self.columns[idx as usize],
        }
    }

    pub fn table_bounds(&self) -> Rect {
        Rect::new(0, 0, self.table_width, self.table_height)
    }

    /// Bounds of a run of `count` staggered cards whose bottom card is at
    /// (`x`, `y`).
    pub fn run_bounds(&self, x: i32, y: i32, count: usize) -> Rect {
        let extra = count.saturating_sub(1) as i32 * self.stagger;
        Rect::new(x, y, self.card_width, self.card_height + extra)
    }

    /// Drop bounds of every pile on the current table, in declaration order.
    /// A column covers its face-up run, or one card slot when the run is
    /// empty.
    pub fn pile_bounds(&self, game: &Game) -> Vec<(PileId, Rect)> {
        PileId::all()
            .map(|pile| {
                let (x, y) = self.pile_origin(pile);
                let count = match pile {
                    PileId::Column(_) => game.pile(pile).len(),
                    _ => 1,
                };
                (pile, self.run_bounds(x, y, count))
            })
            .collect()
    }

    /// First pile, in declaration order, whose bounds contain the point.
    pub fn pile_at(&self, game: &Game, x: i32, y: i32) -> Option<PileId> {
        self.pile_bounds(game)
            .into_iter()
            .find(|(_, bounds)| bounds.contains(x, y))
            .map(|(pile, _)| pile)
    }

    /// Snapshot index of the card of `pile` under the point. Only the top
    /// card of a non-column pile can be hit; in a column the uppermost
    /// face-up card covering the point wins, and with no face-up cards the
    /// top of the face-down part can be hit.
    pub fn card_at(&self, game: &Game, pile: PileId, x: i32, y: i32) -> Option<usize> {
        let (px, py) = self.pile_origin(pile);
        let PileId::Column(idx) = pile else {
            let len = game.pile(pile).len();
            let hit = len > 0 && self.run_bounds(px, py, 1).contains(x, y);
            return hit.then(|| len - 1);
        };

        let column = game.column(idx as usize);
        let hidden = column.hidden().len();
        if column.revealed().is_empty() {
            let (hx, hy) = (px - self.hidden_offset, py - self.hidden_offset);
            let hit = hidden > 0 && self.run_bounds(hx, hy, 1).contains(x, y);
            return hit.then(|| hidden - 1);
        }
        (0..column.revealed().len())
            .rev()
            .find(|&i| {
                self.run_bounds(px, py + i as i32 * self.stagger, 1)
                    .contains(x, y)
            })
            .map(|i| hidden + i)
    }
}
