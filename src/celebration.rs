//! The bouncing-cards animation played after a win. It works on copies of
//! the foundation cards and never touches the table.

use crate::card::Card;
use crate::layout::{Rect, TableLayout};
use crate::pile::{Pile, NUM_FOUNDATIONS};
use serde::Serialize;
use std::collections::VecDeque;

const LAUNCH_SPEED_X: i32 = 10;
const LAUNCH_SPEED_Y: i32 = -15;
const GRAVITY: i32 = 2;

/// Where the animated card is after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CelebrationFrame {
    pub card: Card,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Flight {
    card: Card,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

#[derive(Clone, Debug)]
pub struct Celebration {
    deal: u64,
    queue: VecDeque<(Card, (i32, i32))>,
    current: Option<Flight>,
    launched: usize,
    bounds: Rect,
}

impl Celebration {
    pub fn new(
        deal: u64,
        foundations: &[Pile; NUM_FOUNDATIONS],
        layout: &TableLayout,
    ) -> Self {
        let queue = foundations
            .iter()
            .zip(layout.foundations)
            .flat_map(|(foundation, origin)| {
                foundation
                    .cards()
                    .iter()
                    .rev()
                    .map(move |&card| (card, origin))
            })
            .collect();
        Self {
            deal,
            queue,
            current: None,
            launched: 0,
            bounds: layout.table_bounds(),
        }
    }

    /// The deal this celebration belongs to.
    pub fn deal(&self) -> u64 {
        self.deal
    }

    /// Cards not yet launched.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Advances one tick. A card that has left the table is replaced by the
    /// next one; `None` once every card has flown off.
    pub fn step(&mut self) -> Option<CelebrationFrame> {
        let off_table = match self.current {
            Some(flight) => !self.on_table(flight.x, flight.y),
            None => true,
        };
        if off_table {
            self.current = self.launch_next();
        }

        let flight = self.current.as_mut()?;
        flight.x += flight.dx;
        flight.y += flight.dy;
        flight.dy += GRAVITY;
        Some(CelebrationFrame {
            card: flight.card,
            x: flight.x,
            y: flight.y,
        })
    }

    fn launch_next(&mut self) -> Option<Flight> {
        let (card, (x, y)) = self.queue.pop_front()?;
        let dx = if self.launched % 2 == 0 {
            LAUNCH_SPEED_X
        } else {
            -LAUNCH_SPEED_X
        };
        self.launched += 1;
        Some(Flight {
            card,
            x,
            y,
            dx,
            dy: LAUNCH_SPEED_Y,
        })
    }

    fn on_table(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x <= self.bounds.right() && y <= self.bounds.bottom()
    }
}
