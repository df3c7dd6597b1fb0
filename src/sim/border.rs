//! Perimeter slots rays are fired from and exit through
//!
//! A slot is an addressable (side, lane) value, not an opaque handle: the
//! tracer needs to name the slot a ray exits through so the round can paint
//! it, and compare it against the entry slot to detect origin reflections.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One edge of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Top => 3,
        }
    }

    /// Single-letter form used by the terminal host ("L3", "T0", ...).
    pub fn letter(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Right => 'R',
            Side::Bottom => 'B',
            Side::Top => 'T',
        }
    }
}

/// One of the `4 * size` perimeter entry/exit points.
///
/// `lane` indexes position along the axis perpendicular to travel: row for
/// Left/Right, column for Bottom/Top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderSlot {
    pub side: Side,
    pub lane: u8,
}

impl BorderSlot {
    pub fn new(side: Side, lane: u8) -> Self {
        Self { side, lane }
    }

    /// Position in a flat per-board table of all `4 * size` slots.
    pub fn flat_index(self, size: i32) -> usize {
        self.side.index() * size as usize + self.lane as usize
    }

    /// The slot a ray leaving the board at `pos` exits through.
    ///
    /// `pos` must be exactly one step outside the board along a single
    /// axis, so precisely one side matches and the other coordinate is the
    /// in-bounds lane.
    pub fn at_exit(pos: IVec2, size: i32) -> Self {
        if pos.x < 0 {
            Self::new(Side::Left, pos.y as u8)
        } else if pos.x >= size {
            Self::new(Side::Right, pos.y as u8)
        } else if pos.y < 0 {
            Self::new(Side::Bottom, pos.x as u8)
        } else {
            Self::new(Side::Top, pos.x as u8)
        }
    }
}

impl fmt::Display for BorderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.letter(), self.lane)
    }
}
