//! Board grid and marker bookkeeping
//!
//! Cells are addressed two ways: as `IVec2` coordinates during the ray walk
//! and as a flat `CellId` (`y * size + x`) for marker membership, so lookups
//! never re-derive coordinates.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Flat cell identity, stable for the lifetime of a round.
pub type CellId = u16;

/// Flat identity of an in-bounds cell.
#[inline]
pub fn cell_id(pos: IVec2, size: i32) -> CellId {
    (pos.y * size + pos.x) as CellId
}

/// Coordinates of a flat identity.
#[inline]
pub fn cell_pos(id: CellId, size: i32) -> IVec2 {
    IVec2::new(id as i32 % size, id as i32 / size)
}

/// A set of cell identities (hidden markers or player guesses).
///
/// Kept sorted; duplicates are impossible by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    ids: Vec<CellId>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `count` distinct cells uniformly from the board, retrying
    /// duplicate draws.
    pub fn place(count: usize, size: i32, rng: &mut impl Rng) -> Self {
        let total = (size * size) as u32;
        debug_assert!(count as u32 <= total);

        let mut ids: Vec<CellId> = Vec::with_capacity(count);
        while ids.len() < count {
            let id = rng.random_range(0..total) as CellId;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Self { ids }
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: CellId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(at) => {
                self.ids.insert(at, id);
                true
            }
        }
    }

    /// Returns whether the id was present.
    pub fn remove(&mut self, id: CellId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(at) => {
                self.ids.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.ids.iter().copied()
    }
}

/// The square board: edge length plus the hidden marker layout.
///
/// Immutable for the duration of a round; a reset replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
    markers: MarkerSet,
}

impl Grid {
    pub fn new(size: i32, markers: MarkerSet) -> Self {
        Self { size, markers }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.size && pos.y >= 0 && pos.y < self.size
    }

    /// True iff `pos` is on the board and holds a hidden marker.
    /// Off-board positions read as empty.
    #[inline]
    pub fn has_marker_at(&self, pos: IVec2) -> bool {
        self.in_bounds(pos) && self.markers.contains(cell_id(pos, self.size))
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn marker_positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.markers.iter().map(|id| cell_pos(id, self.size))
    }
}
