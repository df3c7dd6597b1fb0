//! Ray propagation and outcome classification
//!
//! The deduction core: walk one probe ray through the hidden marker layout
//! and classify how it leaves the board (or fails to). Pure over its inputs;
//! painting slots and charging penalties happen downstream in [`Round`].
//!
//! [`Round`]: super::round::Round

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::border::{BorderSlot, Side};
use super::grid::Grid;

/// Terminal classification of a traced ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The ray ran into a marker and never left the board.
    Absorbed { cell: IVec2 },
    /// A marker flanked the entry cell; the ray never advanced.
    ReflectedAtEntry,
    /// The walk left the board through its own entry slot.
    ReflectedToOrigin,
    /// The walk left the board through another slot.
    Exited { slot: BorderSlot },
}

/// Ordered cells the walk occupied, plus its terminal outcome.
///
/// The cell list is a projection of the walk for animation; it is empty for
/// entry reflections and carries no control state of its own. Cells a
/// double-deflection retraces appear again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RayPath {
    pub cells: Vec<IVec2>,
    pub outcome: Outcome,
}

/// Moving head of the walk: position plus travel axis and direction.
///
/// One cell of history (the back-up) is all the state a deflection needs,
/// which keeps the walk O(1) in memory per step.
#[derive(Debug, Clone, Copy)]
struct RayHead {
    pos: IVec2,
    horizontal: bool,
    step: i32,
}

impl RayHead {
    /// Entry pose for a slot: Left/Bottom enter at the 0-edge stepping
    /// positive, Right/Top at the far edge stepping negative.
    fn enter(slot: BorderSlot, size: i32) -> Self {
        let lane = slot.lane as i32;
        let (pos, horizontal, step) = match slot.side {
            Side::Left => (IVec2::new(0, lane), true, 1),
            Side::Right => (IVec2::new(size - 1, lane), true, -1),
            Side::Bottom => (IVec2::new(lane, 0), false, 1),
            Side::Top => (IVec2::new(lane, size - 1), false, -1),
        };
        Self {
            pos,
            horizontal,
            step,
        }
    }

    /// Unit offset toward the perpendicular positive side.
    fn perp(&self) -> IVec2 {
        if self.horizontal { IVec2::Y } else { IVec2::X }
    }

    fn axis_step(&self) -> IVec2 {
        if self.horizontal {
            IVec2::new(self.step, 0)
        } else {
            IVec2::new(0, self.step)
        }
    }

    fn advance(&mut self) {
        self.pos += self.axis_step();
    }

    fn back_up(&mut self) {
        self.pos -= self.axis_step();
    }
}

/// Walk one probe ray from `slot` through `grid`.
///
/// The caller is responsible for slot validity (`lane < size`). Termination
/// is geometric: every iteration either advances along one axis or reverses
/// through cells whose flanks are already known clear, so the bounds check
/// always fires eventually.
pub fn trace_ray(grid: &Grid, slot: BorderSlot) -> RayPath {
    let size = grid.size();
    let mut head = RayHead::enter(slot, size);

    // A marker flanking the entry cell reflects before the first step;
    // there is no previous cell to deflect back into. Both flanks occupied
    // still reflects here (double-deflection is a mid-path rule only), and
    // off-board flanks at corner lanes read as empty.
    let perp = head.perp();
    if grid.has_marker_at(head.pos - perp) || grid.has_marker_at(head.pos + perp) {
        return RayPath {
            cells: Vec::new(),
            outcome: Outcome::ReflectedAtEntry,
        };
    }

    let mut cells = Vec::new();
    loop {
        if !grid.in_bounds(head.pos) {
            let exit = BorderSlot::at_exit(head.pos, size);
            let outcome = if exit == slot {
                Outcome::ReflectedToOrigin
            } else {
                Outcome::Exited { slot: exit }
            };
            return RayPath { cells, outcome };
        }

        if grid.has_marker_at(head.pos) {
            return RayPath {
                cells,
                outcome: Outcome::Absorbed { cell: head.pos },
            };
        }

        let perp = head.perp();
        let flank_neg = grid.has_marker_at(head.pos - perp);
        let flank_pos = grid.has_marker_at(head.pos + perp);

        if flank_neg && flank_pos {
            // Markers on both flanks reverse the ray along its own axis;
            // re-evaluate from the backed-up cell without advancing.
            head.back_up();
            head.step = -head.step;
            continue;
        }

        if flank_neg || flank_pos {
            // One flanking marker turns the ray 90 degrees: step back to
            // the previous cell, then travel perpendicular, away from the
            // marker.
            head.back_up();
            head.horizontal = !head.horizontal;
            head.step = if flank_pos { -1 } else { 1 };
            head.advance();
            continue;
        }

        cells.push(head.pos);
        head.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{MarkerSet, cell_id};
    use proptest::prelude::*;

    fn grid_with(size: i32, markers: &[(i32, i32)]) -> Grid {
        let mut set = MarkerSet::new();
        for &(x, y) in markers {
            set.insert(cell_id(IVec2::new(x, y), size));
        }
        Grid::new(size, set)
    }

    fn slot(side: Side, lane: u8) -> BorderSlot {
        BorderSlot::new(side, lane)
    }

    #[test]
    fn test_straight_ray_exits_opposite_slot() {
        let grid = grid_with(8, &[]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(
            path.outcome,
            Outcome::Exited {
                slot: slot(Side::Right, 3)
            }
        );
        assert_eq!(path.cells.len(), 8);
        assert_eq!(path.cells[0], IVec2::new(0, 3));
        assert_eq!(path.cells[7], IVec2::new(7, 3));
    }

    #[test]
    fn test_straight_rays_from_every_side() {
        let grid = grid_with(8, &[]);
        let expect = [
            (Side::Left, Side::Right),
            (Side::Right, Side::Left),
            (Side::Bottom, Side::Top),
            (Side::Top, Side::Bottom),
        ];
        for (from, to) in expect {
            for lane in 0..8 {
                let path = trace_ray(&grid, slot(from, lane));
                assert_eq!(
                    path.outcome,
                    Outcome::Exited {
                        slot: slot(to, lane)
                    }
                );
            }
        }
    }

    #[test]
    fn test_absorbed_on_straight_path() {
        // Spec scenario: markers at (2,3) and (5,3), fired from Left lane 3.
        let grid = grid_with(8, &[(2, 3), (5, 3)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(
            path.outcome,
            Outcome::Absorbed {
                cell: IVec2::new(2, 3)
            }
        );
        assert_eq!(path.cells, vec![IVec2::new(0, 3), IVec2::new(1, 3)]);
    }

    #[test]
    fn test_golden_path_deflects_up_and_exits_top() {
        // Same board, Left lane 4: the marker at (2,3) sits on the low
        // flank of (2,4), so the ray turns at (1,4) and runs up column 1.
        let grid = grid_with(8, &[(2, 3), (5, 3)]);
        let path = trace_ray(&grid, slot(Side::Left, 4));

        assert_eq!(
            path.outcome,
            Outcome::Exited {
                slot: slot(Side::Top, 1)
            }
        );
        assert_eq!(
            path.cells,
            vec![
                IVec2::new(0, 4),
                IVec2::new(1, 4),
                IVec2::new(1, 5),
                IVec2::new(1, 6),
                IVec2::new(1, 7),
            ]
        );
    }

    #[test]
    fn test_deflects_away_from_high_flank() {
        // Marker above the lane: the ray turns downward instead.
        let grid = grid_with(8, &[(2, 5)]);
        let path = trace_ray(&grid, slot(Side::Left, 4));

        assert_eq!(
            path.outcome,
            Outcome::Exited {
                slot: slot(Side::Bottom, 1)
            }
        );
    }

    #[test]
    fn test_reflects_at_entry() {
        let grid = grid_with(8, &[(0, 1)]);
        let path = trace_ray(&grid, slot(Side::Left, 0));

        assert_eq!(path.outcome, Outcome::ReflectedAtEntry);
        assert!(path.cells.is_empty());
    }

    #[test]
    fn test_entry_reflection_wins_over_later_absorption() {
        // A flanking marker at the entry reflects no matter what lies
        // further along the straight path.
        let grid = grid_with(8, &[(0, 4), (3, 3)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(path.outcome, Outcome::ReflectedAtEntry);
    }

    #[test]
    fn test_entry_reflection_with_both_flanks() {
        // Both flanks occupied at step 0 is still an ordinary reflection,
        // not a double-deflection.
        let grid = grid_with(8, &[(0, 2), (0, 4)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(path.outcome, Outcome::ReflectedAtEntry);
    }

    #[test]
    fn reflect_precheck_skips_out_of_bounds_neighbor() {
        // Corner lane: one flank of (0,0) is off the board and must read
        // as empty, so the ray sails on and gets absorbed mid-row.
        let grid = grid_with(8, &[(5, 0)]);
        let path = trace_ray(&grid, slot(Side::Left, 0));

        assert_eq!(
            path.outcome,
            Outcome::Absorbed {
                cell: IVec2::new(5, 0)
            }
        );
    }

    #[test]
    fn test_marker_on_entry_cell_absorbs() {
        let grid = grid_with(8, &[(0, 3)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(
            path.outcome,
            Outcome::Absorbed {
                cell: IVec2::new(0, 3)
            }
        );
        assert!(path.cells.is_empty());
    }

    #[test]
    fn test_entry_flank_beats_entry_cell_marker() {
        // Pre-check runs before the marker-hit test of the first step.
        let grid = grid_with(8, &[(0, 3), (0, 4)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(path.outcome, Outcome::ReflectedAtEntry);
    }

    #[test]
    fn test_double_deflection_reverses_to_origin() {
        // Markers flank (3,3) from above and below; the ray backs out the
        // way it came without ever changing axis.
        let grid = grid_with(8, &[(3, 2), (3, 4)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        assert_eq!(path.outcome, Outcome::ReflectedToOrigin);
        assert!(path.cells.iter().all(|c| c.y == 3));
    }

    #[test]
    fn test_deflection_at_edge_lane_exits_sideways() {
        // Turn computed one cell into the board whose new direction leaves
        // immediately.
        let grid = grid_with(8, &[(1, 1)]);
        let path = trace_ray(&grid, slot(Side::Bottom, 0));

        assert_eq!(
            path.outcome,
            Outcome::Exited {
                slot: slot(Side::Left, 0)
            }
        );
    }

    #[test]
    fn test_double_deflection_path_retraces_cells() {
        let grid = grid_with(8, &[(3, 2), (3, 4)]);
        let path = trace_ray(&grid, slot(Side::Left, 3));

        // Out and back: the projection logs the retraced cells again.
        assert_eq!(
            path.cells,
            vec![
                IVec2::new(0, 3),
                IVec2::new(1, 3),
                IVec2::new(2, 3),
                IVec2::new(2, 3),
                IVec2::new(1, 3),
                IVec2::new(0, 3),
            ]
        );
    }

    fn arb_board() -> impl Strategy<Value = (i32, Vec<u16>)> {
        (2i32..=12).prop_flat_map(|size| {
            let total = (size * size) as u16;
            let max_markers = (2 * size) as usize;
            (
                Just(size),
                prop::collection::btree_set(0..total, 0..=max_markers),
            )
                .prop_map(|(size, ids)| (size, ids.into_iter().collect()))
        })
    }

    proptest! {
        // Bounded termination: for any layout and every slot the walk
        // stays within the directed-state bound and names a valid exit.
        #[test]
        fn prop_trace_terminates_for_any_board((size, ids) in arb_board()) {
            let mut markers = MarkerSet::new();
            for id in ids {
                markers.insert(id);
            }
            let grid = Grid::new(size, markers);
            let bound = (4 * size * size) as usize;

            for side in Side::ALL {
                for lane in 0..size as u8 {
                    let entry = BorderSlot::new(side, lane);
                    let path = trace_ray(&grid, entry);
                    prop_assert!(path.cells.len() <= bound);
                    if let Outcome::Exited { slot: exit } = path.outcome {
                        prop_assert!(exit != entry);
                        prop_assert!((exit.lane as i32) < size);
                    }
                }
            }
        }
    }
}
