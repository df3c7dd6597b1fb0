//! Deterministic game core
//!
//! All puzzle rules live here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - One `Round` owner per set of mutable state, mutated one request at a time

pub mod border;
pub mod grid;
pub mod round;
pub mod score;
pub mod tokens;
pub mod trace;

pub use border::{BorderSlot, Side};
pub use grid::{CellId, Grid, MarkerSet, cell_id, cell_pos};
pub use round::{Round, RoundConfig, SlotPaint};
pub use score::PenaltyLedger;
pub use tokens::{REFLECT_TOKEN, Token, TokenPool};
pub use trace::{Outcome, RayPath, trace_ray};
