//! Penalty accounting
//!
//! Blackbox scores like golf: every ray costs a point, every marker the
//! player fails to find costs five, and lower is better.

use serde::{Deserialize, Serialize};

use super::grid::MarkerSet;
use crate::consts::{MISSED_MARKER_PENALTY, RAY_PENALTY};

/// Running penalty for the round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyLedger {
    penalty: u32,
}

impl PenaltyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each fired ray costs one point, whatever its outcome.
    pub fn on_ray_fired(&mut self) {
        self.penalty += RAY_PENALTY;
    }

    /// Charge five points per hidden marker the guesses missed.
    /// Returns the delta added by this call.
    pub fn on_evaluate(&mut self, markers: &MarkerSet, guesses: &MarkerSet) -> u32 {
        let missed = markers.iter().filter(|&id| !guesses.contains(id)).count();
        let delta = missed as u32 * MISSED_MARKER_PENALTY;
        self.penalty += delta;
        delta
    }

    pub fn reset(&mut self) {
        self.penalty = 0;
    }

    pub fn penalty(&self) -> u32 {
        self.penalty
    }
}
