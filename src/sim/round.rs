//! Round aggregate
//!
//! One play round owns every piece of mutable state: the hidden layout, the
//! player's guesses, the token pool, the slot paints, and the penalty
//! ledger. All of it is dealt together and replaced together on reset, and
//! mutated one request at a time by a single caller.

use glam::IVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::border::BorderSlot;
use super::grid::{Grid, MarkerSet, cell_id};
use super::score::PenaltyLedger;
use super::tokens::{Token, TokenPool};
use super::trace::{Outcome, RayPath, trace_ray};
use crate::consts::{
    DEFAULT_GRID_SIZE, DEFAULT_MARKER_COUNT, MAX_GRID_SIZE, MIN_GRID_SIZE, MIN_MARKER_COUNT,
};
use crate::error::{GameError, Result};

/// Round parameters, validated whenever a round is dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Board edge length N (the board is N x N with 4N border slots)
    pub grid_size: i32,
    /// Hidden markers per round, in `[MIN_MARKER_COUNT, 2 * N]`
    pub marker_count: usize,
    /// Seed for marker placement and token shuffling
    pub seed: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            marker_count: DEFAULT_MARKER_COUNT,
            seed: 0,
        }
    }
}

impl RoundConfig {
    /// Largest simultaneous marker count for this board.
    pub fn max_markers(&self) -> usize {
        (2 * self.grid_size) as usize
    }

    fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(GameError::GridSizeOutOfBounds {
                requested: self.grid_size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        if self.marker_count < MIN_MARKER_COUNT || self.marker_count > self.max_markers() {
            return Err(GameError::MarkerCountOutOfBounds {
                requested: self.marker_count,
                min: MIN_MARKER_COUNT,
                max: self.max_markers(),
            });
        }
        Ok(())
    }
}

/// Paint applied to a border slot once a ray has used it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotPaint {
    /// The constant reflect color (entry reflections and origin returns)
    Reflected,
    /// A pool token; an exited ray shares one token between entry and exit
    Token(Token),
}

/// One play round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    config: RoundConfig,
    /// Count of rounds dealt from this seed; selects the PCG stream so a
    /// reset reshuffles without reseeding.
    round_index: u64,
    grid: Grid,
    guesses: MarkerSet,
    tokens: TokenPool,
    ledger: PenaltyLedger,
    paints: Vec<Option<SlotPaint>>,
}

impl Round {
    pub fn new(config: RoundConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::deal(config, 0))
    }

    /// Start the next round: fresh markers, reshuffled tokens, zero score.
    pub fn reset(&mut self, marker_count: usize) -> Result<()> {
        let config = RoundConfig {
            marker_count,
            ..self.config
        };
        config.validate()?;
        *self = Self::deal(config, self.round_index + 1);
        Ok(())
    }

    fn deal(config: RoundConfig, round_index: u64) -> Self {
        let mut rng = Pcg32::new(config.seed, round_index);
        let markers = MarkerSet::place(config.marker_count, config.grid_size, &mut rng);
        let grid = Grid::new(config.grid_size, markers);
        for pos in grid.marker_positions() {
            log::debug!("hidden marker at ({}, {})", pos.x, pos.y);
        }
        let tokens = TokenPool::shuffled(&mut rng);
        log::info!(
            "dealt round {}: {} markers on a {}x{} board",
            round_index,
            config.marker_count,
            config.grid_size,
            config.grid_size
        );

        Self {
            config,
            round_index,
            grid,
            guesses: MarkerSet::new(),
            tokens,
            ledger: PenaltyLedger::new(),
            paints: vec![None; 4 * config.grid_size as usize],
        }
    }

    /// Fire a probe ray from a border slot.
    ///
    /// Classifies the walk, paints the slots involved, and charges the ray
    /// penalty. Nothing is mutated unless the call succeeds: slot validity,
    /// slot neutrality, and token availability are all settled first.
    pub fn fire_ray(&mut self, slot: BorderSlot) -> Result<RayPath> {
        self.check_slot(slot)?;
        if self.paints[slot.flat_index(self.config.grid_size)].is_some() {
            return Err(GameError::SlotAlreadyFired {
                side: slot.side,
                lane: slot.lane,
            });
        }

        let path = trace_ray(&self.grid, slot);
        match path.outcome {
            Outcome::ReflectedAtEntry | Outcome::ReflectedToOrigin => {
                self.set_paint(slot, SlotPaint::Reflected);
            }
            Outcome::Absorbed { .. } => {
                let token = self.tokens.pop()?;
                self.set_paint(slot, SlotPaint::Token(token));
            }
            Outcome::Exited { slot: exit } => {
                let token = self.tokens.pop()?;
                self.set_paint(slot, SlotPaint::Token(token));
                self.set_paint(exit, SlotPaint::Token(token));
            }
        }
        self.ledger.on_ray_fired();
        log::debug!("ray {slot}: {:?}", path.outcome);
        Ok(path)
    }

    /// Place or remove a deduction marker on an interior cell.
    ///
    /// Removing is always allowed; adding past the round's marker count is
    /// rejected. Returns whether the cell now holds a guess.
    pub fn toggle_guess(&mut self, cell: IVec2) -> Result<bool> {
        if !self.grid.in_bounds(cell) {
            return Err(GameError::CellOutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }
        let id = cell_id(cell, self.config.grid_size);
        if self.guesses.remove(id) {
            return Ok(false);
        }
        if self.guesses.len() >= self.config.marker_count {
            return Err(GameError::AlreadyMaxGuesses {
                max: self.config.marker_count,
            });
        }
        self.guesses.insert(id);
        Ok(true)
    }

    /// Score the guesses against the hidden layout.
    /// Returns the penalty added by this call.
    pub fn evaluate(&mut self) -> u32 {
        let delta = self.ledger.on_evaluate(self.grid.markers(), &self.guesses);
        log::info!(
            "evaluate: +{} penalty, {} total",
            delta,
            self.ledger.penalty()
        );
        delta
    }

    /// Whether a slot has not been painted by any ray yet.
    pub fn is_slot_neutral(&self, slot: BorderSlot) -> Result<bool> {
        self.check_slot(slot)?;
        Ok(self.paints[slot.flat_index(self.config.grid_size)].is_none())
    }

    /// Paint on a slot, if any. Unknown slots read as unpainted.
    pub fn slot_paint(&self, slot: BorderSlot) -> Option<SlotPaint> {
        if (slot.lane as i32) < self.config.grid_size {
            self.paints[slot.flat_index(self.config.grid_size)]
        } else {
            None
        }
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn grid_size(&self) -> i32 {
        self.config.grid_size
    }

    pub fn marker_count(&self) -> usize {
        self.config.marker_count
    }

    pub fn penalty(&self) -> u32 {
        self.ledger.penalty()
    }

    pub fn tokens_remaining(&self) -> usize {
        self.tokens.remaining()
    }

    /// The hidden layout, for hosts that reveal it after evaluation.
    pub fn hidden_markers(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.grid.marker_positions()
    }

    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    pub fn has_guess_at(&self, cell: IVec2) -> bool {
        self.grid.in_bounds(cell) && self.guesses.contains(cell_id(cell, self.config.grid_size))
    }

    fn check_slot(&self, slot: BorderSlot) -> Result<()> {
        if (slot.lane as i32) < self.config.grid_size {
            Ok(())
        } else {
            Err(GameError::InvalidSlot {
                side: slot.side,
                lane: slot.lane,
            })
        }
    }

    fn set_paint(&mut self, slot: BorderSlot, paint: SlotPaint) {
        let idx = slot.flat_index(self.config.grid_size);
        self.paints[idx] = Some(paint);
    }
}
