//! Session configuration.
//!
//! Hosts configure the engine once, at session start, with a `GameConfig`:
//! - Board size and piece counts
//! - Timing for steps and the ice reveal schedule
//! - Scoring and the per-level target formula
//! - The RNG seed
//!
//! The bundle is static for the life of a session. It derives serde so hosts
//! can load it from whatever format they already use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest supported board. Below this the six exit slots collide.
pub const MIN_BOARD_SIZE: usize = 4;

/// Errors raised while validating configuration or a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Board is too small to hold distinct exit positions.
    #[error("board size {size} is below the minimum of {min}")]
    BoardTooSmall { size: usize, min: usize },

    /// The catalog defines no colors or no shapes.
    #[error("catalog has no {0}")]
    EmptyCatalog(&'static str),

    /// A shape's offsets do not include its anchor.
    #[error("shape '{0}' does not include its anchor offset (0, 0)")]
    ShapeMissingAnchor(String),

    /// A shape lists the same offset twice.
    #[error("shape '{0}' repeats an offset")]
    DuplicateOffset(String),

    /// The level target formula can never be met.
    #[error("level target cap must be at least 1")]
    ZeroTargetCap,
}

/// Per-level score target: `min(base + level * per_level, cap)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTargetFormula {
    /// Constant term.
    pub base: u32,
    /// Increase per level.
    pub per_level: u32,
    /// Upper bound.
    pub cap: u32,
}

impl LevelTargetFormula {
    /// Target for the given level.
    ///
    /// ```
    /// use rust_critters::core::LevelTargetFormula;
    ///
    /// let formula = LevelTargetFormula::default();
    /// assert_eq!(formula.target_for(2), 9);
    /// assert_eq!(formula.target_for(50), 20);
    /// ```
    #[must_use]
    pub fn target_for(&self, level: u32) -> u32 {
        self.base
            .saturating_add(level.saturating_mul(self.per_level))
            .min(self.cap)
    }
}

impl Default for LevelTargetFormula {
    fn default() -> Self {
        Self {
            base: 5,
            per_level: 2,
            cap: 20,
        }
    }
}

/// What a walk does when a path step lands on another creature's cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockedStep {
    /// Walk over the other creature without claiming its cells. Occupancy
    /// is committed at the next free step; only a blocked destination halts.
    #[default]
    PassThrough,
    /// Stop at the last committed cell.
    Halt,
}

/// Which ice cover an elimination sets melting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealScope {
    /// Only a cover spanning the vacated anchor cell.
    #[default]
    VacatedCell,
    /// The idle cover nearest the vacated cell, anywhere on the board.
    Nearest,
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for placement and spawning.
    pub seed: u64,

    /// Board edge length; the board is `board_size × board_size`.
    pub board_size: usize,

    /// Visible creatures attempted per level.
    pub visible_count: usize,

    /// Ice-covered creatures attempted per level.
    pub hidden_count: usize,

    /// Empty ice covers attempted per level. Melting one spawns a creature.
    pub empty_ice_count: usize,

    /// Delay between an elimination and the start of the melt.
    pub reveal_grace_ms: u64,

    /// Melt duration before the reveal resolves.
    pub ice_melt_ms: u64,

    /// Duration of one path step in headless playback.
    pub step_ms: u64,

    /// Score awarded per elimination.
    pub score_reward: u32,

    /// Target formula for levels after the first.
    pub level_target: LevelTargetFormula,

    /// Cancel a pending reveal when another creature claims the cover's cell.
    pub cancel_reveal_on_reoccupy: bool,

    /// Walk behaviour over occupied cells.
    pub blocked_step: BlockedStep,

    /// Cover selection for reveals.
    pub reveal_scope: RevealScope,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            board_size: 12,
            visible_count: 8,
            hidden_count: 4,
            empty_ice_count: 0,
            reveal_grace_ms: 300,
            ice_melt_ms: 600,
            step_ms: 120,
            score_reward: 10,
            level_target: LevelTargetFormula::default(),
            cancel_reveal_on_reoccupy: true,
            blocked_step: BlockedStep::PassThrough,
            reveal_scope: RevealScope::VacatedCell,
        }
    }
}

impl GameConfig {
    /// Create a default configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set the board size.
    #[must_use]
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Set visible and hidden creature counts.
    #[must_use]
    pub fn with_counts(mut self, visible: usize, hidden: usize) -> Self {
        self.visible_count = visible;
        self.hidden_count = hidden;
        self
    }

    /// Set the number of empty ice covers.
    #[must_use]
    pub fn with_empty_ice(mut self, count: usize) -> Self {
        self.empty_ice_count = count;
        self
    }

    /// Set the reveal grace and melt delays.
    #[must_use]
    pub fn with_reveal_timing(mut self, grace_ms: u64, melt_ms: u64) -> Self {
        self.reveal_grace_ms = grace_ms;
        self.ice_melt_ms = melt_ms;
        self
    }

    /// Set the headless step duration.
    #[must_use]
    pub fn with_step_ms(mut self, step_ms: u64) -> Self {
        self.step_ms = step_ms;
        self
    }

    /// Set the per-elimination reward.
    #[must_use]
    pub fn with_score_reward(mut self, reward: u32) -> Self {
        self.score_reward = reward;
        self
    }

    /// Set the level target formula.
    #[must_use]
    pub fn with_level_target(mut self, formula: LevelTargetFormula) -> Self {
        self.level_target = formula;
        self
    }

    /// Keep legacy reveal behaviour: timers fire even if the cell was re-occupied.
    #[must_use]
    pub fn with_legacy_reveals(mut self) -> Self {
        self.cancel_reveal_on_reoccupy = false;
        self
    }

    /// Stop walks at the first occupied step.
    #[must_use]
    pub fn with_halting_walks(mut self) -> Self {
        self.blocked_step = BlockedStep::Halt;
        self
    }

    /// Let eliminations reveal the nearest idle cover, not just one underfoot.
    #[must_use]
    pub fn with_nearest_reveals(mut self) -> Self {
        self.reveal_scope = RevealScope::Nearest;
        self
    }

    /// Total delay from elimination to reveal resolution.
    #[must_use]
    pub fn reveal_delay_ms(&self) -> u64 {
        self.reveal_grace_ms.saturating_add(self.ice_melt_ms)
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.board_size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.level_target.cap == 0 {
            return Err(ConfigError::ZeroTargetCap);
        }
        Ok(())
    }
}
