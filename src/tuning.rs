//! Game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The two shipped variants of
//! the game differ only in data, so they are presets here rather than
//! separate code paths.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What happens when the player runs into an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LifeLossRule {
    /// A hit costs a life only while more than one life remains; a hit at
    /// one life or less ends the run.
    #[default]
    AboveOne,
    /// A hit costs a life while at least one life remains, so the run
    /// survives down to zero and ends on the next hit.
    AtLeastOne,
}

impl LifeLossRule {
    /// Whether a hit at `lives` can be absorbed by losing a life
    pub fn survives(&self, lives: f32) -> bool {
        match self {
            LifeLossRule::AboveOne => lives > 1.0,
            LifeLossRule::AtLeastOne => lives >= 1.0,
        }
    }
}

/// Errors from loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Downward acceleration added to vy every tick (px/tick²)
    pub gravity: f32,
    /// Jump impulse (px/tick, negative is up)
    pub jump_vy: f32,
    /// World scroll speed (px/ms)
    pub base_speed: f32,

    // === Ground tiles ===
    /// Tile width (px)
    pub tile_w: f32,
    /// Tile height (px)
    pub tile_h: f32,

    // === Runner ===
    /// Fixed screen x of the runner sprite
    pub player_x: f32,
    /// Torso height; the foot line is `y + body_h + leg_h`
    pub body_h: f32,
    /// Lower leg height
    pub leg_h: f32,
    /// Visual sprite width
    pub sprite_w: f32,
    /// Visual sprite height
    pub sprite_h: f32,
    /// Hitbox width as a fraction of the sprite width (centred)
    pub hitbox_ratio: f32,

    // === Spawning ===
    /// Chance an eligible tile gets an obstacle
    pub obstacle_prob: f32,
    /// Minimum tiles between obstacle tiles
    pub min_obstacle_tiles: u32,
    /// Chance an obstacle spawn is a side-by-side pair
    pub obstacle_pair_prob: f32,
    /// Obstacle width relative to tile width
    pub obstacle_w_ratio: f32,
    /// Obstacle height relative to tile height
    pub obstacle_h_ratio: f32,
    /// Chance any new tile gets a heart
    pub heart_prob: f32,
    /// Heart size relative to tile width
    pub heart_size_ratio: f32,
    /// Dust puffs per landing
    pub dust_burst: u32,

    // === Lives ===
    pub life_loss_rule: LifeLossRule,
    /// Lives at the start of a run (half steps)
    pub start_lives: f32,
    /// Lives cap (half steps)
    pub max_lives: f32,

    // === Scoring ===
    /// Score and distance go up by one every this many ticks
    pub score_tick_divisor: u64,
    pub distance_milestone_start: u64,
    pub distance_milestone_step: u64,
    pub obstacle_milestone_start: u64,
    pub obstacle_milestone_step: u64,
    /// Streak that activates the multiplier
    pub streak_threshold: u32,
    pub streak_multiplier: f32,

    // === Flow ===
    /// Delay after game over before restart input is accepted (ms)
    pub restart_delay_ms: f32,
    /// Furthest the autopilot plans ahead (ticks)
    pub autopilot_horizon: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

impl Tuning {
    /// The shipped single-life variant
    pub fn classic() -> Self {
        Self {
            gravity: 0.6,
            jump_vy: -12.0,
            base_speed: 0.5,

            tile_w: 50.0 * 1.5,
            tile_h: 20.0 * 1.5,

            player_x: 50.0,
            body_h: 40.0,
            leg_h: 15.0,
            sprite_w: 60.0,
            sprite_h: 84.0,
            hitbox_ratio: 0.8,

            obstacle_prob: 0.3,
            min_obstacle_tiles: 4,
            obstacle_pair_prob: 0.0,
            obstacle_w_ratio: 0.5,
            obstacle_h_ratio: 1.5,
            heart_prob: 0.01,
            heart_size_ratio: 0.6,
            dust_burst: 8,

            life_loss_rule: LifeLossRule::AboveOne,
            start_lives: 1.0,
            max_lives: 3.0,

            score_tick_divisor: 3,
            distance_milestone_start: 250,
            distance_milestone_step: 250,
            obstacle_milestone_start: 50,
            obstacle_milestone_step: 50,
            streak_threshold: 50,
            streak_multiplier: 1.5,

            restart_delay_ms: 500.0,
            autopilot_horizon: 200,
        }
    }

    /// The second variant: lives survive down to zero, obstacles come
    /// closer together and sometimes in pairs
    pub fn arcade() -> Self {
        Self {
            life_loss_rule: LifeLossRule::AtLeastOne,
            min_obstacle_tiles: 3,
            obstacle_pair_prob: 0.15,
            ..Self::classic()
        }
    }

    /// Parse tuning from JSON; missing fields take the classic values
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let positive = [
            ("tile_w", self.tile_w),
            ("tile_h", self.tile_h),
            ("sprite_w", self.sprite_w),
            ("sprite_h", self.sprite_h),
            ("body_h", self.body_h),
            ("base_speed", self.base_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let probabilities = [
            ("obstacle_prob", self.obstacle_prob),
            ("obstacle_pair_prob", self.obstacle_pair_prob),
            ("heart_prob", self.heart_prob),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be in [0, 1], got {value}")));
            }
        }

        if !(self.hitbox_ratio > 0.0 && self.hitbox_ratio <= 1.0) {
            return Err(invalid("hitbox_ratio", "must be in (0, 1]"));
        }
        if self.jump_vy >= 0.0 {
            return Err(invalid("jump_vy", "must be negative (up)"));
        }
        if self.score_tick_divisor == 0 {
            return Err(invalid("score_tick_divisor", "must be > 0"));
        }
        if self.distance_milestone_step == 0 || self.obstacle_milestone_step == 0 {
            return Err(invalid("milestone_step", "must be > 0"));
        }
        for (field, value) in [("start_lives", self.start_lives), ("max_lives", self.max_lives)] {
            if value < 0.0 || (value * 2.0).fract() != 0.0 {
                return Err(invalid(field, "must be a non-negative multiple of 0.5"));
            }
        }
        if self.start_lives > self.max_lives {
            return Err(invalid("start_lives", "must not exceed max_lives"));
        }
        Ok(())
    }

    /// Ground tile top edge for a viewport of height `view_h`
    pub fn ground_y(&self, view_h: f32) -> f32 {
        view_h - self.tile_h
    }

    /// Runner height from sprite top to foot line
    pub fn runner_h(&self) -> f32 {
        self.body_h + self.leg_h
    }
}
