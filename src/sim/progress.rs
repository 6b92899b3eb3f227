//! Score, lives, streak and milestone bookkeeping

use serde::{Deserialize, Serialize};

use crate::tuning::LifeLossRule;

/// Lives, stored as a count of half lives so 0.5 steps stay exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives {
    halves: u8,
    max_halves: u8,
}

/// What a hit did to the player's lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// A life was spent; the obstacle is absorbed
    LifeLost,
    /// No life could be spared; the run is over
    Fatal,
}

impl Lives {
    /// Lives from float values (rounded down to the nearest half)
    pub fn new(start: f32, max: f32) -> Self {
        let max_halves = (max.max(0.0) * 2.0).floor() as u8;
        let halves = ((start.max(0.0) * 2.0).floor() as u8).min(max_halves);
        Self { halves, max_halves }
    }

    pub fn as_f32(&self) -> f32 {
        self.halves as f32 / 2.0
    }

    /// Add half a life, capped at the maximum. Returns false if already full.
    pub fn gain_half(&mut self) -> bool {
        if self.halves >= self.max_halves {
            return false;
        }
        self.halves += 1;
        true
    }

    /// Resolve an obstacle hit under `rule`
    pub fn take_hit(&mut self, rule: LifeLossRule) -> HitOutcome {
        if rule.survives(self.as_f32()) {
            self.halves = self.halves.saturating_sub(2);
            HitOutcome::LifeLost
        } else {
            HitOutcome::Fatal
        }
    }
}

/// Gate that turns ticks into score/distance points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreGate {
    divisor: u64,
}

impl ScoreGate {
    pub fn new(divisor: u64) -> Self {
        Self {
            divisor: divisor.max(1),
        }
    }

    /// Whether tick number `tick` (1-based) earns a point
    pub fn scores_on(&self, tick: u64) -> bool {
        tick > 0 && tick % self.divisor == 0
    }
}

/// Consecutive obstacles cleared without a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    threshold: u32,
    bonus: f32,
}

impl Streak {
    pub fn new(threshold: u32, bonus: f32) -> Self {
        Self {
            count: 0,
            threshold,
            bonus,
        }
    }

    pub fn extend(&mut self) {
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Score multiplier for the current streak
    pub fn multiplier(&self) -> f32 {
        if self.count >= self.threshold {
            self.bonus
        } else {
            1.0
        }
    }

    /// Streak bar fill in [0, 1]
    pub fn fill(&self) -> f32 {
        if self.threshold == 0 {
            return 1.0;
        }
        self.count.min(self.threshold) as f32 / self.threshold as f32
    }
}

/// One milestone track: a target that moves up each time it is met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub tier: u32,
    pub target: u64,
    step: u64,
}

impl Milestone {
    pub fn new(target: u64, step: u64) -> Self {
        Self {
            tier: 1,
            target,
            step,
        }
    }

    /// Advance one tier if `value` reached the target.
    /// Returns the new target when a milestone was hit.
    pub fn check(&mut self, value: u64) -> Option<u64> {
        if value < self.target {
            return None;
        }
        self.tier += 1;
        self.target += self.step;
        Some(self.target)
    }

    /// Progress toward the current target, clamped to the target
    pub fn progress(&self, value: u64) -> u64 {
        value.min(self.target)
    }
}
