//! The runner: gravity, jumping and landing
//!
//! The runner never moves horizontally; the world scrolls past it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Hitbox, Rect};
use super::state::Platform;
use crate::tuning::Tuning;

/// Result of a jump request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Took off from the ground (arms the air jump)
    Ground,
    /// Used the single air jump
    Air,
    /// Airborne with the air jump already spent
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Sprite left edge
    pub x: f32,
    /// Top of the body
    pub y: f32,
    pub vy: f32,
    pub on_ground: bool,
    pub was_on_ground: bool,
    /// One extra jump, re-armed on landing
    pub air_jump: bool,
    /// Body + lower leg; the foot line is `y + height`
    pub height: f32,
    pub sprite_w: f32,
    pub hitbox: Hitbox,
}

impl Player {
    /// Fresh runner for a viewport `view_h` tall, dropping onto the ground
    pub fn new(tuning: &Tuning, view_h: f32) -> Self {
        let height = tuning.runner_h();
        Self {
            x: tuning.player_x,
            y: view_h - height - 10.0,
            vy: 0.0,
            on_ground: false,
            was_on_ground: false,
            air_jump: true,
            height,
            sprite_w: tuning.sprite_w,
            hitbox: Hitbox::for_sprite(tuning.sprite_w, tuning.hitbox_ratio),
        }
    }

    /// Foot line (bottom of the lower leg)
    pub fn foot_y(&self) -> f32 {
        self.y + self.height
    }

    /// Collision rect, from head to foot line
    pub fn hitbox_rect(&self) -> Rect {
        self.hitbox.rect_at(self.x, self.y, self.foot_y())
    }

    /// Where landing dust appears
    pub fn foot_center(&self) -> Vec2 {
        Vec2::new(self.x + self.sprite_w / 2.0, self.foot_y())
    }

    /// Jump from the ground, or spend the air jump
    pub fn jump(&mut self, jump_vy: f32) -> JumpKind {
        if self.on_ground {
            self.vy = jump_vy;
            self.on_ground = false;
            self.air_jump = true;
            JumpKind::Ground
        } else if self.air_jump {
            self.vy = jump_vy;
            self.air_jump = false;
            JumpKind::Air
        } else {
            JumpKind::Denied
        }
    }

    /// One tick of gravity. Not scaled by frame time.
    pub fn integrate(&mut self, gravity: f32) {
        self.vy += gravity;
        self.y += self.vy;
    }

    /// Stand on the platform under the hitbox whose top is closest above the
    /// foot line. Returns true on the airborne → grounded edge.
    pub fn resolve_ground(&mut self, platforms: &[Platform]) -> bool {
        let hitbox = self.hitbox_rect();
        let foot = self.foot_y();

        let support = platforms
            .iter()
            .filter(|p| hitbox.overlaps_x(&p.rect) && foot > p.rect.top())
            .map(|p| p.rect.top())
            .max_by(|a, b| a.total_cmp(b));

        self.on_ground = false;
        if let Some(top) = support {
            self.y = top - self.height;
            self.vy = 0.0;
            self.on_ground = true;
            self.air_jump = true;
        }

        let landed = self.on_ground && !self.was_on_ground;
        self.was_on_ground = self.on_ground;
        landed
    }
}
