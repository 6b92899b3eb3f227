//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod player;
pub mod progress;
pub mod state;
pub mod tick;
pub mod world;

pub use autopilot::Autopilot;
pub use clock::FrameClock;
pub use collision::{Hitbox, Rect};
pub use player::{JumpKind, Player};
pub use progress::{HitOutcome, Lives, Milestone, ScoreGate, Streak};
pub use state::{Dust, GameEvent, GamePhase, GameState, Heart, Obstacle, Platform, RunSummary};
pub use tick::{TickInput, tick};
