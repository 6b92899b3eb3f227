//! Game state and core simulation types
//!
//! One `GameState` owns everything a run needs. The frontend holds it, feeds
//! it input through `tick`, and reads it back to draw.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::autopilot::Autopilot;
use super::collision::Rect;
use super::player::Player;
use super::progress::{Lives, Milestone, ScoreGate, Streak};
use super::world;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World laid out, waiting for the first jump to start running
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// A ground tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

/// Something to jump over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
    /// Player has passed it (scored toward streak/milestones)
    pub counted: bool,
}

/// Half-life pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    pub id: u32,
    /// Centre of the heart glyph
    pub pos: Vec2,
    pub size: f32,
}

impl Heart {
    /// Bounding square used for pickup tests
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn trailing_edge(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }
}

/// Landing dust puff (visual only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dust {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 1.0 at spawn, removed at 0
    pub alpha: f32,
}

impl Dust {
    /// Spawn a puff near `origin`, drifting up and back
    pub fn spawn(origin: Vec2, rng: &mut impl Rng) -> Self {
        let speed = rng.random::<f32>() + 0.5;
        let jitter = rng.random::<f32>() * 10.0 - 5.0;
        Self {
            pos: Vec2::new(origin.x + jitter, origin.y),
            vel: Vec2::new(-speed, -speed),
            size: (rng.random::<f32>() * 3.0 + 2.0) * 2.0,
            alpha: 1.0,
        }
    }

    /// Advance by `dt` ms while the world scrolls `scroll_dx` px
    pub fn update(&mut self, dt: f32, scroll_dx: f32) {
        self.pos += self.vel * dt * 0.1;
        self.pos.x -= scroll_dx;
        self.alpha -= dt * 0.001;
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

/// Things that happened during the last tick, for HUD, popups and storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    Paused,
    Resumed,
    Jumped { air: bool },
    Landed,
    HeartCollected { lives: f32 },
    LifeLost { lives: f32 },
    ObstacleCleared { streak: u32 },
    StreakBonus { multiplier: f32 },
    DistanceMilestone { tier: u32, next_target: u64 },
    ObstacleMilestone { tier: u32, next_target: u64 },
    GameOver { score: u64 },
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: u64,
    pub distance: u64,
    pub obstacles_cleared: u64,
    pub best_streak: u32,
    pub lives: f32,
    pub distance_tier: u32,
    pub obstacle_tier: u32,
    pub ticks: u64,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance values this run was created with
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn/dust RNG; keeps running across restarts
    pub(crate) rng: Pcg32,
    /// Viewport size in px
    pub view: Vec2,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter (ticks while playing)
    pub time_ticks: u64,
    pub score: u64,
    /// Cumulative distance, in lockstep with score
    pub distance: u64,
    /// Cumulative obstacles passed
    pub obstacles_cleared: u64,
    pub lives: Lives,
    pub streak: Streak,
    pub best_streak: u32,
    pub distance_milestone: Milestone,
    pub obstacle_milestone: Milestone,
    pub score_gate: ScoreGate,
    /// World scroll speed (px/ms)
    pub speed: f32,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub hearts: Vec<Heart>,
    /// Visual particles (not gameplay-affecting)
    pub dust: Vec<Dust>,
    /// Tiles laid since the last obstacle
    pub tiles_since_obstacle: u32,
    /// Time spent in GameOver (ms)
    pub restart_gate_ms: f32,
    /// Restart input is accepted
    pub allow_restart: bool,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Idle-mode jump plan
    pub(crate) autopilot: Autopilot,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run waiting in `Ready` for a viewport of `view_w × view_h`
    pub fn new(tuning: Tuning, seed: u64, view_w: f32, view_h: f32) -> Self {
        let player = Player::new(&tuning, view_h);
        let mut state = Self {
            lives: Lives::new(tuning.start_lives, tuning.max_lives),
            streak: Streak::new(tuning.streak_threshold, tuning.streak_multiplier),
            distance_milestone: Milestone::new(
                tuning.distance_milestone_start,
                tuning.distance_milestone_step,
            ),
            obstacle_milestone: Milestone::new(
                tuning.obstacle_milestone_start,
                tuning.obstacle_milestone_step,
            ),
            score_gate: ScoreGate::new(tuning.score_tick_divisor),
            speed: tuning.base_speed,
            tiles_since_obstacle: tuning.min_obstacle_tiles,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            view: Vec2::new(view_w, view_h),
            phase: GamePhase::Ready,
            time_ticks: 0,
            score: 0,
            distance: 0,
            obstacles_cleared: 0,
            best_streak: 0,
            player,
            platforms: Vec::new(),
            obstacles: Vec::new(),
            hearts: Vec::new(),
            dust: Vec::new(),
            restart_gate_ms: 0.0,
            allow_restart: false,
            events: Vec::new(),
            autopilot: Autopilot::default(),
            next_id: 1,
            tuning,
        };
        state.reset_run();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put every per-run value back to its starting configuration
    fn reset_run(&mut self) {
        let t = &self.tuning;
        self.lives = Lives::new(t.start_lives, t.max_lives);
        self.streak = Streak::new(t.streak_threshold, t.streak_multiplier);
        self.distance_milestone =
            Milestone::new(t.distance_milestone_start, t.distance_milestone_step);
        self.obstacle_milestone =
            Milestone::new(t.obstacle_milestone_start, t.obstacle_milestone_step);
        self.score_gate = ScoreGate::new(t.score_tick_divisor);
        self.speed = t.base_speed;
        self.player = Player::new(t, self.view.y);

        self.time_ticks = 0;
        self.score = 0;
        self.distance = 0;
        self.obstacles_cleared = 0;
        self.best_streak = 0;
        self.restart_gate_ms = 0.0;
        self.allow_restart = false;
        self.autopilot.reset();

        world::initial_fill(self);
    }

    /// Leave `Ready` and start running
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Reinitialise everything and start a fresh run
    pub fn restart(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    /// End the run
    pub fn end_run(&mut self) {
        self.phase = GamePhase::GameOver;
        self.restart_gate_ms = 0.0;
        self.allow_restart = false;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: score {} distance {} obstacles {}",
            self.score,
            self.distance,
            self.obstacles_cleared
        );
    }

    /// Viewport changed: keep the ground pinned to the bottom edge
    pub fn resize(&mut self, view_w: f32, view_h: f32) {
        let dy = self.tuning.ground_y(view_h) - self.tuning.ground_y(self.view.y);
        self.view = Vec2::new(view_w, view_h);
        if dy == 0.0 {
            return;
        }
        for p in &mut self.platforms {
            p.rect.y += dy;
        }
        for o in &mut self.obstacles {
            o.rect.y += dy;
        }
        for h in &mut self.hearts {
            h.pos.y += dy;
        }
        for d in &mut self.dust {
            d.pos.y += dy;
        }
        self.player.y += dy;
    }

    /// Ground tile top edge for the current viewport
    pub fn ground_y(&self) -> f32 {
        self.tuning.ground_y(self.view.y)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            score: self.score,
            distance: self.distance,
            obstacles_cleared: self.obstacles_cleared,
            best_streak: self.best_streak,
            lives: self.lives.as_f32(),
            distance_tier: self.distance_milestone.tier,
            obstacle_tier: self.obstacle_milestone.tier,
            ticks: self.time_ticks,
        }
    }
}
