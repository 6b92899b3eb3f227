//! Idle-mode autopilot
//!
//! Plans jump timings by replaying the runner's own physics against the
//! obstacles on screen, plus the earliest obstacle the world could still
//! spawn beyond the last tile. The plan is kept between ticks and searched
//! again only when it stops clearing that course.

use std::collections::{HashSet, VecDeque};

use super::collision::Rect;
use super::player::Player;
use super::state::{GameState, Platform};
use super::world;

/// Node limit for one plan search
const SEARCH_BUDGET: usize = 60_000;

/// Clearance kept around every obstacle while planning (px)
const MARGIN: f32 = 1.0;

/// Jump plan carried across ticks
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// `time_ticks` values on which to press jump
    plan: VecDeque<u64>,
}

impl Autopilot {
    pub fn reset(&mut self) {
        self.plan.clear();
    }

    /// Whether to press jump on the current tick. `dx` is this tick's scroll.
    pub fn wants_jump(&mut self, state: &GameState, dx: f32) -> bool {
        if dx <= 0.0 {
            return false;
        }
        let now = state.time_ticks;
        while self.plan.front().is_some_and(|&t| t < now) {
            self.plan.pop_front();
        }

        let course = Course::new(state, dx, true);
        let steps: Vec<usize> = self.plan.iter().map(|&t| (t - now) as usize).collect();
        if !course.clears(state.player, &steps) {
            let found = course
                .plan(state.player)
                .or_else(|| Course::new(state, dx, false).plan(state.player));
            if found.is_none() {
                log::debug!("Autopilot found no clear path at tick {now}");
            }
            self.plan = found
                .unwrap_or_default()
                .into_iter()
                .map(|step| now + step as u64)
                .collect();
        }

        if self.plan.front() == Some(&now) {
            self.plan.pop_front();
            true
        } else {
            false
        }
    }
}

/// Obstacles as seen this tick, scrolling `dx` per step
struct Course {
    obstacles: Vec<Rect>,
    floor: [Platform; 1],
    gravity: f32,
    jump_vy: f32,
    dx: f32,
    horizon: usize,
}

impl Course {
    fn new(state: &GameState, dx: f32, with_next_spawn: bool) -> Self {
        let t = &state.tuning;
        let hitbox = state.player.hitbox_rect();
        let mut obstacles: Vec<Rect> = state
            .obstacles
            .iter()
            .filter(|o| o.rect.right() > hitbox.left())
            .map(|o| o.rect)
            .collect();
        if with_next_spawn {
            obstacles.extend(next_spawn(state));
        }
        for r in &mut obstacles {
            *r = Rect::new(r.x - MARGIN, r.y - MARGIN, r.w + 2.0 * MARGIN, r.h + MARGIN);
        }

        let far = obstacles.iter().map(Rect::right).fold(hitbox.left(), f32::max);
        let steps = ((far - hitbox.left()) / dx).ceil() as usize + 2;
        let floor = Rect::new(
            hitbox.left() - t.tile_w,
            state.ground_y(),
            hitbox.w + 2.0 * t.tile_w,
            t.tile_h,
        );

        Self {
            obstacles,
            floor: [Platform { rect: floor }],
            gravity: t.gravity,
            jump_vy: t.jump_vy,
            dx,
            horizon: steps.min(t.autopilot_horizon as usize),
        }
    }

    /// One tick of runner physics `step` ticks from now; `None` on a hit
    fn step(&self, step: usize, mut body: Player, jump: bool) -> Option<Player> {
        if jump {
            body.jump(self.jump_vy);
        }
        body.integrate(self.gravity);
        body.resolve_ground(&self.floor);

        let hitbox = body.hitbox_rect();
        let shift = step as f32 * self.dx;
        let hit = self.obstacles.iter().any(|r| {
            let mut r = *r;
            r.scroll(shift);
            hitbox.overlaps(&r)
        });
        (!hit).then_some(body)
    }

    /// Whether pressing jump on `jumps` (steps from now) clears the course
    fn clears(&self, start: Player, jumps: &[usize]) -> bool {
        let mut body = start;
        for step in 0..self.horizon {
            match self.step(step, body, jumps.contains(&step)) {
                Some(next) => body = next,
                None => return false,
            }
        }
        true
    }

    /// Depth-first search preferring to wait, so jumps come as late as the
    /// course allows. Returns the steps to jump on.
    fn plan(&self, start: Player) -> Option<Vec<usize>> {
        let mut search = Search {
            course: self,
            dead: HashSet::new(),
            budget: SEARCH_BUDGET,
            path: Vec::new(),
        };
        search.run(0, start).then_some(search.path)
    }
}

/// Quantised runner state at a step, for pruning dead ends
type NodeKey = (usize, i32, i32, bool, bool);

struct Search<'a> {
    course: &'a Course,
    dead: HashSet<NodeKey>,
    budget: usize,
    path: Vec<usize>,
}

impl Search<'_> {
    fn run(&mut self, step: usize, body: Player) -> bool {
        if step >= self.course.horizon {
            return true;
        }
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;

        let key = (
            step,
            (body.y * 8.0).round() as i32,
            (body.vy * 8.0).round() as i32,
            body.on_ground,
            body.air_jump,
        );
        if self.dead.contains(&key) {
            return false;
        }

        let can_jump = body.on_ground || body.air_jump;
        for jump in [false, true] {
            if jump && !can_jump {
                break;
            }
            let Some(next) = self.course.step(step, body, jump) else {
                continue;
            };
            if jump {
                self.path.push(step);
            }
            if self.run(step + 1, next) {
                return true;
            }
            if jump {
                self.path.pop();
            }
        }

        self.dead.insert(key);
        false
    }
}

/// Earliest obstacle the generator could place on a tile not yet laid
fn next_spawn(state: &GameState) -> Option<Rect> {
    let t = &state.tuning;
    if t.obstacle_prob <= 0.0 {
        return None;
    }
    let extent = world::ground_extent(state)?;
    let skipped = t
        .min_obstacle_tiles
        .saturating_sub(state.tiles_since_obstacle)
        .max(1)
        - 1;
    let tile_x = extent + skipped as f32 * t.tile_w;

    let w = t.tile_w * t.obstacle_w_ratio;
    let h = t.tile_h * t.obstacle_h_ratio;
    let (x, width) = if t.obstacle_pair_prob > 0.0 {
        (tile_x + t.tile_w / 2.0 - w, 2.0 * w)
    } else {
        (tile_x + (t.tile_w - w) / 2.0, w)
    };
    Some(Rect::new(x, state.ground_y() - h, width, h))
}
