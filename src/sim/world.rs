//! Procedural ground, obstacles and hearts
//!
//! The ground is a row of equal tiles. New tiles are appended on the right
//! as old ones scroll off the left, and each new tile may carry an obstacle
//! (never closer than `min_obstacle_tiles` to the previous one) or a heart.

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::state::{GameState, Heart, Obstacle, Platform};

/// Clear the world and lay bare ground across the viewport plus two tiles
pub fn initial_fill(state: &mut GameState) {
    state.platforms.clear();
    state.obstacles.clear();
    state.hearts.clear();
    state.dust.clear();
    state.tiles_since_obstacle = state.tuning.min_obstacle_tiles;

    let tile_w = state.tuning.tile_w;
    let tile_h = state.tuning.tile_h;
    let ground_y = state.ground_y();
    let cols = (state.view.x / tile_w).ceil() as usize + 2;

    state.platforms.extend((0..cols).map(|i| Platform {
        rect: Rect::new(i as f32 * tile_w, ground_y, tile_w, tile_h),
    }));
}

/// Right edge of the rightmost tile
pub fn ground_extent(state: &GameState) -> Option<f32> {
    state.platforms.last().map(|p| p.rect.right())
}

/// Append tiles until the ground reaches one tile past the viewport
pub fn refill(state: &mut GameState) {
    let needed = state.view.x + state.tuning.tile_w;
    while ground_extent(state).is_none_or(|edge| edge < needed) {
        spawn_tile(state);
    }
}

/// Append one tile and roll for an obstacle and a heart on it
pub fn spawn_tile(state: &mut GameState) {
    state.tiles_since_obstacle += 1;

    let tile_w = state.tuning.tile_w;
    let tile_h = state.tuning.tile_h;
    let ground_y = state.ground_y();
    let x = ground_extent(state).unwrap_or(0.0);
    state.platforms.push(Platform {
        rect: Rect::new(x, ground_y, tile_w, tile_h),
    });

    if state.tiles_since_obstacle >= state.tuning.min_obstacle_tiles
        && state.rng.random::<f32>() < state.tuning.obstacle_prob
    {
        spawn_obstacles(state, x);
        state.tiles_since_obstacle = 0;
    }

    if state.rng.random::<f32>() < state.tuning.heart_prob {
        let size = tile_w * state.tuning.heart_size_ratio;
        let id = state.next_entity_id();
        state.hearts.push(Heart {
            id,
            pos: Vec2::new(x + tile_w / 2.0, ground_y - size),
            size,
        });
        log::debug!("Heart spawned at x={x:.0}");
    }
}

/// Obstacle (or side-by-side pair) standing on the tile at `tile_x`
fn spawn_obstacles(state: &mut GameState, tile_x: f32) {
    let tile_w = state.tuning.tile_w;
    let w = tile_w * state.tuning.obstacle_w_ratio;
    let h = state.tuning.tile_h * state.tuning.obstacle_h_ratio;
    let top = state.ground_y() - h;

    let pair = state.tuning.obstacle_pair_prob > 0.0
        && state.rng.random::<f32>() < state.tuning.obstacle_pair_prob;

    let mut x = tile_x + (tile_w - w) / 2.0;
    if pair {
        // Two blocks butted together, centred as a unit
        x = tile_x + tile_w / 2.0 - w;
    }

    let count = if pair { 2 } else { 1 };
    for i in 0..count {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            rect: Rect::new(x + i as f32 * w, top, w, h),
            counted: false,
        });
    }
    log::debug!("Obstacle spawned at x={tile_x:.0} (pair: {pair})");
}

/// Scroll the world left by `dx` and drop what has left the screen
pub fn scroll(state: &mut GameState, dx: f32) {
    for p in &mut state.platforms {
        p.rect.scroll(dx);
    }
    state.platforms.retain(|p| p.rect.right() > 0.0);

    for o in &mut state.obstacles {
        o.rect.scroll(dx);
    }
    state.obstacles.retain(|o| o.rect.right() > 0.0);

    for h in &mut state.hearts {
        h.pos.x -= dx;
    }
    state.hearts.retain(|h| h.trailing_edge() > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn state_with(tuning: Tuning) -> GameState {
        GameState::new(tuning, 42, 800.0, 600.0)
    }

    #[test]
    fn test_initial_fill_covers_view_plus_two() {
        let state = state_with(Tuning::classic());
        // ceil(800 / 75) + 2 = 13 tiles
        assert_eq!(state.platforms.len(), 13);
        assert_eq!(state.platforms[0].rect.x, 0.0);
        assert!(ground_extent(&state).unwrap() >= 800.0 + 75.0);
        assert!(state.obstacles.is_empty());
        assert!(state.hearts.is_empty());
    }

    #[test]
    fn test_tiles_are_contiguous() {
        let mut state = state_with(Tuning::classic());
        for _ in 0..50 {
            scroll(&mut state, 13.0);
            refill(&mut state);
        }
        for pair in state.platforms.windows(2) {
            assert!((pair[0].rect.right() - pair[1].rect.left()).abs() < 1e-3);
        }
        assert!(ground_extent(&state).unwrap() >= state.view.x + state.tuning.tile_w);
    }

    #[test]
    fn test_scroll_drops_offscreen_entities() {
        let mut state = state_with(Tuning::classic());
        let before = state.platforms.len();
        scroll(&mut state, 75.0);
        assert_eq!(state.platforms.len(), before - 1);
        assert!(state.platforms.iter().all(|p| p.rect.right() > 0.0));
    }

    #[test]
    fn test_obstacle_shape_and_placement() {
        let tuning = Tuning {
            obstacle_prob: 1.0,
            heart_prob: 0.0,
            ..Tuning::classic()
        };
        let mut state = state_with(tuning);
        spawn_tile(&mut state);
        let tile = *state.platforms.last().unwrap();
        let o = state.obstacles[0];
        assert_eq!(o.rect.w, 37.5);
        assert_eq!(o.rect.h, 45.0);
        assert_eq!(o.rect.bottom(), tile.rect.top());
        let tile_mid = tile.rect.x + tile.rect.w / 2.0;
        assert!((o.rect.x + o.rect.w / 2.0 - tile_mid).abs() < 1e-3);
        assert!(!o.counted);
    }

    #[test]
    fn test_obstacles_respect_min_spacing() {
        let tuning = Tuning {
            obstacle_prob: 1.0,
            ..Tuning::classic()
        };
        let mut state = state_with(tuning);
        for _ in 0..40 {
            spawn_tile(&mut state);
        }
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.rect.x).collect();
        assert_eq!(xs.len(), 10);
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= 4.0 * 75.0 - 1e-3);
        }
    }

    #[test]
    fn test_pair_spawns_two_adjacent_blocks_on_one_tile() {
        let tuning = Tuning {
            obstacle_prob: 1.0,
            obstacle_pair_prob: 1.0,
            heart_prob: 0.0,
            ..Tuning::arcade()
        };
        let mut state = state_with(tuning);
        spawn_tile(&mut state);
        let tile = state.platforms.last().unwrap().rect;
        assert_eq!(state.obstacles.len(), 2);
        let (a, b) = (state.obstacles[0].rect, state.obstacles[1].rect);
        assert_eq!(a.right(), b.left());
        assert!(a.left() >= tile.left() && b.right() <= tile.right());
        assert_eq!(state.tiles_since_obstacle, 0);
    }

    #[test]
    fn test_heart_centered_on_tile() {
        let tuning = Tuning {
            obstacle_prob: 0.0,
            heart_prob: 1.0,
            ..Tuning::classic()
        };
        let mut state = state_with(tuning);
        spawn_tile(&mut state);
        let tile = state.platforms.last().unwrap().rect;
        let heart = state.hearts[0];
        assert_eq!(heart.size, 45.0);
        assert_eq!(heart.pos.x, tile.x + 37.5);
        assert_eq!(heart.pos.y, tile.top() - 45.0);
    }
}
