//! Draw list generation
//!
//! Turns a `GameState` into a back-to-front list of primitives. The list is
//! backend-agnostic; `canvas` executes it on a 2D context.

use glam::Vec2;

use super::parallax::Backdrop;
use crate::consts::{RUNNER_FRAMES, RUNNER_FRAME_TICKS};
use crate::settings::Settings;
use crate::sim::{GameState, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear { w: f32, h: f32 },
    Backdrop { layer: usize, rect: Rect },
    Ground(Rect),
    Obstacle(Rect),
    Heart { center: Vec2, size: f32 },
    Dust { center: Vec2, radius: f32, alpha: f32 },
    Runner { rect: Rect, frame: usize },
}

impl DrawCmd {
    /// Paint order; lower draws first
    pub fn layer_rank(&self) -> u8 {
        match self {
            DrawCmd::Clear { .. } => 0,
            DrawCmd::Backdrop { .. } => 1,
            DrawCmd::Ground(_) => 2,
            DrawCmd::Obstacle(_) => 3,
            DrawCmd::Heart { .. } => 4,
            DrawCmd::Dust { .. } => 5,
            DrawCmd::Runner { .. } => 6,
        }
    }
}

/// Runner sprite frame for the current tick
pub fn runner_frame(time_ticks: u64) -> usize {
    ((time_ticks / RUNNER_FRAME_TICKS) % RUNNER_FRAMES) as usize
}

/// Sprite rect: the sprite's foot line sits on the player's foot line
pub fn runner_rect(state: &GameState) -> Rect {
    let p = &state.player;
    let sprite_h = state.tuning.sprite_h;
    Rect::new(p.x, p.y - (sprite_h - p.height), p.sprite_w, sprite_h)
}

/// Build this frame's draw list
pub fn build_scene(state: &GameState, backdrop: &Backdrop, settings: &Settings) -> Vec<DrawCmd> {
    let (w, h) = (state.view.x, state.view.y);
    let mut cmds = Vec::with_capacity(
        1 + 2 * backdrop.layers.len()
            + state.platforms.len()
            + state.obstacles.len()
            + state.hearts.len()
            + state.dust.len()
            + 1,
    );

    cmds.push(DrawCmd::Clear { w, h });

    let layer_count = settings.quality.parallax_layers().min(backdrop.layers.len());
    for (index, layer) in backdrop.layers.iter().enumerate().take(layer_count) {
        for rect in layer.placements(w, h) {
            cmds.push(DrawCmd::Backdrop { layer: index, rect });
        }
    }

    cmds.extend(state.platforms.iter().map(|p| DrawCmd::Ground(p.rect)));
    cmds.extend(state.obstacles.iter().map(|o| DrawCmd::Obstacle(o.rect)));
    cmds.extend(state.hearts.iter().map(|heart| DrawCmd::Heart {
        center: heart.pos,
        size: heart.size,
    }));
    cmds.extend(
        state
            .dust
            .iter()
            .take(settings.max_dust())
            .map(|d| DrawCmd::Dust {
                center: d.pos,
                radius: d.size,
                alpha: d.alpha.max(0.0),
            }),
    );

    cmds.push(DrawCmd::Runner {
        rect: runner_rect(state),
        frame: runner_frame(state.time_ticks),
    });

    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let tuning = Tuning {
            obstacle_prob: 1.0,
            heart_prob: 1.0,
            ..Tuning::classic()
        };
        let mut state = GameState::new(tuning, 3, 800.0, 600.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, 16.0);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), 16.0);
        }
        state
    }

    #[test]
    fn test_scene_is_back_to_front() {
        let state = running_state();
        let cmds = build_scene(&state, &Backdrop::city(), &Settings::default());
        let ranks: Vec<u8> = cmds.iter().map(DrawCmd::layer_rank).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        assert!(matches!(cmds.first(), Some(DrawCmd::Clear { .. })));
        assert!(matches!(cmds.last(), Some(DrawCmd::Runner { .. })));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Obstacle(_))));
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Heart { .. })));
    }

    #[test]
    fn test_low_quality_trims_backdrop_and_dust() {
        let state = running_state();
        let settings = Settings::from_preset(crate::settings::QualityPreset::Low);
        let cmds = build_scene(&state, &Backdrop::city(), &settings);
        let backdrops = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Backdrop { .. }))
            .count();
        assert_eq!(backdrops, 2);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCmd::Dust { .. })));
    }

    #[test]
    fn test_runner_frame_cycles() {
        assert_eq!(runner_frame(0), 0);
        assert_eq!(runner_frame(2), 0);
        assert_eq!(runner_frame(3), 1);
        assert_eq!(runner_frame(27), 0);
    }

    #[test]
    fn test_runner_sprite_feet_on_foot_line() {
        let state = GameState::new(Tuning::classic(), 1, 800.0, 600.0);
        let rect = runner_rect(&state);
        assert!((rect.bottom() - state.player.foot_y()).abs() < 1e-3);
    }
}
