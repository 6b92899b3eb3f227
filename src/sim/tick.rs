//! Per-frame simulation tick
//!
//! Core game loop that advances the run by one animation frame.

use super::player::JumpKind;
use super::progress::HitOutcome;
use super::state::{Dust, GameEvent, GamePhase, GameState};
use super::world;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (also starts and restarts the run)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame of `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    let wants_jump = input.jump || input.idle_mode;

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::Ready => {
            if wants_jump {
                state.start();
            }
            return;
        }
        GamePhase::GameOver => {
            advance_restart_gate(state, dt);
            if state.allow_restart && wants_jump {
                state.restart();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    if state.score_gate.scores_on(state.time_ticks) {
        state.score += 1;
        state.distance += 1;
        if let Some(next_target) = state.distance_milestone.check(state.distance) {
            let tier = state.distance_milestone.tier;
            log::info!("Distance milestone reached, next at {next_target}");
            state
                .events
                .push(GameEvent::DistanceMilestone { tier, next_target });
        }
    }

    let dx = state.speed * dt;
    world::scroll(state, dx);
    for d in &mut state.dust {
        d.update(dt, dx);
    }
    state.dust.retain(|d| d.is_alive());
    world::refill(state);

    let jump = input.jump || (input.idle_mode && autopilot_wants_jump(state, dx));
    if jump {
        match state.player.jump(state.tuning.jump_vy) {
            JumpKind::Ground => state.events.push(GameEvent::Jumped { air: false }),
            JumpKind::Air => state.events.push(GameEvent::Jumped { air: true }),
            JumpKind::Denied => {}
        }
    }

    update_player(state);
}

/// Gravity, landing, pickups, obstacle bookkeeping
fn update_player(state: &mut GameState) {
    state.player.integrate(state.tuning.gravity);
    if state.player.resolve_ground(&state.platforms) {
        let origin = state.player.foot_center();
        for _ in 0..state.tuning.dust_burst {
            let puff = Dust::spawn(origin, &mut state.rng);
            state.dust.push(puff);
        }
        state.events.push(GameEvent::Landed);
    }

    collect_hearts(state);
    count_passed_obstacles(state);
    resolve_obstacle_hits(state);
}

fn collect_hearts(state: &mut GameState) {
    let hitbox = state.player.hitbox_rect();
    let before = state.hearts.len();
    state.hearts.retain(|h| !hitbox.overlaps(&h.bounds()));

    for _ in state.hearts.len()..before {
        state.lives.gain_half();
        let lives = state.lives.as_f32();
        log::debug!("Heart collected, lives {lives}");
        state.events.push(GameEvent::HeartCollected { lives });
    }
}

/// Mark obstacles whose right edge is behind the hitbox
fn count_passed_obstacles(state: &mut GameState) {
    let front = state.player.hitbox_rect().left();
    let mut newly_cleared = 0u32;
    for o in &mut state.obstacles {
        if !o.counted && o.rect.right() < front {
            o.counted = true;
            newly_cleared += 1;
        }
    }

    for _ in 0..newly_cleared {
        let had_bonus = state.streak.multiplier() > 1.0;
        state.streak.extend();
        state.best_streak = state.best_streak.max(state.streak.count);
        state.obstacles_cleared += 1;
        state.events.push(GameEvent::ObstacleCleared {
            streak: state.streak.count,
        });

        if !had_bonus && state.streak.multiplier() > 1.0 {
            let multiplier = state.streak.multiplier();
            log::info!("Streak bonus active: x{multiplier}");
            state.events.push(GameEvent::StreakBonus { multiplier });
        }

        if let Some(next_target) = state.obstacle_milestone.check(state.obstacles_cleared) {
            let tier = state.obstacle_milestone.tier;
            log::info!("Obstacle milestone reached, next at {next_target}");
            state
                .events
                .push(GameEvent::ObstacleMilestone { tier, next_target });
        }
    }
}

fn resolve_obstacle_hits(state: &mut GameState) {
    let hitbox = state.player.hitbox_rect();
    let rule = state.tuning.life_loss_rule;

    let mut i = 0;
    while i < state.obstacles.len() {
        if !hitbox.overlaps(&state.obstacles[i].rect) {
            i += 1;
            continue;
        }

        state.streak.reset();
        match state.lives.take_hit(rule) {
            HitOutcome::LifeLost => {
                let absorbed = state.obstacles.remove(i);
                let lives = state.lives.as_f32();
                log::info!("Hit obstacle {}, lives left {lives}", absorbed.id);
                state.events.push(GameEvent::LifeLost { lives });
            }
            HitOutcome::Fatal => {
                state.end_run();
                return;
            }
        }
    }
}

fn advance_restart_gate(state: &mut GameState, dt: f32) {
    if state.allow_restart {
        return;
    }
    state.restart_gate_ms += dt;
    if state.restart_gate_ms >= state.tuning.restart_delay_ms {
        state.allow_restart = true;
    }
}

fn autopilot_wants_jump(state: &mut GameState, dx: f32) -> bool {
    let mut pilot = std::mem::take(&mut state.autopilot);
    let jump = pilot.wants_jump(state, dx);
    state.autopilot = pilot;
    jump
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;

    const DT: f32 = 1000.0 / 60.0;

    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_prob: 0.0,
            heart_prob: 0.0,
            ..Tuning::classic()
        }
    }

    fn playing(tuning: Tuning) -> GameState {
        let mut state = GameState::new(tuning, 12345, 800.0, 600.0);
        tick(
            &mut state,
            &TickInput {
                jump: true,
                ..Default::default()
            },
            DT,
        );
        state
    }

    #[test]
    fn test_tick_ready_to_playing() {
        let mut state = GameState::new(quiet_tuning(), 12345, 800.0, 600.0);
        assert_eq!(state.phase, GamePhase::Ready);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_ticks, 0);

        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing(quiet_tuning());
        tick(&mut state, &TickInput::default(), DT);
        let ticks = state.time_ticks;
        let first_x = state.platforms[0].rect.x;

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing advances while paused
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.platforms[0].rect.x, first_x);

        // Unpause
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_landing_spawns_dust_once() {
        let mut state = playing(quiet_tuning());
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.events.contains(&GameEvent::Landed));
        assert_eq!(state.dust.len(), 8);

        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.events.contains(&GameEvent::Landed));
        assert!(state.dust.len() <= 8);
    }

    #[test]
    fn test_heart_pickup_adds_half_life() {
        let mut state = playing(quiet_tuning());
        tick(&mut state, &TickInput::default(), DT);

        let center = state.player.hitbox_rect();
        let id = state.next_entity_id();
        state.hearts.push(crate::sim::state::Heart {
            id,
            pos: glam::Vec2::new(center.x + center.w / 2.0 + 5.0, center.y + 10.0),
            size: 45.0,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.hearts.is_empty());
        assert_eq!(state.lives.as_f32(), 1.5);
        assert!(state
            .events
            .contains(&GameEvent::HeartCollected { lives: 1.5 }));
    }

    #[test]
    fn test_obstacle_counted_once_extends_streak() {
        let mut state = playing(quiet_tuning());
        tick(&mut state, &TickInput::default(), DT);

        let left = state.player.hitbox_rect().left();
        let ground = state.ground_y();
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            rect: Rect::new(left - 38.0, ground - 45.0, 37.5, 45.0),
            counted: false,
        });

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.obstacles[0].counted);
        assert_eq!(state.streak.count, 1);
        assert_eq!(state.obstacles_cleared, 1);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.streak.count, 1);
        assert_eq!(state.obstacles_cleared, 1);
    }

    #[test]
    fn test_restart_gate_waits_for_delay() {
        let mut state = playing(quiet_tuning());
        state.end_run();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        tick(&mut state, &jump, 200.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.allow_restart);

        tick(&mut state, &TickInput::default(), 300.0);
        assert!(state.allow_restart);

        tick(&mut state, &jump, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::Restarted));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_autopilot_clears_obstacles() {
        let tuning = Tuning {
            heart_prob: 0.0,
            ..Tuning::classic()
        };
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for seed in [12345, 1, 2, 3, 4, 5, 6, 7] {
            let mut state = GameState::new(tuning.clone(), seed, 800.0, 600.0);
            for i in 0..3000 {
                tick(&mut state, &idle, DT);
                assert!(!state.is_game_over(), "seed {seed}: hit an obstacle at tick {i}");
            }
            assert!(state.obstacles_cleared > 10, "seed {seed}");
        }
    }

    #[test]
    fn test_autopilot_survives_minimum_spacing() {
        // An obstacle on every fourth tile: single jumps fall behind
        let tuning = Tuning {
            obstacle_prob: 1.0,
            heart_prob: 0.0,
            ..Tuning::classic()
        };
        let mut state = GameState::new(tuning, 9, 800.0, 600.0);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for i in 0..2000 {
            tick(&mut state, &idle, DT);
            assert!(!state.is_game_over(), "hit an obstacle at tick {i}");
        }
        assert!(state.obstacles_cleared > 40);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Tuning::classic(), 99999, 800.0, 600.0);
        let mut state2 = GameState::new(Tuning::classic(), 99999, 800.0, 600.0);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let inputs: Vec<TickInput> = (0..600)
            .map(|i| if i % 37 == 0 { jump.clone() } else { TickInput::default() })
            .collect();

        for input in &inputs {
            tick(&mut state1, input, DT);
            tick(&mut state2, input, DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.hearts, state2.hearts);
        assert_eq!(state1.phase, state2.phase);
    }
}
