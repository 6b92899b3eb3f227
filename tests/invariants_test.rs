//! Property tests: invariants that hold on every tick of any run

use std::collections::HashMap;

use proptest::prelude::*;

use skyline_runner::sim::{GameEvent, GameState, TickInput, tick};
use skyline_runner::{LifeLossRule, Tuning};

const DT: f32 = 1000.0 / 60.0;

/// Busy world: obstacles and hearts on every eligible tile
fn crowded(rule: LifeLossRule) -> Tuning {
    Tuning {
        obstacle_prob: 0.9,
        heart_prob: 0.5,
        life_loss_rule: rule,
        ..Tuning::classic()
    }
}

fn rule_strategy() -> impl Strategy<Value = LifeLossRule> {
    prop_oneof![Just(LifeLossRule::AboveOne), Just(LifeLossRule::AtLeastOne)]
}

fn inputs_strategy() -> impl Strategy<Value = Vec<(bool, f32)>> {
    prop::collection::vec((prop::bool::weighted(0.08), 4.0f32..100.0), 50..400)
}

fn input(jump: bool) -> TickInput {
    TickInput {
        jump,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_lives_stay_in_half_steps(
        seed in any::<u64>(),
        rule in rule_strategy(),
        inputs in inputs_strategy(),
    ) {
        let mut state = GameState::new(crowded(rule), seed, 800.0, 600.0);
        for (jump, dt) in inputs {
            tick(&mut state, &input(jump), dt);
            let lives = state.lives.as_f32();
            prop_assert!((0.0..=3.0).contains(&lives));
            prop_assert_eq!(lives * 2.0, (lives * 2.0).round());
        }
    }

    #[test]
    fn test_obstacle_counted_once_after_passing(
        seed in any::<u64>(),
        inputs in inputs_strategy(),
    ) {
        let mut state = GameState::new(crowded(LifeLossRule::AboveOne), seed, 800.0, 600.0);
        let mut counted: HashMap<u32, bool> = HashMap::new();
        let mut cleared_before = 0;

        for (jump, _) in inputs {
            tick(&mut state, &input(jump), DT);
            if state.events.contains(&GameEvent::Restarted) {
                cleared_before = 0;
            }
            let front = state.player.hitbox_rect().left();
            let mut newly = 0;
            for o in &state.obstacles {
                let was = counted.insert(o.id, o.counted).unwrap_or(false);
                prop_assert!(!(was && !o.counted), "counted flag went back to false");
                if o.counted && !was {
                    prop_assert!(o.rect.right() < front);
                    newly += 1;
                }
            }
            prop_assert_eq!(state.obstacles_cleared, cleared_before + newly);
            cleared_before = state.obstacles_cleared;
        }
    }

    #[test]
    fn test_hit_resets_streak(
        seed in any::<u64>(),
        rule in rule_strategy(),
        inputs in inputs_strategy(),
    ) {
        let mut state = GameState::new(crowded(rule), seed, 800.0, 600.0);
        for (jump, _) in inputs {
            tick(&mut state, &input(jump), DT);
            let hit = state.events.iter().any(|e| {
                matches!(e, GameEvent::LifeLost { .. } | GameEvent::GameOver { .. })
            });
            if hit {
                prop_assert_eq!(state.streak.count, 0);
            }
        }
    }

    #[test]
    fn test_obstacle_spacing(seed in any::<u64>(), ticks in 100usize..1500) {
        let tuning = Tuning {
            obstacle_prob: 1.0,
            heart_prob: 0.0,
            ..Tuning::classic()
        };
        let min_gap = tuning.min_obstacle_tiles as f32 * tuning.tile_w;
        let mut state = GameState::new(tuning, seed, 800.0, 600.0);

        // Holding jump keeps the run going and restarts it after a hit
        for _ in 0..ticks {
            tick(&mut state, &input(true), DT);
            let mut lefts: Vec<f32> = state.obstacles.iter().map(|o| o.rect.left()).collect();
            lefts.sort_by(f32::total_cmp);
            for pair in lefts.windows(2) {
                prop_assert!(pair[1] - pair[0] >= min_gap - 0.01);
            }
        }
    }
}
