//! HUD text and bar formatting
//!
//! Pure helpers; the browser binary writes their output into the DOM.

use crate::sim::{GameEvent, Milestone, Streak};

pub fn score_text(score: u64) -> String {
    format!("SCORE: {score:05}")
}

pub fn high_score_text(best: u64) -> String {
    format!("HIGHSCORE: {best:05}")
}

/// One of the three heart icons in the lives display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartSlot {
    Full,
    Half,
    Empty,
}

impl HeartSlot {
    pub fn css_class(&self) -> &'static str {
        match self {
            HeartSlot::Full => "full",
            HeartSlot::Half => "half",
            HeartSlot::Empty => "empty",
        }
    }
}

pub fn heart_slots(lives: f32) -> [HeartSlot; 3] {
    std::array::from_fn(|i| {
        let slot = (i + 1) as f32;
        if lives >= slot {
            HeartSlot::Full
        } else if lives + 0.5 >= slot {
            HeartSlot::Half
        } else {
            HeartSlot::Empty
        }
    })
}

/// Streak bar presentation
#[derive(Debug, Clone, PartialEq)]
pub struct StreakBar {
    /// Width in percent
    pub fill_pct: f32,
    /// CSS colour
    pub color: String,
}

/// Blue until 60% of the threshold, then blends to orange by 80% and to red
/// at the threshold
pub fn streak_bar(streak: &Streak) -> StreakBar {
    let threshold = streak.threshold().max(1) as f32;
    let count = streak.count as f32;
    let warm = threshold * 3.0 / 5.0;
    let hot = threshold * 4.0 / 5.0;

    let color = if count <= warm {
        "blue".to_string()
    } else if count <= hot {
        let t = (count - warm) / (hot - warm);
        format!("rgb({},{},0)", (255.0 * t).round(), (165.0 * t).round())
    } else {
        let t = ((count - hot) / (threshold - hot)).min(1.0);
        format!("rgb(255,{},0)", (165.0 - 165.0 * t).round())
    };

    StreakBar {
        fill_pct: streak.fill() * 100.0,
        color,
    }
}

/// Achievement panel row
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneView {
    pub label: String,
    pub fill_pct: f32,
    pub text: String,
}

pub fn milestone_view(name: &str, milestone: &Milestone, value: u64) -> MilestoneView {
    let done = milestone.progress(value);
    MilestoneView {
        label: format!("{}: {name}", milestone.tier),
        fill_pct: done as f32 / milestone.target.max(1) as f32 * 100.0,
        text: format!("{done} / {}", milestone.target),
    }
}

/// Popup text for events that deserve one
pub fn event_message(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::DistanceMilestone { next_target, .. } => Some(format!(
            "Milestone reached! Reach {next_target} for next milestone"
        )),
        GameEvent::ObstacleMilestone { next_target, .. } => Some(format!(
            "Milestone reached! Clear {next_target} obstacles for next milestone"
        )),
        GameEvent::StreakBonus { multiplier } => Some(format!("Streak bonus! x{multiplier}")),
        _ => None,
    }
}

/// A message shown for a fixed time
#[derive(Debug, Clone, Default)]
pub struct Popup {
    pub text: String,
    remaining_ms: f32,
}

impl Popup {
    pub fn show(&mut self, text: String, duration_ms: f32) {
        self.text = text;
        self.remaining_ms = duration_ms;
    }

    /// Count down; returns whether the popup is still visible
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining_ms = (self.remaining_ms - dt).max(0.0);
        self.is_visible()
    }

    pub fn is_visible(&self) -> bool {
        self.remaining_ms > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_padding() {
        assert_eq!(score_text(42), "SCORE: 00042");
        assert_eq!(high_score_text(123456), "HIGHSCORE: 123456");
    }

    #[test]
    fn test_heart_slots() {
        use HeartSlot::*;
        assert_eq!(heart_slots(0.0), [Empty, Empty, Empty]);
        assert_eq!(heart_slots(1.0), [Full, Empty, Empty]);
        assert_eq!(heart_slots(1.5), [Full, Half, Empty]);
        assert_eq!(heart_slots(3.0), [Full, Full, Full]);
    }

    #[test]
    fn test_streak_bar_colors() {
        let mut streak = Streak::new(50, 1.5);
        assert_eq!(streak_bar(&streak).color, "blue");

        streak.count = 35;
        assert_eq!(streak_bar(&streak).color, "rgb(128,83,0)");

        streak.count = 50;
        let bar = streak_bar(&streak);
        assert_eq!(bar.color, "rgb(255,0,0)");
        assert_eq!(bar.fill_pct, 100.0);

        streak.count = 80;
        assert_eq!(streak_bar(&streak).fill_pct, 100.0);
    }

    #[test]
    fn test_milestone_view() {
        let m = Milestone::new(250, 250);
        let view = milestone_view("Distance", &m, 100);
        assert_eq!(view.label, "1: Distance");
        assert_eq!(view.text, "100 / 250");
        assert!((view.fill_pct - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_event_messages() {
        let msg = event_message(&GameEvent::DistanceMilestone {
            tier: 2,
            next_target: 500,
        });
        assert_eq!(
            msg.as_deref(),
            Some("Milestone reached! Reach 500 for next milestone")
        );
        assert_eq!(event_message(&GameEvent::Landed), None);
    }

    #[test]
    fn test_popup_expires() {
        let mut popup = Popup::default();
        assert!(!popup.is_visible());
        popup.show("hi".into(), 2000.0);
        assert!(popup.update(1500.0));
        assert!(!popup.update(600.0));
    }
}
