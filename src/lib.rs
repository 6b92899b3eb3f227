//! Skyline Runner - An endless rooftop runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, player physics, scoring)
//! - `tuning`: Data-driven game balance (both shipped variants as presets)
//! - `renderer`: Back-to-front draw list and 2D canvas backend
//! - `platform`: Browser/native platform abstraction (storage)
//! - `ui`: HUD text and bar formatting

pub mod highscore;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscore::HighScore;
pub use settings::Settings;
pub use tuning::{LifeLossRule, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta (ms) fed to the simulation; longer gaps are clamped
    pub const MAX_FRAME_DT_MS: f32 = 100.0;
    /// Frame delta used for the very first frame after a clock reset
    pub const DEFAULT_FRAME_DT_MS: f32 = 1000.0 / 60.0;

    /// Number of frames in the runner sprite cycle
    pub const RUNNER_FRAMES: u64 = 9;
    /// Ticks each runner frame is shown for
    pub const RUNNER_FRAME_TICKS: u64 = 3;

    /// How long a milestone popup stays visible (ms)
    pub const POPUP_DURATION_MS: f32 = 2000.0;

    /// Storage keys
    pub const HIGH_SCORE_KEY: &str = "skyline_runner_high_score";
    pub const SETTINGS_KEY: &str = "skyline_runner_settings";
}
