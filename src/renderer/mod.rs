//! Rendering module
//!
//! `scene` builds a back-to-front draw list from the game state; `canvas`
//! paints it on a 2D canvas in the browser.

pub mod parallax;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use parallax::{Backdrop, ParallaxLayer};
pub use scene::{DrawCmd, build_scene};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
