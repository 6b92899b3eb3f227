//! 2D canvas backend
//!
//! Executes a draw list on a `CanvasRenderingContext2d`. Images are taken
//! from `<img>` elements already in the page; one that is missing or not yet
//! loaded is replaced by a flat silhouette (backdrop) or skipped (runner).

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::parallax::Backdrop;
use super::scene::DrawCmd;
use crate::consts::RUNNER_FRAMES;

const GROUND_COLOR: &str = "#000";
const OBSTACLE_COLOR: &str = "#e53e3e";
const DUST_COLOR: &str = "#555";
const SILHOUETTE_COLORS: [&str; 3] = ["#c9d6e3", "#9fb3c8", "#6b7f95"];

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    layer_images: Vec<Option<HtmlImageElement>>,
    runner_frames: Vec<Option<HtmlImageElement>>,
}

fn find_image(document: &Document, id: &str) -> Option<HtmlImageElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
}

fn ready(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref().filter(|i| i.complete() && i.natural_width() > 0)
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, backdrop: &Backdrop) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let layer_images = backdrop
            .layers
            .iter()
            .map(|l| find_image(&document, &l.image_id))
            .collect();
        let runner_frames = (0..RUNNER_FRAMES)
            .map(|i| find_image(&document, &format!("frame_{i}")))
            .collect();

        Ok(Self {
            canvas,
            ctx,
            layer_images,
            runner_frames,
        })
    }

    pub fn resize(&self, w: u32, h: u32) {
        self.canvas.set_width(w);
        self.canvas.set_height(h);
    }

    /// Copy loaded image proportions into the backdrop layers
    pub fn sync_backdrop(&self, backdrop: &mut Backdrop) {
        for (i, img) in self.layer_images.iter().enumerate() {
            if let Some(img) = ready(img) {
                backdrop.set_aspect(i, img.natural_height() as f32 / img.natural_width() as f32);
            }
        }
    }

    pub fn draw(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { w, h } => ctx.clear_rect(0.0, 0.0, *w as f64, *h as f64),
                DrawCmd::Backdrop { layer, rect } => {
                    let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                    match self.layer_images.get(*layer).and_then(ready) {
                        Some(img) => {
                            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)?
                        }
                        None => {
                            let last = SILHOUETTE_COLORS.len() - 1;
                            let color = SILHOUETTE_COLORS[(*layer).min(last)];
                            ctx.set_fill_style_str(color);
                            ctx.fill_rect(x, y, w, h);
                        }
                    }
                }
                DrawCmd::Ground(rect) => {
                    ctx.set_fill_style_str(GROUND_COLOR);
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCmd::Obstacle(rect) => {
                    ctx.set_fill_style_str(OBSTACLE_COLOR);
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCmd::Heart { center, size } => {
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.set_font(&format!("{size}px serif"));
                    ctx.fill_text("\u{2764}\u{fe0f}", center.x as f64, center.y as f64)?;
                }
                DrawCmd::Dust {
                    center,
                    radius,
                    alpha,
                } => {
                    ctx.save();
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_fill_style_str(DUST_COLOR);
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    ctx.fill();
                    ctx.restore();
                }
                DrawCmd::Runner { rect, frame } => {
                    if let Some(img) = self.runner_frames.get(*frame).and_then(ready) {
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(
                            img,
                            rect.x as f64,
                            rect.y as f64,
                            rect.w as f64,
                            rect.h as f64,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}
