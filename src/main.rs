//! Skyline Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use skyline_runner::consts::POPUP_DURATION_MS;
    use skyline_runner::platform::LocalStore;
    use skyline_runner::renderer::{Backdrop, CanvasRenderer, build_scene};
    use skyline_runner::sim::{FrameClock, GameEvent, GamePhase, GameState, TickInput, tick};
    use skyline_runner::ui::{self, Popup};
    use skyline_runner::{HighScore, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        input: TickInput,
        settings: Settings,
        high_score: HighScore,
        store: Option<LocalStore>,
        renderer: Option<CanvasRenderer>,
        backdrop: Backdrop,
        popup: Popup,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, view_w: f32, view_h: f32) -> Self {
            let store = match LocalStore::open() {
                Ok(store) => Some(store),
                Err(e) => {
                    log::warn!("LocalStorage unavailable, progress won't persist: {e}");
                    None
                }
            };
            let (settings, high_score) = match &store {
                Some(store) => (Settings::load(store), HighScore::load(store)),
                None => (Settings::default(), HighScore::new()),
            };

            Self {
                state: GameState::new(Tuning::default(), seed, view_w, view_h),
                clock: FrameClock::new(),
                input: TickInput::default(),
                settings,
                high_score,
                store,
                renderer: None,
                backdrop: Backdrop::city(),
                popup: Popup::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one simulation tick
        fn update(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            let input = self.input.clone();
            tick(&mut self.state, &input, dt);

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.pause = false;

            let events = std::mem::take(&mut self.state.events);
            for event in &events {
                self.handle_event(event);
            }

            if self.state.phase == GamePhase::Playing {
                if self.settings.effective_parallax() {
                    self.backdrop.advance(self.state.view.x);
                }
                self.popup.update(dt);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn handle_event(&mut self, event: &GameEvent) {
            if let Some(text) = ui::event_message(event) {
                self.popup.show(text, POPUP_DURATION_MS);
            }
            match event {
                GameEvent::Resumed => self.clock.reset(),
                GameEvent::GameOver { score } => {
                    if let Some(store) = self.store.as_mut() {
                        match self.high_score.submit(*score, store) {
                            Ok(true) => log::info!("New high score: {score}"),
                            Ok(false) => {}
                            Err(e) => log::warn!("Failed to save high score: {e}"),
                        }
                    } else {
                        self.high_score.record(*score);
                    }
                }
                _ => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if self.state.phase == GamePhase::Paused {
                return;
            }
            if let Some(ref renderer) = self.renderer {
                renderer.sync_backdrop(&mut self.backdrop);
                let cmds = build_scene(&self.state, &self.backdrop, &self.settings);
                if let Err(e) = renderer.draw(&cmds) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        fn cycle_quality(&mut self) {
            let quality = self.settings.cycle_quality();
            log::info!("Quality: {}", quality.as_str());
            self.popup
                .show(format!("Quality: {}", quality.as_str()), POPUP_DURATION_MS);
            if let Some(store) = self.store.as_mut() {
                if let Err(e) = self.settings.save(store) {
                    log::warn!("Failed to save settings: {e}");
                }
            }
        }

        fn resize(&mut self, w: u32, h: u32) {
            if let Some(ref renderer) = self.renderer {
                renderer.resize(w, h);
            }
            self.state.resize(w as f32, h as f32);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.state;

            set_text(&document, "score", &ui::score_text(state.score));
            set_text(&document, "highScore", &ui::high_score_text(self.high_score.best));

            if let Some(el) = document.get_element_by_id("lives") {
                let html: String = ui::heart_slots(state.lives.as_f32())
                    .iter()
                    .map(|slot| format!("<span class=\"heart {}\"></span>", slot.css_class()))
                    .collect();
                el.set_inner_html(&html);
            }

            if let Some(bar) = html_element(&document, "streakBar") {
                let streak = ui::streak_bar(&state.streak);
                let style = bar.style();
                let _ = style.set_property("width", &format!("{}%", streak.fill_pct));
                let _ = style.set_property("background-color", &streak.color);
            }

            let distance =
                ui::milestone_view("Distance", &state.distance_milestone, state.distance);
            let obstacles = ui::milestone_view(
                "Obstacles",
                &state.obstacle_milestone,
                state.obstacles_cleared,
            );
            for (prefix, view) in [("distance", distance), ("obstacle", obstacles)] {
                set_text(&document, &format!("{prefix}Label"), &view.label);
                set_text(&document, &format!("{prefix}Text"), &view.text);
                if let Some(bar) = html_element(&document, &format!("{prefix}Bar")) {
                    let _ = bar.style().set_property("width", &format!("{}%", view.fill_pct));
                }
            }

            if let Some(popup) = html_element(&document, "achievementPopup") {
                if self.popup.is_visible() {
                    popup.set_text_content(Some(&self.popup.text));
                }
                let opacity = if self.popup.is_visible() { "1" } else { "0" };
                let _ = popup.style().set_property("opacity", opacity);
            }

            if self.settings.show_fps {
                set_text(&document, "fps", &format!("{} FPS", self.fps));
            }

            let phase = state.phase;
            set_display(&document, "pauseOverlay", phase == GamePhase::Paused, "flex");
            set_display(&document, "restartButton", phase == GamePhase::GameOver, "block");
            set_display(&document, "infoPanel", phase == GamePhase::GameOver, "block");
            set_display(&document, "startButton", phase == GamePhase::Ready, "block");

            if let Some(body) = document.body() {
                let classes = body.class_list();
                let _ = classes.toggle_with_force("start-screen", phase == GamePhase::Ready);
                let _ = classes.toggle_with_force("game-over", phase == GamePhase::GameOver);
            }
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(document: &Document, id: &str, visible: bool, shown: &str) {
        if let Some(el) = html_element(document, id) {
            let _ = el
                .style()
                .set_property("display", if visible { shown } else { "none" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyline Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (width, height) = window_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, width as f32, height as f32)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            match CanvasRenderer::new(canvas, &g.backdrop) {
                Ok(renderer) => g.renderer = Some(renderer),
                Err(e) => log::error!("Canvas setup failed: {:?}", e),
            }
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Skyline Runner running!");
    }

    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        (w as u32, h as u32)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let code = event.code();
            if g.settings.is_jump_key(&code) {
                event.prevent_default();
                g.input.jump = true;
            } else if g.settings.is_pause_key(&code) {
                g.input.pause = true;
            } else if code == "KeyI" {
                g.input.idle_mode = !g.input.idle_mode;
                log::info!("Idle mode: {}", g.input.idle_mode);
            } else if code == "KeyQ" {
                g.cycle_quality();
            }
        });
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Start and restart both act as a jump press
        for id in ["startButton", "restartButton"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().input.jump = true;
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("achievementsButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(panel) = document.get_element_by_id("achievementsPanel") {
                    let _ = panel.class_list().toggle("hidden");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = window_size(&window);
            game.borrow_mut().resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};
    use serde::Serialize;

    use skyline_runner::consts::DEFAULT_FRAME_DT_MS;
    use skyline_runner::platform::FileStore;
    use skyline_runner::sim::{GameState, RunSummary, TickInput, tick};
    use skyline_runner::{HighScore, Tuning};

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum Preset {
        Classic,
        Arcade,
    }

    /// Run the simulation without a browser, with the autopilot playing
    #[derive(Debug, Parser)]
    #[command(name = "skyline-runner", version, about)]
    struct Args {
        /// Balance preset
        #[arg(long, value_enum, default_value = "classic")]
        preset: Preset,

        /// JSON tuning file (overrides --preset)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// RNG seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Simulated seconds at 60 FPS
        #[arg(long, default_value_t = 120)]
        seconds: u64,

        /// Viewport width
        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        /// Viewport height
        #[arg(long, default_value_t = 720.0)]
        height: f32,

        /// JSON file holding the high score between runs
        #[arg(long)]
        high_score: Option<PathBuf>,
    }

    #[derive(Debug, Serialize)]
    struct Report {
        #[serde(flatten)]
        run: RunSummary,
        #[serde(skip_serializing_if = "Option::is_none")]
        high_score: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        new_high_score: Option<bool>,
    }

    fn load_tuning(args: &Args) -> Result<Tuning, Box<dyn std::error::Error>> {
        match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                Ok(Tuning::from_json(&json)?)
            }
            None => Ok(match args.preset {
                Preset::Classic => Tuning::classic(),
                Preset::Arcade => Tuning::arcade(),
            }),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::parse();
        let tuning = load_tuning(&args)?;

        let mut state = GameState::new(tuning, args.seed, args.width, args.height);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        // First autopilot tick leaves Ready
        tick(&mut state, &input, DEFAULT_FRAME_DT_MS);
        let frames = args.seconds * 60;
        for _ in 0..frames {
            tick(&mut state, &input, DEFAULT_FRAME_DT_MS);
            if state.is_game_over() {
                break;
            }
        }

        let mut report = Report {
            run: state.summary(),
            high_score: None,
            new_high_score: None,
        };
        if let Some(path) = &args.high_score {
            let mut store = FileStore::open(path)?;
            let mut best = HighScore::load(&store);
            let improved = best.submit(state.score, &mut store)?;
            if improved {
                log::info!("New high score: {}", best.best);
            }
            report.high_score = Some(best.best);
            report.new_high_score = Some(improved);
        }

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyline Runner (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
