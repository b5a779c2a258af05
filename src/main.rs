//! Moon Lander entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//!
//! The page is expected to provide a `#canvas` element, the HUD and overlay
//! elements referenced below, and optionally `window.paintFrame(json)` and
//! `window.playCue(name)` for drawing and sound.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use moon_lander::platform::{FrameClock, HeldKeys, KeyValueStore, Thruster, default_storage};
    use moon_lander::sim::{GameEvent, GamePhase, GameState, Outcome, tick};
    use moon_lander::{Ruleset, Settings};

    // Bridges to the page's painter and sound hooks; both are optional
    #[wasm_bindgen(inline_js = "
        export function paint_frame(json) {
            if (typeof window.paintFrame === 'function') {
                window.paintFrame(JSON.parse(json));
            }
        }

        export function play_cue(name) {
            if (typeof window.playCue === 'function') {
                window.playCue(name);
            }
        }
    ")]
    extern "C" {
        fn paint_frame(json: &str);
        fn play_cue(name: &str);
    }

    /// Sound cue name for an event
    fn cue_name(event: &GameEvent) -> &'static str {
        match event {
            GameEvent::LevelStarted { .. } => "levelStart",
            GameEvent::ThrusterStarted => "thrustStart",
            GameEvent::ThrusterStopped => "thrustStop",
            GameEvent::Crashed { .. } => "explosion",
            GameEvent::Landed { .. } => "landing",
            GameEvent::NewHighScore { .. } => "highScore",
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        keys: HeldKeys,
        clock: FrameClock,
        settings_store: Box<dyn KeyValueStore>,
        /// Points from the most recent landing, shown on the level-complete overlay
        last_landing: u64,
        /// Phase seen on the previous frame
        last_phase: GamePhase,
    }

    impl Game {
        fn new() -> Self {
            let settings_store = default_storage();
            let settings = Settings::load(settings_store.as_ref());
            Self {
                state: GameState::new(settings, default_storage()),
                keys: HeldKeys::default(),
                clock: FrameClock::new(),
                settings_store,
                last_landing: 0,
                last_phase: GamePhase::Menu,
            }
        }

        /// Advance one animation frame
        fn frame(&mut self, now_ms: f64) {
            let elapsed = self.clock.advance(now_ms);
            let input = self.keys.to_tick_input();

            if let Some(outcome) = tick(&mut self.state, &input, elapsed) {
                if outcome != Outcome::Clear {
                    log::debug!("Round ended: {:?}", outcome);
                }
            }

            let muted = self.state.settings.muted;
            for event in self.state.drain_events() {
                if let GameEvent::Landed { score, .. } = event {
                    self.last_landing = score;
                }
                if !muted {
                    play_cue(cue_name(&event));
                }
            }

            if self.state.phase != self.last_phase {
                log::debug!("Phase {} -> {}", self.last_phase.as_str(), self.state.phase.as_str());
                self.last_phase = self.state.phase;
            }

            match serde_json::to_string(&self.state.snapshot()) {
                Ok(json) => paint_frame(&json),
                Err(e) => log::warn!("Snapshot not serialized: {e}"),
            }
        }

        /// Start, or continue after a landing; ignored mid-flight
        fn start(&mut self) {
            match self.state.start_from_menu() {
                Ok(true) => self.clock.reset(),
                Ok(false) => {}
                Err(e) => log::error!("Could not start level: {e}"),
            }
        }

        /// Back to the title screen after a crash
        fn restart(&mut self) {
            if self.state.restart_from_game_over() {
                self.keys.clear();
            }
        }

        fn toggle_sound(&mut self) {
            let muted = self.state.settings.toggle_mute();
            self.state.settings.save(self.settings_store.as_mut());
            log::info!("Sound: {}", if muted { "off" } else { "on" });
        }

        fn toggle_ruleset(&mut self) {
            if self.state.phase != GamePhase::Menu {
                return;
            }
            let ruleset = match self.state.settings.ruleset {
                Ruleset::Classic => Ruleset::Multipad,
                Ruleset::Multipad => Ruleset::Classic,
            };
            self.state.settings.ruleset = ruleset;
            self.state.settings.save(self.settings_store.as_mut());
            log::info!("Ruleset: {}", ruleset.as_str());
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            let snap = self.state.snapshot();
            let hud = snap.hud;

            set_text(&document, "#hud-speed .hud-value", &format!("{:.1}", hud.speed));
            set_text(&document, "#hud-vx .hud-value", &format!("{:.1}", hud.horizontal_speed));
            set_text(&document, "#hud-vy .hud-value", &format!("{:.1}", hud.vertical_speed));
            set_text(&document, "#hud-fuel .hud-value", &format!("{:.0}%", hud.fuel_percent));
            set_text(&document, "#hud-score .hud-value", &snap.score.to_string());
            set_text(&document, "#hud-level .hud-value", &snap.level.to_string());
            set_text(&document, "#hud-high-score .hud-value", &snap.high_score.to_string());

            if let Some(el) = document.get_element_by_id("hud-fuel") {
                let class = if hud.low_fuel { "hud-item low" } else { "hud-item" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(body) = document.body() {
                let _ = body.set_attribute("data-phase", snap.phase.as_str());
            }

            show(&document, "hud", snap.phase != GamePhase::Menu);
            show(&document, "menu", snap.phase == GamePhase::Menu);
            show(&document, "game-over", snap.phase == GamePhase::GameOver);
            show(&document, "level-complete", snap.phase == GamePhase::LevelComplete);

            match snap.phase {
                GamePhase::Menu => {
                    let label = match self.state.settings.ruleset {
                        Ruleset::Classic => "Classic: one pad, land under V 2 / H 1.5",
                        Ruleset::Multipad => "Multipad: up to three pads, land under V 3 / H 2",
                    };
                    if let Some(el) = document.get_element_by_id("ruleset-label") {
                        el.set_text_content(Some(label));
                    }
                    if let Some(el) = document.get_element_by_id("sound-btn") {
                        let text = if self.state.settings.muted { "SOUND: OFF" } else { "SOUND: ON" };
                        el.set_text_content(Some(text));
                    }
                }
                GamePhase::GameOver => {
                    if let Some(el) = document.get_element_by_id("final-score") {
                        el.set_text_content(Some(&snap.score.to_string()));
                    }
                    if let Some(el) = document.get_element_by_id("final-level") {
                        el.set_text_content(Some(&snap.level.to_string()));
                    }
                }
                GamePhase::LevelComplete => {
                    if let Some(el) = document.get_element_by_id("landing-score") {
                        el.set_text_content(Some(&self.last_landing.to_string()));
                    }
                }
                GamePhase::Playing => {}
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Match the canvas backing size to its CSS size and use it as the viewport
    fn fit_canvas(canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>) {
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        game.borrow_mut()
            .state
            .set_viewport(width as f32, height as f32);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Moon Lander starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let game = Rc::new(RefCell::new(Game::new()));
        fit_canvas(&canvas, &game);

        setup_input_handlers(game.clone());
        setup_resize_handler(canvas, game.clone());
        setup_visibility_handler(game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game);

        log::info!("Moon Lander running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Thrust keys are held; only they suppress the browser default (scrolling)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.press(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Thruster::from_key(&key).is_some() {
                    event.prevent_default();
                }
                game.borrow_mut().keys.release(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&canvas, &game);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// A hidden tab stops rAF; restart timing on return instead of one huge frame
    fn setup_visibility_handler(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.clock.reset();
            g.keys.clear();
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                action(&mut game.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        on_click(&document, "start-btn", game.clone(), Game::start);
        on_click(&document, "next-btn", game.clone(), Game::start);
        on_click(&document, "restart-btn", game.clone(), Game::restart);
        on_click(&document, "ruleset-btn", game.clone(), Game::toggle_ruleset);
        on_click(&document, "sound-btn", game, Game::toggle_sound);
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
            g.frame(time);
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

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use moon_lander::consts::NOMINAL_FRAME_MS;
    use moon_lander::platform::default_storage;
    use moon_lander::sim::{GameState, Outcome, TickInput, tick};
    use moon_lander::{Ruleset, Settings};

    env_logger::init();
    log::info!("Moon Lander (native) starting...");
    log::info!("Native mode runs a headless descent - build for wasm32 to play");

    let ruleset = match std::env::args().nth(1) {
        Some(name) => Ruleset::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown ruleset '{name}', using the default");
            Ruleset::default()
        }),
        None => Ruleset::default(),
    };

    let mut state = GameState::new(Settings::from_ruleset(ruleset), default_storage());
    if let Err(e) = state.start_game() {
        log::error!("Could not start game: {e}");
        std::process::exit(1);
    }

    // Simple autopilot: brake whenever the descent gets fast
    let limit = ruleset.safe_vertical_speed() * 0.5;
    let mut frames = 0u32;
    let outcome = loop {
        let input = TickInput {
            down: state.ship.vel.y > limit,
            ..Default::default()
        };
        frames += 1;
        match tick(&mut state, &input, NOMINAL_FRAME_MS) {
            Some(Outcome::Clear) => continue,
            Some(outcome) => break outcome,
            None => break Outcome::Clear,
        }
    };

    println!(
        "{} descent after {} frames: {:?} (score {}, fuel {:.0})",
        ruleset.as_str(),
        frames,
        outcome,
        state.score,
        state.fuel
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
