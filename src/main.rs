//! Boxy Run entry point
//!
//! On the web this drives one simulation tick per animation frame and hands
//! each frame's snapshot to the page's renderer. Natively it runs a headless
//! session played by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use boxy_run::platform::{KeyCommand, KeyGate};
    use boxy_run::sim::{
        GameEvent, GamePhase, GameState, InputEvent, TickInput, apply_input, tick,
    };
    use boxy_run::{FrameSnapshot, Rank};

    // The page's renderer registers `window.boxyRunRender(frame)`
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.boxyRunRender === 'function') {
                window.boxyRunRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        keys: KeyGate,
        input: TickInput,
        /// Last frame time in seconds
        now: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed, 0.0),
                keys: KeyGate::new(),
                input: TickInput::default(),
                now: 0.0,
            }
        }

        fn on_key_down(&mut self, code: u32) {
            match self.keys.key_down(code, self.state.phase) {
                Some(KeyCommand::Input(event)) => self.input.push(event),
                Some(KeyCommand::Reset) => self.restart(js_sys::Date::now() as u64),
                None => {}
            }
        }

        fn restart(&mut self, seed: u64) {
            self.state.reset(seed, self.now);
            self.input.clear();
            self.keys.clear();
            if let Some(el) = element("variable-content") {
                el.set_inner_html("Press any key to begin.");
            }
            log::info!("Started new game with seed: {}", seed);
        }

        /// Run one simulation tick for this frame
        fn update(&mut self, time_ms: f64) {
            self.now = time_ms / 1000.0;
            tick(&mut self.state, &self.input, self.now);
            self.input.clear();

            for event in self.state.drain_events() {
                if let GameEvent::GameOver { final_score } = event {
                    self.show_game_over(final_score);
                }
            }
        }

        /// Pause immediately at `now`, flushing input buffered for the next frame
        fn suspend(&mut self, now: f64) {
            for event in std::mem::take(&mut self.input.events) {
                apply_input(&mut self.state, event, now);
            }
            if self.state.phase == GamePhase::Running {
                apply_input(&mut self.state, InputEvent::TogglePause, now);
                log::info!("Auto-paused (tab hidden)");
            }
            self.now = now;
        }

        fn render(&self) {
            match FrameSnapshot::capture(&self.state).to_json() {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Snapshot encode failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            if let Some(el) = element("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = element("variable-content") {
                let hidden = self.state.phase == GamePhase::Running;
                let _ = el.set_attribute(
                    "style",
                    if hidden { "visibility: hidden" } else { "visibility: visible" },
                );
                if self.state.phase == GamePhase::Paused {
                    el.set_inner_html("Game is paused. Press any key to resume.");
                }
            }
        }

        fn show_game_over(&self, final_score: u64) {
            let rank = Rank::for_score(final_score);
            let mut message = format!(
                "Game over! Press the down arrow to try again.<br><b>{}</b> {}",
                rank.range_label(),
                rank.congratulations()
            );
            if let Some(next) = rank.next() {
                message.push_str(&format!(
                    "<br>{}: score within this range to earn the next rank",
                    next.range_label()
                ));
            }
            for lower in Rank::ranks_below(final_score).iter().rev() {
                if let Some(name) = lower.name() {
                    message.push_str(&format!("<br>{} {}", lower.range_label(), name));
                }
            }
            if let Some(el) = element("variable-content") {
                el.set_inner_html(&message);
            }
        }
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Boxy Run starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().on_key_down(event.key_code());
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(event.key_code());
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus changes lose key-up events
        for name in ["focus", "blur"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.clear();
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize). Hidden tabs get no
        // animation frames, so the pause is applied now rather than buffered.
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                let now = (event.time_stamp() / 1000.0).max(g.now);
                g.suspend(now);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Boxy Run (native) starting headless autopilot run...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xB0C5);

    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(message) => {
                log::error!("{}", message);
                std::process::exit(1);
            }
        },
        None => boxy_run::Tuning::default(),
    };

    run_headless(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<boxy_run::Tuning, String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {}", path, e))?;
    boxy_run::Tuning::from_json(&json).map_err(|e| format!("Bad tuning in {}: {}", path, e))
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seed: u64, tuning: boxy_run::Tuning) {
    use boxy_run::Rank;
    use boxy_run::consts::{FRAME_DT, MAX_DEMO_FRAMES};
    use boxy_run::sim::{GameEvent, GameState, InputEvent, TickInput, autopilot, tick};

    let mut state = GameState::with_tuning(seed, 0.0, tuning);
    let mut input = TickInput::default();
    input.push(InputEvent::TogglePause);

    for frame in 0..MAX_DEMO_FRAMES {
        let now = frame as f64 * FRAME_DT;
        tick(&mut state, &input, now);
        input.clear();

        for event in state.drain_events() {
            match event {
                GameEvent::TierReached { level, .. } => println!("tier {} at score {}", level, state.score),
                GameEvent::FogChanged { distance } => log::debug!("fog now {}", distance),
                _ => {}
            }
        }
        if state.is_game_over() {
            break;
        }
        if let Some(event) = autopilot::choose_input(&state) {
            input.push(event);
        }
    }

    let score = state.final_score.unwrap_or(state.score);
    let rank = Rank::for_score(score);
    println!(
        "seed {}: score {} after {} ticks, difficulty {} ({}: {})",
        seed,
        score,
        state.time_ticks,
        state.difficulty,
        rank.range_label(),
        rank.congratulations()
    );
}
