//! Sphere Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent};

    use sphere_runner::platform::InputState;
    use sphere_runner::renderer::SceneFrame;
    use sphere_runner::sim::{GameEvent, GamePhase, GameState, tick};
    use sphere_runner::ui::{self, Flash, HudSnapshot, Panel, PanelVisibility};
    use sphere_runner::{HighScore, Settings, clamp_frame_dt};

    // JS bindings for pointer lock and the scene graph
    #[wasm_bindgen(inline_js = "
        export function lock_pointer() {
            if (document.pointerLockElement === document.body) return Promise.resolve();
            return new Promise((resolve, reject) => {
                function onChange() {
                    if (document.pointerLockElement === document.body) {
                        document.removeEventListener('pointerlockchange', onChange);
                        resolve();
                    }
                }
                document.addEventListener('pointerlockchange', onChange);
                document.body.requestPointerLock?.();
                setTimeout(() => {
                    if (document.pointerLockElement !== document.body) {
                        document.removeEventListener('pointerlockchange', onChange);
                        reject(new Error('pointer lock timed out'));
                    }
                }, 600);
            });
        }

        export function unlock_pointer() {
            if (document.pointerLockElement) document.exitPointerLock?.();
        }

        export function sync_scene(instances, camera, sky_x, sky_y) {
            const scene = window.sphereRunnerScene;
            if (scene) scene.sync(instances, camera, sky_x, sky_y);
        }
    ")]
    extern "C" {
        fn lock_pointer() -> js_sys::Promise;
        fn unlock_pointer();
        fn sync_scene(instances: &[f32], camera: &[f32], sky_x: f32, sky_y: f32);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        settings: Settings,
        last_time: f64,
        /// Seconds since load; drives background animation in every phase
        world_time: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase/panels to touch the DOM only on change
        last_phase: GamePhase,
        last_panels: Option<PanelVisibility>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let high_score = HighScore::load();
            Self {
                state: GameState::new(seed, high_score),
                input: InputState::new(),
                settings: Settings::load(),
                last_time: 0.0,
                world_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Menu,
                last_panels: None,
            }
        }

        /// Advance the simulation by one rendered frame
        fn update(&mut self, dt: f32, time: f64) {
            let dt = clamp_frame_dt(dt);
            self.world_time += dt;

            let input = self.input.take_tick_input(&self.settings);
            tick(&mut self.state, &input, dt);

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

            // Leaving play gives the mouse back
            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                if self.last_phase == GamePhase::Playing {
                    unlock_pointer();
                }
                self.last_phase = current_phase;
            }
        }

        /// Hand transforms to the scene graph
        fn render(&self) {
            let frame = SceneFrame::capture(&self.state, self.world_time);
            sync_scene(
                frame.instance_floats(),
                frame.camera_floats(),
                frame.sky_rotation[0],
                frame.sky_rotation[1],
            );
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let panels = PanelVisibility::of(&self.state);
            if self.last_panels != Some(panels) {
                for panel in Panel::ALL {
                    set_visible(document, panel.element_id(), panels.is_visible(panel));
                }
                if panels.pause {
                    set_text(document, "pauseStats", &ui::pause_stats(&self.state));
                }
                if panels.game_over {
                    set_text(document, "overStats", &ui::game_over_stats(&self.state));
                }
                self.last_panels = Some(panels);
            }

            let events = self.state.drain_events();
            for flash in ui::flashes_for(&events, &self.settings) {
                play_flash(document, flash);
            }
            for event in &events {
                if let GameEvent::GameOver { score, new_best } = event {
                    log::info!("Run over: {} points{}", score, if *new_best { ", new best!" } else { "" });
                }
            }

            if self.state.phase == GamePhase::Playing {
                self.write_hud(document);
            }
        }

        /// Fill the HUD readouts from the current session
        fn write_hud(&self, document: &Document) {
            let hud = HudSnapshot::capture(&self.state);
            set_text(document, "score", &hud.score.to_string());
            set_text(document, "high", &hud.high_score.to_string());
            set_text(document, "time", &hud.time);
            set_text(document, "ammo", hud.ammo);
            set_bar_width(document, "hpbar", hud.health_percent);
            set_bar_width(document, "stbar", hud.stamina_percent);
            if self.settings.show_fps {
                set_text(document, "fps", &self.fps.to_string());
            }
        }
    }

    fn set_bar_width(document: &Document, id: &str, percent: f32) {
        if let Some(bar) = html_element(document, id) {
            let _ = bar.style().set_property("width", &format!("{}%", percent));
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Apply a transient style and undo it after the flash duration
    fn play_flash(document: &Document, flash: Flash) {
        let (target, property, on, off) = match flash {
            Flash::Score => (html_element(document, "score"), "transform", "scale(1.2)".to_string(), "scale(1)"),
            Flash::Damage => (document.body(), "background-color", "rgba(255,0,0,0.2)".to_string(), ""),
            Flash::Pickup(kind) => (html_element(document, "ammo"), "color", ui::pickup_color(kind).to_string(), ""),
        };
        let Some(el) = target else {
            return;
        };
        let _ = el.style().set_property(property, &on);

        let revert = Closure::once_into_js(move || {
            let _ = el.style().set_property(property, off);
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                revert.unchecked_ref(),
                flash.duration_ms(),
            );
        }
    }

    /// Ask for the pointer lock; the session decides what a grant means
    fn acquire_pointer_lock(game: Rc<RefCell<Game>>) {
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(lock_pointer()).await {
                Ok(_) => game.borrow_mut().state.pointer_lock_acquired(),
                Err(e) => {
                    log::warn!("Pointer lock request failed: {:?}", e);
                    game.borrow_mut().state.pointer_lock_failed();
                }
            }
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sphere Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);
        // Write back sanitized values so stored settings stay usable
        game.borrow().settings.save();

        setup_input_handlers(&document, game.clone());
        setup_menu_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        {
            let mut g = game.borrow_mut();
            g.write_hud(&document);
            g.update_hud(&document);
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Sphere Runner running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Pointer lock change
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let locked = document.pointer_lock_element().is_some();
                let mut g = game.borrow_mut();
                g.input.set_pointer_locked(locked);
                if !locked {
                    g.state.pointer_lock_released();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "pointerlockchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_down(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse look (relative, only counted while locked)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .mouse_move(event.movement_x() as f32, event.movement_y() as f32);
            });
            let _ = document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Fire
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.mouse_down(event.button());
                }
            });
            let _ = window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "btnPlay", move || {
                game.borrow_mut().state.request_start();
                acquire_pointer_lock(game.clone());
            });
        }
        {
            let game = game.clone();
            on_click(document, "btnHow", move || game.borrow_mut().state.set_show_how_to(true));
        }
        {
            let game = game.clone();
            on_click(document, "btnBack", move || game.borrow_mut().state.set_show_how_to(false));
        }
        {
            let game = game.clone();
            on_click(document, "btnResume", move || {
                game.borrow_mut().state.request_resume();
                acquire_pointer_lock(game.clone());
            });
        }
        for id in ["btnRestart", "btnRetry"] {
            let game = game.clone();
            on_click(document, id, move || {
                game.borrow_mut().state.restart();
                acquire_pointer_lock(game.clone());
            });
        }
        for id in ["btnQuit", "btnMenu"] {
            let game = game.clone();
            on_click(document, id, move || {
                game.borrow_mut().state.quit_to_menu();
                unlock_pointer();
            });
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.state.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur: keyups will not arrive
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sphere Runner (native) starting...");
    log::info!("The game itself runs in the browser - build for wasm32 and serve index.html");

    let seed = std::env::var("SPHERE_RUNNER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    headless_run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a scripted run without rendering and report how it went
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(seed: u64) {
    use glam::Vec2;
    use sphere_runner::HighScore;
    use sphere_runner::renderer::SceneFrame;
    use sphere_runner::sim::{GamePhase, GameState, TickInput, tick};
    use sphere_runner::ui::HudSnapshot;

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 180;

    let mut state = GameState::new(seed, HighScore::load());
    state.request_start();
    state.pointer_lock_acquired();

    let mut frames = 0;
    while state.phase == GamePhase::Playing && frames < MAX_FRAMES {
        // Circle-strafe and keep the trigger down
        let input = TickInput {
            forward: 1.0,
            right: if (frames / 120) % 2 == 0 { 1.0 } else { -1.0 },
            sprint: frames % 300 < 60,
            dash: frames % 240 == 0,
            look: Vec2::new(0.01, 0.0),
            fire: true,
            pause: false,
        };
        tick(&mut state, &input, FRAME_DT);
        frames += 1;
    }
    if state.phase == GamePhase::Playing {
        state.end_game(false);
    }

    let hud = HudSnapshot::capture(&state);
    let scene = SceneFrame::capture(&state, frames as f32 * FRAME_DT);
    println!("Seed:        {}", state.seed);
    println!("Survived:    {}", hud.time);
    println!("Score:       {} (best {})", hud.score, hud.high_score);
    println!("Kills:       {}", state.kills);
    println!("Health:      {:.0}%", hud.health_percent);
    println!("Difficulty:  {:.2}", state.enemies.difficulty);
    println!("On screen:   {} instances", scene.instances.len());
}
