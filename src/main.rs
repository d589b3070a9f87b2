//! Pollo Loco entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use pollo_loco::audio::WebAudioSink;
    use pollo_loco::consts::*;
    use pollo_loco::persistence::LocalStorageStore;
    use pollo_loco::platform::TouchButton;
    use pollo_loco::renderer::{RenderState, VertexCanvas};
    use pollo_loco::sim::{GamePhase, LEVEL_COUNT};
    use pollo_loco::{LifecycleHooks, Session};

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    /// End screens live in the page's DOM
    struct DomHooks;

    impl LifecycleHooks for DomHooks {
        fn on_game_over(&mut self, level: u32) {
            set_text("over-level", &level.to_string());
            set_visible("game-over", true);
        }

        fn on_level_won(&mut self, level: u32, coins: u32, new_best: bool) {
            set_text("won-level", &level.to_string());
            set_text("won-coins", &coins.to_string());
            set_visible("new-best", new_best);
            set_visible("next-btn", level < LEVEL_COUNT);
            set_visible("level-won", true);
        }
    }

    type WebSession = Session<WebAudioSink, DomHooks>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        render_state: Option<RenderState>,
        canvas: VertexCanvas,
        last_time: f64,
    }

    impl Game {
        fn start(&mut self, level: u32) {
            match self.session.start_level(level) {
                Ok(()) => {
                    for id in ["menu", "game-over", "level-won", "pause-menu"] {
                        set_visible(id, false);
                    }
                    set_visible("hud", true);
                }
                Err(e) => log::error!("Cannot start level {level}: {e}"),
            }
        }

        fn current_level(&self) -> u32 {
            self.session.world().map_or(1, |w| w.level_number)
        }

        fn quit_to_menu(&mut self) {
            self.session.quit_to_menu();
            for id in ["hud", "game-over", "level-won", "pause-menu"] {
                set_visible(id, false);
            }
            set_visible("menu", true);
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            self.session.draw(&mut self.canvas);
            match render_state.render(self.canvas.vertices(), self.canvas.clear_color()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {e:?}"),
            }
        }

        fn sync_pause_menu(&self) {
            set_visible("pause-menu", self.session.phase() == Some(GamePhase::Paused));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Pollo Loco starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        set_visible("loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (f64::from(canvas.client_width()) * dpr) as u32;
        let height = (f64::from(canvas.client_height()) * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            Box::new(LocalStorageStore::new()),
            WebAudioSink::new(),
            DomHooks,
            seed,
        );
        if let Some(furthest) = session.records().furthest_level() {
            set_text("furthest-level", &furthest.to_string());
        }
        set_visible("touch-controls", session.settings().touch_controls);

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            canvas: VertexCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            last_time: 0.0,
        }));

        log::info!("Game initialized with seed: {seed}");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, (CANVAS_WIDTH, CANVAS_HEIGHT))
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone())?;
        setup_touch_buttons(game.clone());
        setup_menu_buttons(game.clone());
        setup_auto_pause(game.clone())?;

        set_visible("menu", true);
        request_animation_frame(game);

        log::info!("Pollo Loco running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // First gesture unlocks audio
                g.session.audio_mut().resume();
                let key = event.key();
                if key == "m" || key == "M" {
                    let muted = g.session.toggle_mute();
                    log::info!("Muted: {muted}");
                    return;
                }
                if g.session.input_mut().key_down(&key) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().session.input_mut().key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let buttons = [
            ("touch-left", TouchButton::Left),
            ("touch-right", TouchButton::Right),
            ("touch-jump", TouchButton::Jump),
            ("touch-throw", TouchButton::Throw),
            ("touch-pause", TouchButton::Pause),
        ];

        for (id, button) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [
                ("pointerdown", true),
                ("pointerup", false),
                ("pointerleave", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.session.audio_mut().resume();
                    g.session.input_mut().touch(button, pressed);
                });
                let _ = el.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn on_click(id: &str, game: &Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            g.session.audio_mut().resume();
            action(&mut g);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", &game, |g| g.start(1));
        on_click("restart-btn", &game, |g| {
            let level = g.current_level();
            g.start(level);
        });
        on_click("next-btn", &game, |g| {
            let next = (g.current_level() + 1).min(LEVEL_COUNT);
            g.start(next);
        });
        on_click("resume-btn", &game, |g| {
            g.session.resume();
            g.sync_pause_menu();
        });
        on_click("menu-btn", &game, Game::quit_to_menu);
        on_click("mute-btn", &game, |g| {
            g.session.toggle_mute();
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.session.focus_lost();
                    g.sync_pause_menu();
                }
            });
            document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside). Keys released while unfocused never reach us.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.session.focus_lost();
                g.sync_pause_menu();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.focus_gained();
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let was_paused = g.session.phase() == Some(GamePhase::Paused);
            g.session.update(dt);
            if was_paused != (g.session.phase() == Some(GamePhase::Paused)) {
                g.sync_pause_menu();
            }
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pollo_loco::audio::NullSink;
    use pollo_loco::consts::SIM_DT;
    use pollo_loco::persistence::FileStore;
    use pollo_loco::sim::GamePhase;
    use pollo_loco::{LifecycleHooks, Session};

    /// Log the end of the attempt
    struct LogHooks;

    impl LifecycleHooks for LogHooks {
        fn on_game_over(&mut self, level: u32) {
            log::info!("Game over on level {level}");
        }

        fn on_level_won(&mut self, level: u32, coins: u32, new_best: bool) {
            log::info!("Level {level} won with {coins} coins (new best: {new_best})");
        }
    }

    env_logger::init();
    log::info!("Pollo Loco (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let level = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);
    let store = FileStore::new(std::env::temp_dir().join("pollo-loco"));
    let mut session = Session::new(Box::new(store), NullSink, LogHooks, 42);

    if let Err(e) = session.start_level(level) {
        log::error!("Cannot start level {level}: {e}");
        std::process::exit(1);
    }

    // Run right, throwing whenever a bottle is ready and hopping now and then
    session.input_mut().key_down("ArrowRight");
    session.input_mut().key_down("f");
    let max_frames = 60 * 180;
    for frame in 0..max_frames {
        if frame % 90 == 0 {
            session.input_mut().key_down(" ");
        } else if frame % 90 == 10 {
            session.input_mut().key_up(" ");
        }
        session.update(SIM_DT);
        if matches!(session.phase(), Some(GamePhase::GameOver | GamePhase::Won)) {
            break;
        }
    }

    if let Some(world) = session.world() {
        log::info!(
            "Finished after {} ticks: {:?}, health {}, coins {}/{}, hits taken {}",
            world.time_ticks,
            world.phase,
            world.hud.health,
            world.hud.coins,
            world.hud.total_coins,
            world.hits_taken,
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
