//! Jelly Tower entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use jelly_tower::Settings;
    use jelly_tower::consts::SIM_DT;
    use jelly_tower::renderer::{RenderState, build_scene};
    use jelly_tower::sim::{GameSession, TapEvent, client_to_canvas};
    use jelly_tower::ui::{ElementText, ScoreDisplay, block_count_display};

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        render_state: Option<RenderState>,
        score: ScoreDisplay<ElementText>,
        canvas: HtmlCanvasElement,
        last_time: f64,
    }

    impl Game {
        /// Drop a block for a tap, if the cooldown allows
        fn tap(&mut self, tap: TapEvent) {
            match self.session.handle_tap(&tap, now_ms()) {
                Ok(Some(_)) => self.score.update_block_count(self.session.block_count()),
                Ok(None) => {}
                Err(e) => log::error!("Tap failed: {}", e),
            }
        }

        /// Re-measure the window and resize session, canvas and surface
        fn resize(&mut self) {
            let (w, h) = window_size();
            if let Err(e) = self.session.handle_resize(w, h) {
                log::error!("Resize failed: {}", e);
                return;
            }

            let vp = self.session.viewport();
            let logical = (vp.width, vp.height);
            let (width, height) = size_canvas(&self.canvas, logical);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, logical);
            }
        }

        /// Run timers and physics for one animation frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            match self.session.update(time, dt) {
                Ok(report) => {
                    if report.links_created > 0 {
                        log::debug!("{} links created", report.links_created);
                    }
                    if report.resize_due {
                        self.resize();
                    }
                }
                Err(e) => log::error!("Update failed: {}", e),
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let show_constraints = self.session.settings().show_constraints;
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(self.session.world(), show_constraints);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    /// Host clock in milliseconds (same origin as animation frame times)
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn window_size() -> (f32, f32) {
        let window = web_sys::window().expect("no window");
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w as f32, h as f32)
    }

    /// Set the canvas CSS size and its backing store (device pixels)
    fn size_canvas(canvas: &HtmlCanvasElement, logical: (f32, f32)) -> (u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", logical.0));
        let _ = style.set_property("height", &format!("{}px", logical.1));

        let width = (logical.0 as f64 * dpr) as u32;
        let height = (logical.1 as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn load_settings() -> Settings {
        let mut settings = Settings::load();
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if settings.apply_query(&query) {
            settings.save();
        }
        settings
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Jelly Tower starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = load_settings();
        let seed = js_sys::Date::now() as u64;
        let (w, h) = window_size();
        let mut session = GameSession::new(settings, seed, w, h);
        session.init().expect("Failed to build initial tower");

        let mut score = block_count_display(&document);
        score.update_block_count(session.block_count());

        let logical = (session.viewport().width, session.viewport().height);
        let (width, height) = size_canvas(&canvas, logical);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, logical).await;

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: Some(render_state),
            score,
            canvas: canvas.clone(),
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Jelly Tower running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let pos = client_to_canvas(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    rect.left() as f32,
                    rect.top() as f32,
                );
                game.borrow_mut().tap(TapEvent::Pointer { pos });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let touches = event.touches();
                let points = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .map(|touch| {
                        client_to_canvas(
                            Vec2::new(touch.client_x() as f32, touch.client_y() as f32),
                            rect.left() as f32,
                            rect.top() as f32,
                        )
                    })
                    .collect();
                game.borrow_mut().tap(TapEvent::Touch { points });
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Window resize: re-measure immediately
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Orientation change: dimensions settle a moment later
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().session.request_settled_resize(now_ms());
            });
            let _ = window.add_event_listener_with_callback(
                "orientationchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
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
    log::info!("Jelly Tower (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Build a tower, drop a few blocks and let it settle
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use glam::Vec2;
    use jelly_tower::consts::SIM_DT;
    use jelly_tower::sim::{GameSession, TapEvent};
    use jelly_tower::ui::ScoreDisplay;

    let mut settings = jelly_tower::Settings::load();
    let args: Vec<String> = std::env::args().skip(1).collect();
    settings.apply_query(&args.join("&"));

    let mut session = GameSession::new(settings, 42, 800.0, 660.0);
    if let Err(e) = session.init() {
        log::error!("Failed to build tower: {}", e);
        return;
    }

    let mut score = ScoreDisplay::new(String::new());
    score.update_block_count(session.block_count());

    let frame_ms = f64::from(SIM_DT) * 1000.0;
    let mut links = 0;
    for frame in 0..600u32 {
        let now = f64::from(frame) * frame_ms;
        if frame % 60 == 0 {
            let x = 300.0 + (frame / 60) as f32 * 20.0;
            let tap = TapEvent::Pointer {
                pos: Vec2::new(x, 0.0),
            };
            match session.handle_tap(&tap, now) {
                Ok(Some(_)) => score.update_block_count(session.block_count()),
                Ok(None) => {}
                Err(e) => log::error!("Tap failed: {}", e),
            }
        }
        match session.update(now, SIM_DT) {
            Ok(report) => links += report.links_created,
            Err(e) => log::error!("Update failed: {}", e),
        }
    }
    session.shutdown();

    println!(
        "{} tower: {} blocks, {} links created",
        session.variant().as_str(),
        score.sink(),
        links
    );
}
