//! Rhythm Platformer entry point
//!
//! Loads settings and assets, opens the window and runs the game loop.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use rhythm_platformer::audio::AudioManager;
use rhythm_platformer::consts::*;
use rhythm_platformer::renderer::{Canvas, RenderState, compose};
use rhythm_platformer::sim::{GameEvent, GameState, TickInput, tick};
use rhythm_platformer::assets::load_music;
use rhythm_platformer::{AssetError, Assets, Settings};

const TITLE: &str = "Rhythm Platformer";

/// Game instance holding all state
struct Game {
    state: GameState,
    assets: Assets,
    audio: AudioManager,
    canvas: Canvas,
    accumulator: f32,
    last_time: Instant,
    input: TickInput,
    // FPS tracking
    start: Instant,
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Game {
    fn new(seed: u64, assets: Assets, music: Arc<[u8]>, settings: &Settings) -> Self {
        let mut game = Self {
            state: GameState::new(seed),
            assets,
            audio: AudioManager::new(music, settings.effective_music_volume()),
            canvas: Canvas::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32),
            accumulator: 0.0,
            last_time: Instant::now(),
            input: TickInput::default(),
            start: Instant::now(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        };
        game.audio.play();
        game
    }

    /// Queue a jump (or restart) for the next tick
    fn press(&mut self) {
        self.input.jump = true;
    }

    /// Run simulation ticks for the wall time since the last frame
    fn update(&mut self, now: Instant) {
        let dt = now.duration_since(self.last_time).as_secs_f32().min(0.1);
        self.last_time = now;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Too far behind: drop the backlog rather than fast-forwarding
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in self.state.drain_events() {
            self.audio.handle_event(&event);
            match event {
                GameEvent::ObstaclePassed { total } => log::debug!("Obstacles passed: {}", total),
                GameEvent::Jumped | GameEvent::Landed => log::trace!("{:?}", event),
                _ => {}
            }
        }

        // Track frame times for FPS
        let time = now.duration_since(self.start).as_secs_f64();
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = (self.frame_times.len() as f64 / elapsed).round() as u32;
            }
        }
    }

    /// Compose the current frame into the canvas
    fn draw(&mut self) {
        compose(&mut self.canvas, &self.state, &self.assets);
    }
}

struct App {
    settings: Settings,
    game: Game,
    window: Option<Arc<Window>>,
    render: Option<RenderState>,
    /// Startup or rendering failed; exit nonzero
    failed: bool,
}

impl App {
    fn new(settings: Settings, game: Game) -> Self {
        Self {
            settings,
            game,
            window: None,
            render: None,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        log::error!("{}", message);
        eprintln!("{}", message);
        self.failed = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.game.update(Instant::now());
        self.game.draw();

        let Some(render) = self.render.as_mut() else {
            return;
        };
        match render.render(self.game.canvas.as_raw()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => render.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, "Out of GPU memory".to_string());
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if self.settings.show_fps {
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {} FPS", TITLE, self.game.fps));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let scale = self.settings.window_scale;
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(SCREEN_WIDTH * scale, SCREEN_HEIGHT * scale))
            .with_resizable(false);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, format!("Failed to create window: {}", e)),
        };

        let instance = wgpu::Instance::default();
        let surface = match instance.create_surface(window.clone()) {
            Ok(surface) => surface,
            Err(e) => return self.fail(event_loop, format!("Failed to create surface: {}", e)),
        };

        let adapter = match pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        )) {
            Ok(adapter) => adapter,
            Err(e) => return self.fail(event_loop, format!("Failed to get GPU adapter: {}", e)),
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let size = window.inner_size();
        let frame_size = (self.game.canvas.width(), self.game.canvas.height());
        match pollster::block_on(RenderState::new(
            surface,
            &adapter,
            size.width,
            size.height,
            frame_size,
        )) {
            Ok(render) => self.render = Some(render),
            Err(e) => return self.fail(event_loop, format!("Failed to create GPU device: {}", e)),
        }

        // Don't count window creation time as game time
        self.game.last_time = Instant::now();
        window.request_redraw();
        self.window = Some(window);
        log::info!("Rhythm Platformer running!");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Space),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.game.press(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.game.press(),
            WindowEvent::Resized(new_size) => {
                if let Some(render) = self.render.as_mut() {
                    render.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Everything startup needs from disk; any failure is fatal
fn load_assets(dir: &std::path::Path) -> Result<(Assets, Arc<[u8]>), AssetError> {
    Ok((Assets::load(dir)?, load_music(dir)?))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rhythm Platformer starting...");

    let settings = Settings::load();

    let (assets, music) = match load_assets(&settings.asset_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Asset loading failed: {}", e);
            eprintln!("Couldn't load game assets: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let seed = settings.seed.unwrap_or_else(clock_seed);
    let game = Game::new(seed, assets, music, &settings);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings, game);
    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
