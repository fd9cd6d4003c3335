//! Core engine implementation
//!
//! The engine drives frames: it asks the application whether to keep going,
//! advances frame time, runs the logic pass and then the render pass.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    application::Application,
    config::Config,
    dispatch::{CallbackRegistry, DispatchError},
    foundation::time::{FrameTime, Timer},
    input::InputManager,
};

/// Main engine struct
///
/// Holds the one callback registry of the process along with frame timing and
/// input state.
pub struct Engine {
    /// Callback registry dispatched every frame
    registry: CallbackRegistry,

    /// Frame timing
    timer: Timer,

    /// Input state fed by the application
    input: Rc<RefCell<InputManager>>,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        Ok(Self {
            registry: CallbackRegistry::new(),
            timer: Timer::new(),
            input: Rc::new(RefCell::new(InputManager::new())),
            config,
            running: true,
        })
    }

    /// Run the frame loop with the given application
    ///
    /// `cleanup` and the registry teardown run even when a frame fails; the
    /// failure is returned afterwards.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        let result = engine.run_frames(app);
        if let Err(error) = &result {
            log::error!("Frame loop stopped: {}", error);
        }

        app.cleanup(&mut engine);
        engine.registry.clear();

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            engine.timer.frame_count(),
            engine.timer.average_fps()
        );
        result
    }

    fn run_frames<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting frame loop...");

        while self.running {
            if self.frame_limit_reached() {
                log::info!("Frame limit of {} reached", self.timer.frame_count());
                break;
            }

            let frame_start = Instant::now();
            let keep_running = app
                .begin_frame(self)
                .map_err(|e| EngineError::ApplicationError(format!("App frame start: {e}")))?;
            if !keep_running {
                break;
            }

            self.timer.update();
            self.frame()?;
            app.end_frame(self);
            self.input.borrow_mut().update();

            self.pace(frame_start);
        }
        Ok(())
    }

    /// Run one frame: every logic callback, then every render callback
    pub fn frame(&mut self) -> Result<(), EngineError> {
        let logic = self.registry.dispatch_logic()?;
        let render = self.registry.dispatch_render()?;
        log::trace!(
            "Frame {} ran {} logic and {} render callbacks",
            self.timer.frame_count(),
            logic,
            render
        );
        Ok(())
    }

    /// Run one frame with a fixed time step instead of wall-clock time
    pub fn step(&mut self, delta_time: f32) -> Result<(), EngineError> {
        self.timer.advance_fixed(delta_time);
        self.frame()
    }

    fn frame_limit_reached(&self) -> bool {
        self.config
            .frame
            .max_frames
            .is_some_and(|limit| self.timer.frame_count() >= limit)
    }

    fn pace(&self, frame_start: Instant) {
        let Some(fps) = self.config.frame.target_fps else {
            return;
        };
        let budget = Duration::from_secs_f64(1.0 / f64::from(fps));
        if let Some(remaining) = budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    /// Request engine shutdown after the current frame
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// The callback registry
    pub const fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Shared input state
    pub fn input(&self) -> Rc<RefCell<InputManager>> {
        Rc::clone(&self.input)
    }

    /// Shared view of frame timing for callbacks
    pub fn frame_time(&self) -> FrameTime {
        self.timer.frame_time()
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frame loop configuration
    pub frame: FrameConfig,
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Sleep to hold this rate; `None` runs frames back to back
    pub target_fps: Option<u32>,

    /// Stop after this many frames; `None` runs until the application stops
    pub max_frames: Option<u64>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_fps: Some(60),
            max_frames: None,
        }
    }
}

impl EngineConfig {
    /// Check values serde cannot rule out
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.frame.target_fps == Some(0) {
            return Err(EngineError::ConfigError("target_fps must be greater than zero".to_string()));
        }
        Ok(())
    }
}

impl Config for EngineConfig {}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Callback registry error
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::application::AppError;
    use crate::entity::{Clock, ClockSpawner, Services, SpawnerConfig};
    use crate::foundation::math::Vec2;
    use crate::input::{KeyCode, KeyTrigger, ScriptedTrigger};
    use crate::render::TextCapture;

    fn headless(max_frames: u64) -> EngineConfig {
        EngineConfig {
            frame: FrameConfig {
                target_fps: None,
                max_frames: Some(max_frames),
            },
        }
    }

    #[test]
    fn test_logic_pass_runs_before_render_pass() {
        let mut engine = Engine::new(headless(1)).unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));

        for label in ["render-1", "render-2"] {
            let order = Rc::clone(&order);
            engine.registry().register_render(move || order.borrow_mut().push(label));
        }
        for label in ["logic-1", "logic-2"] {
            let order = Rc::clone(&order);
            engine.registry().register_logic(move || order.borrow_mut().push(label));
        }

        engine.step(1.0 / 60.0).unwrap();

        assert_eq!(*order.borrow(), vec!["logic-1", "logic-2", "render-1", "render-2"]);
    }

    #[test]
    fn test_step_drives_clock() {
        let mut engine = Engine::new(headless(3)).unwrap();
        let capture = Rc::new(TextCapture::new());
        let services = Services::new(engine.frame_time(), capture.clone());
        let clock = Clock::new(engine.registry(), &services, Vec2::zeros());

        for _ in 0..3 {
            engine.step(0.5).unwrap();
        }

        assert_eq!(engine.frame_count(), 3);
        assert_relative_eq!(engine.delta_time(), 0.5);
        assert_eq!(capture.take().last().map(|c| c.text.clone()), Some("1.5".to_string()));
        drop(clock);
        assert_eq!(engine.registry().logic_len(), 0);
    }

    #[test]
    fn test_new_keeps_config() {
        let engine = Engine::new(headless(7)).unwrap();
        assert_eq!(engine.config().frame.max_frames, Some(7));
        assert_eq!(engine.config().frame.target_fps, None);
    }

    #[test]
    fn test_zero_target_fps_is_rejected() {
        let config = EngineConfig {
            frame: FrameConfig {
                target_fps: Some(0),
                max_frames: None,
            },
        };
        assert!(matches!(Engine::new(config), Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_config_parses_partial_toml() {
        let config: EngineConfig = toml::from_str("[frame]\nmax_frames = 10\n").unwrap();
        assert_eq!(config.frame.max_frames, Some(10));
        assert_eq!(config.frame.target_fps, Some(60));
    }

    /// Presses Space on chosen frames and keeps the spawner alive
    struct SpawnApp {
        press_on: Vec<u64>,
        capture: Rc<TextCapture>,
        spawner: Option<ClockSpawner>,
        cleaned_up: bool,
    }

    impl Application for SpawnApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let services = Services::new(engine.frame_time(), self.capture.clone());
            let trigger = Rc::new(KeyTrigger::new(engine.input(), KeyCode::Space));
            self.spawner = Some(ClockSpawner::new(
                engine.registry(),
                &services,
                trigger,
                SpawnerConfig::default(),
            ));
            Ok(())
        }

        fn begin_frame(&mut self, engine: &mut Engine) -> Result<bool, AppError> {
            let pressed = self.press_on.contains(&engine.frame_count());
            engine.input().borrow_mut().handle_key_input(KeyCode::Space, pressed);
            Ok(true)
        }

        fn cleanup(&mut self, engine: &mut Engine) {
            assert_eq!(engine.registry().logic_len(), 3);
            self.spawner = None;
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_run_spawns_on_key_presses_and_stops_at_limit() {
        crate::foundation::logging::init_for_tests();
        let mut app = SpawnApp {
            press_on: vec![1, 2, 4],
            capture: Rc::new(TextCapture::new()),
            spawner: None,
            cleaned_up: false,
        };

        Engine::run(headless(6), &mut app).unwrap();

        assert!(app.cleaned_up);
        // Presses on frames 1-2 are one held press, frame 4 is a second one.
        let texts: Vec<_> = app.capture.take().into_iter().map(|c| c.text).collect();
        assert_eq!(texts.len(), 5 + 2);
    }

    struct StopImmediately;

    impl Application for StopImmediately {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Ok(())
        }

        fn begin_frame(&mut self, _engine: &mut Engine) -> Result<bool, AppError> {
            Ok(false)
        }

        fn cleanup(&mut self, engine: &mut Engine) {
            assert_eq!(engine.frame_count(), 0);
        }
    }

    #[test]
    fn test_begin_frame_false_stops_loop() {
        Engine::run(headless(10), &mut StopImmediately).unwrap();
    }

    struct QuitAfter(u64);

    impl Application for QuitAfter {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Ok(())
        }

        fn begin_frame(&mut self, _engine: &mut Engine) -> Result<bool, AppError> {
            Ok(true)
        }

        fn end_frame(&mut self, engine: &mut Engine) {
            if engine.frame_count() == self.0 {
                engine.quit();
            }
        }

        fn cleanup(&mut self, engine: &mut Engine) {
            assert_eq!(engine.frame_count(), self.0);
        }
    }

    #[test]
    fn test_quit_stops_after_current_frame() {
        Engine::run(headless(100), &mut QuitAfter(2)).unwrap();
    }

    /// Spawns one clock, then fails at the start of a chosen frame
    struct FailAt {
        frame: u64,
        registry: Option<CallbackRegistry>,
        spawner: Option<ClockSpawner>,
        cleaned_up: bool,
    }

    impl Application for FailAt {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            let services = Services::new(engine.frame_time(), Rc::new(TextCapture::new()));
            self.registry = Some(engine.registry().clone());
            self.spawner = Some(ClockSpawner::new(
                engine.registry(),
                &services,
                Rc::new(ScriptedTrigger::new(vec![true])),
                SpawnerConfig::default(),
            ));
            Ok(())
        }

        fn begin_frame(&mut self, engine: &mut Engine) -> Result<bool, AppError> {
            if engine.frame_count() == self.frame {
                return Err(AppError::Custom("lost the window".to_string()));
            }
            Ok(true)
        }

        fn cleanup(&mut self, engine: &mut Engine) {
            assert_eq!(engine.registry().logic_len(), 2);
            self.spawner = None;
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_failed_frame_still_cleans_up_and_clears_registry() {
        crate::foundation::logging::init_for_tests();
        let mut app = FailAt {
            frame: 3,
            registry: None,
            spawner: None,
            cleaned_up: false,
        };

        let result = Engine::run(headless(10), &mut app);

        assert!(matches!(result, Err(EngineError::ApplicationError(_))));
        assert!(app.cleaned_up);
        let registry = app.registry.take().unwrap();
        assert_eq!(registry.logic_len(), 0);
        assert_eq!(registry.render_len(), 0);
    }
}
