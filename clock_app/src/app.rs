//! Clock spawner demo application
//!
//! Starts with a single spawner. Space presses come from the configured frame
//! list, so the demo runs headless; every press spawns a clock that keeps
//! counting until shutdown.

use std::rc::Rc;

use frame_engine::prelude::*;
use serde::{Deserialize, Serialize};

/// Demo configuration, loadable from TOML or RON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockAppConfig {
    /// Frame loop settings
    pub engine: EngineConfig,
    /// Where spawned clocks are drawn
    pub spawner: SpawnerConfig,
    /// Key the spawner watches
    pub trigger_key: KeyCode,
    /// Frames on which the trigger key is held down
    pub trigger_frames: Vec<u64>,
    /// Print every n-th frame to the console
    pub print_interval: u64,
}

impl Default for ClockAppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                frame: FrameConfig {
                    target_fps: Some(60),
                    max_frames: Some(300),
                },
            },
            spawner: SpawnerConfig::default(),
            trigger_key: KeyCode::Space,
            trigger_frames: vec![30, 90, 150],
            print_interval: 30,
        }
    }
}

impl Config for ClockAppConfig {}

/// Owns the spawner and the console output
pub struct ClockApp {
    config: ClockAppConfig,
    renderer: Rc<ConsoleTextRenderer>,
    spawner: Option<ClockSpawner>,
}

impl ClockApp {
    /// Create the application; entities are built in `initialize`
    pub fn new(config: ClockAppConfig) -> Self {
        Self {
            config,
            renderer: Rc::new(ConsoleTextRenderer::new()),
            spawner: None,
        }
    }
}

impl Application for ClockApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Creating clock spawner watching {:?}", self.config.trigger_key);
        let services = Services::new(engine.frame_time(), self.renderer.clone());
        let trigger = Rc::new(KeyTrigger::new(engine.input(), self.config.trigger_key));
        self.spawner = Some(ClockSpawner::new(
            engine.registry(),
            &services,
            trigger,
            self.config.spawner.clone(),
        ));
        Ok(())
    }

    fn begin_frame(&mut self, engine: &mut Engine) -> Result<bool, AppError> {
        let held = self.config.trigger_frames.contains(&engine.frame_count());
        engine
            .input()
            .borrow_mut()
            .handle_key_input(self.config.trigger_key, held);
        Ok(true)
    }

    fn end_frame(&mut self, engine: &mut Engine) {
        if engine.frame_count() % self.config.print_interval.max(1) == 0 {
            self.renderer.present();
        } else {
            self.renderer.discard();
        }
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some(spawner) = self.spawner.take() {
            log::info!("Destroying clock spawner after {} spawns", spawner.spawned_count());
        }
        log::info!(
            "Releasing {} remaining logic and {} render callbacks",
            engine.registry().logic_len(),
            engine.registry().render_len()
        );
    }
}
