//! # Frame Engine
//!
//! A per-frame callback dispatcher. Independent entities register one logic
//! and one render callback; the engine runs every logic callback and then every
//! render callback once per frame, without knowing what the entities are.
//!
//! ## Features
//!
//! - **Stable handles**: removing a callback never disturbs another handle
//! - **Snapshot dispatch**: callbacks may register or unregister mid-pass
//! - **Scoped registrations**: entities release their callbacks on drop
//! - **Headless services**: console and capturing text renderers, scripted triggers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frame_engine::prelude::*;
//! use std::rc::Rc;
//!
//! struct MyApp {
//!     renderer: Rc<ConsoleTextRenderer>,
//!     clock: Option<Clock>,
//! }
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let services = Services::new(engine.frame_time(), self.renderer.clone());
//!         self.clock = Some(Clock::new(engine.registry(), &services, Vec2::zeros()));
//!         Ok(())
//!     }
//!
//!     fn begin_frame(&mut self, _engine: &mut Engine) -> Result<bool, AppError> {
//!         Ok(true)
//!     }
//!
//!     fn end_frame(&mut self, _engine: &mut Engine) {
//!         self.renderer.present();
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {
//!         self.clock = None;
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = MyApp { renderer: Rc::new(ConsoleTextRenderer::new()), clock: None };
//!     Engine::run(EngineConfig::default(), &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod dispatch;
pub mod entity;
pub mod foundation;
pub mod input;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineConfig, EngineError, FrameConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        dispatch::{CallbackRegistry, DispatchError, Pass, WeakCallbackRegistry},
        entity::{Clock, ClockSpawner, ScopedRegistration, Services, SpawnerConfig},
        foundation::{
            collections::{LogicHandle, RenderHandle},
            math::Vec2,
            time::{FrameTime, Timer},
        },
        input::{InputManager, KeyCode, KeyTrigger, ScriptedTrigger, TriggerSource},
        render::{ConsoleTextRenderer, DrawCommand, TextCapture, TextRenderer},
        AppError, Application, Engine, EngineConfig, EngineError, FrameConfig,
    };
}
