//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// The engine owns the frame loop; the application owns the entities and the
/// external services (input, presentation) the loop does not know about.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Create the initial entities here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Start a frame
    ///
    /// Called before the logic pass. Feed input for the frame here. Returning
    /// `Ok(false)` ends the loop without running the frame.
    fn begin_frame(&mut self, engine: &mut Engine) -> Result<bool, AppError>;

    /// Finish a frame
    ///
    /// Called after the render pass.
    fn end_frame(&mut self, _engine: &mut Engine) {}

    /// Cleanup the application
    ///
    /// Called once after the last frame, before the registry is cleared.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
