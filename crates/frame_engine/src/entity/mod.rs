//! Self-registering entities
//!
//! An entity registers one logic and one render callback when it is built and
//! gives both back when it is dropped. [`ScopedRegistration`] carries that
//! contract; [`Clock`] and [`ClockSpawner`] are built on it.

mod clock;
mod scoped;
mod spawner;

pub use clock::Clock;
pub use scoped::ScopedRegistration;
pub use spawner::{ClockSpawner, SpawnerConfig};

use std::rc::Rc;

use crate::foundation::time::FrameTime;
use crate::render::TextRenderer;

/// External services an entity's callbacks may use
#[derive(Clone)]
pub struct Services {
    /// Timing of the current frame
    pub time: FrameTime,
    /// Where render callbacks send text
    pub renderer: Rc<dyn TextRenderer>,
}

impl Services {
    /// Bundle a frame time view and a renderer
    pub fn new(time: FrameTime, renderer: Rc<dyn TextRenderer>) -> Self {
        Self { time, renderer }
    }
}
