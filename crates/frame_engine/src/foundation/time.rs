//! Time management utilities

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

#[derive(Debug, Default)]
struct FrameTimeState {
    delta: Cell<f32>,
    total: Cell<f32>,
    frame: Cell<u64>,
}

/// Shared, read-mostly view of the current frame's timing
///
/// Cloning is cheap and every clone observes the same values. Callbacks keep a
/// clone and read the delta when they run; the frame loop advances it once per
/// frame before the logic pass.
#[derive(Debug, Clone, Default)]
pub struct FrameTime {
    state: Rc<FrameTimeState>,
}

impl FrameTime {
    /// Create a frame time view at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame that lasted `delta` seconds
    ///
    /// Negative deltas are clamped to zero so totals never run backwards.
    pub fn advance(&self, delta: f32) {
        let delta = delta.max(0.0);
        self.state.delta.set(delta);
        self.state.total.set(self.state.total.get() + delta);
        self.state.frame.set(self.state.frame.get() + 1);
    }

    /// Time covered by the current frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.state.delta.get()
    }

    /// Sum of all frame deltas so far
    pub fn total_time(&self) -> f32 {
        self.state.total.get()
    }

    /// Number of frames started so far
    pub fn frame_index(&self) -> u64 {
        self.state.frame.get()
    }
}

/// High-precision timer for frame timing
///
/// Measures wall-clock time between frames and publishes it through a
/// [`FrameTime`] view.
#[derive(Debug)]
pub struct Timer {
    last_frame: Instant,
    time: FrameTime,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            time: FrameTime::new(),
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.time.advance(elapsed.as_secs_f32());
    }

    /// Start a frame with a fixed delta instead of measuring one
    pub fn advance_fixed(&mut self, delta: f32) {
        self.last_frame = Instant::now();
        self.time.advance(delta);
    }

    /// Shared view of this timer's values
    pub fn frame_time(&self) -> FrameTime {
        self.time.clone()
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.time.delta_time()
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.time.total_time()
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.time.frame_index()
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        let total = self.total_time();
        if total > 0.0 {
            self.frame_count() as f32 / total
        } else {
            0.0
        }
    }
}
