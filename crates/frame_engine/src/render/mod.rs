//! Text drawing service used by render callbacks
//!
//! The frame loop does not know how text reaches the screen. Render callbacks
//! issue draw requests through [`TextRenderer`]; the application picks the
//! implementation.

mod capture;
mod console;

pub use capture::TextCapture;
pub use console::ConsoleTextRenderer;

use crate::foundation::math::Vec2;

/// A single text draw request
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Text to draw
    pub text: String,
    /// Top-left corner in screen pixels
    pub position: Vec2,
}

/// Something that can put text on screen
///
/// Methods take `&self` because renderers are shared between many callbacks.
pub trait TextRenderer {
    /// Queue `text` at `position` for the current frame
    fn draw_text(&self, text: &str, position: Vec2);

    /// Show everything queued since the last present
    fn present(&self) {}
}
