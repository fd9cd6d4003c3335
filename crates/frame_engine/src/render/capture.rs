//! Renderer that records draw requests instead of drawing

use std::cell::RefCell;

use super::{DrawCommand, TextRenderer};
use crate::foundation::math::Vec2;

/// Records every draw request for later inspection
#[derive(Debug, Default)]
pub struct TextCapture {
    commands: RefCell<Vec<DrawCommand>>,
}

impl TextCapture {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.borrow().clone()
    }

    /// Take everything recorded so far, leaving the capture empty
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    /// Number of recorded requests
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl TextRenderer for TextCapture {
    fn draw_text(&self, text: &str, position: Vec2) {
        self.commands.borrow_mut().push(DrawCommand {
            text: text.to_owned(),
            position,
        });
    }
}
