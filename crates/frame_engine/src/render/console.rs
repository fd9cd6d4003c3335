//! Terminal stand-in for a text renderer

use std::cell::RefCell;
use std::cmp::Ordering;
use std::io::{self, Write};

use super::{DrawCommand, TextRenderer};
use crate::foundation::math::Vec2;

/// Buffers a frame's text and prints it as one line on [`present`]
///
/// Entries are ordered top to bottom, then left to right, so the line reads
/// like the screen would.
///
/// [`present`]: TextRenderer::present
#[derive(Debug, Default)]
pub struct ConsoleTextRenderer {
    pending: RefCell<Vec<DrawCommand>>,
}

impl ConsoleTextRenderer {
    /// Create a renderer with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the queued frame without printing it
    pub fn discard(&self) {
        self.pending.borrow_mut().clear();
    }

    /// Format the queued frame as it would be printed
    pub fn compose(&self) -> String {
        let mut commands = self.pending.borrow().clone();
        commands.sort_by(|a, b| screen_order(&a.position, &b.position));
        commands
            .iter()
            .map(|command| format!("[{:.0},{:.0}] {}", command.position.x, command.position.y, command.text))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn screen_order(a: &Vec2, b: &Vec2) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

impl TextRenderer for ConsoleTextRenderer {
    fn draw_text(&self, text: &str, position: Vec2) {
        self.pending.borrow_mut().push(DrawCommand {
            text: text.to_owned(),
            position,
        });
    }

    fn present(&self) {
        if self.pending.borrow().is_empty() {
            return;
        }
        let line = self.compose();
        self.discard();

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            log::warn!("Failed to present frame text: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_orders_by_screen_position() {
        let renderer = ConsoleTextRenderer::new();
        renderer.draw_text("low", Vec2::new(0.0, 96.0));
        renderer.draw_text("right", Vec2::new(40.0, 0.0));
        renderer.draw_text("left", Vec2::new(0.0, 0.0));

        assert_eq!(renderer.compose(), "[0,0] left | [40,0] right | [0,96] low");
    }

    #[test]
    fn test_present_and_discard_empty_the_queue() {
        let renderer = ConsoleTextRenderer::new();
        renderer.draw_text("1.5", Vec2::zeros());
        renderer.present();
        assert!(renderer.compose().is_empty());

        renderer.draw_text("2.0", Vec2::zeros());
        renderer.discard();
        assert!(renderer.compose().is_empty());
    }
}
