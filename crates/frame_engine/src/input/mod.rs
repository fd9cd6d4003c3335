//! Input management system
//!
//! The frame loop feeds key events into [`InputManager`]. Entities do not read
//! the manager directly; they sample a [`TriggerSource`], which keeps them
//! testable without any real input device.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Per-key input state with one frame of history
#[derive(Debug, Default)]
pub struct InputManager {
    current: HashSet<KeyCode>,
    previous: HashSet<KeyCode>,
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current frame; its state becomes the previous state
    pub fn update(&mut self) {
        self.previous.clone_from(&self.current);
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.current.insert(key);
        } else {
            self.current.remove(&key);
        }
    }

    /// Whether `key` is held this frame
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.current.contains(&key)
    }

    /// Whether `key` went down this frame
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// A boolean signal sampled once per frame
pub trait TriggerSource {
    /// Current level of the signal
    fn is_active(&self) -> bool;
}

/// Trigger that is active while a key is held
#[derive(Debug, Clone)]
pub struct KeyTrigger {
    input: Rc<RefCell<InputManager>>,
    key: KeyCode,
}

impl KeyTrigger {
    /// Watch `key` on a shared input manager
    pub fn new(input: Rc<RefCell<InputManager>>, key: KeyCode) -> Self {
        Self { input, key }
    }
}

impl TriggerSource for KeyTrigger {
    fn is_active(&self) -> bool {
        self.input.borrow().is_key_down(self.key)
    }
}

/// Trigger that replays a fixed sequence of samples, then stays inactive
#[derive(Debug, Default)]
pub struct ScriptedTrigger {
    samples: RefCell<VecDeque<bool>>,
}

impl ScriptedTrigger {
    /// One sample is consumed per call to [`TriggerSource::is_active`]
    pub fn new(samples: impl IntoIterator<Item = bool>) -> Self {
        Self {
            samples: RefCell::new(samples.into_iter().collect()),
        }
    }

    /// Samples not yet consumed
    pub fn remaining(&self) -> usize {
        self.samples.borrow().len()
    }
}

impl TriggerSource for ScriptedTrigger {
    fn is_active(&self) -> bool {
        self.samples.borrow_mut().pop_front().unwrap_or(false)
    }
}
