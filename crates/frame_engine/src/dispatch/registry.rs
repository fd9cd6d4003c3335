//! Callback registry with stable handles and snapshot dispatch
//!
//! The registry owns two independent ordered collections of zero-argument
//! callbacks, one for the logic pass and one for the render pass. Entries live
//! in generation-tagged slot maps, so removing one entry never moves or
//! invalidates another. A separate order list keeps registration order for
//! dispatch, since slot reuse would otherwise reorder iteration.
//!
//! Dispatch copies the live set before invoking anything and never holds a
//! borrow of the registry while user code runs. Callbacks may therefore
//! register and unregister freely; the changes apply from the next dispatch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{Key, SlotMap};

use super::DispatchError;
use crate::foundation::collections::{LogicHandle, RenderHandle};

/// Stored unit of work
type Callback = Rc<RefCell<dyn FnMut()>>;

/// Which of the two per-frame collections an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Update pass, runs first each frame
    Logic,
    /// Draw pass, runs after every logic callback of the frame
    Render,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logic => f.write_str("logic"),
            Self::Render => f.write_str("render"),
        }
    }
}

/// One ordered collection of callbacks
struct CallbackList<K: Key> {
    entries: SlotMap<K, Callback>,
    order: Vec<K>,
}

impl<K: Key> CallbackList<K> {
    fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, callback: Callback) -> K {
        let key = self.entries.insert(callback);
        self.order.push(key);
        key
    }

    fn remove(&mut self, key: K) -> Option<Callback> {
        let callback = self.entries.remove(key)?;
        self.order.retain(|live| *live != key);
        Some(callback)
    }

    fn contains(&self, key: K) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> Vec<Callback> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(*key).cloned())
            .collect()
    }

    fn drain(&mut self) -> Vec<Callback> {
        self.order.clear();
        self.entries.drain().map(|(_, callback)| callback).collect()
    }
}

struct Collections {
    logic: CallbackList<LogicHandle>,
    render: CallbackList<RenderHandle>,
}

struct Shared {
    collections: RefCell<Collections>,
    logic_active: Cell<bool>,
    render_active: Cell<bool>,
}

/// Clears a pass's in-progress flag, including when a callback panics
struct PassGuard<'a>(&'a Cell<bool>);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Per-frame callback registry
///
/// Cloning produces another handle to the same registry. Entities usually hold
/// a [`WeakCallbackRegistry`] inside their callbacks so the registry and the
/// callables it owns do not keep each other alive.
#[derive(Clone)]
pub struct CallbackRegistry {
    shared: Rc<Shared>,
}

/// Non-owning handle to a [`CallbackRegistry`]
#[derive(Clone, Default)]
pub struct WeakCallbackRegistry {
    shared: Weak<Shared>,
}

impl WeakCallbackRegistry {
    /// Get the registry back if it is still alive
    pub fn upgrade(&self) -> Option<CallbackRegistry> {
        self.shared.upgrade().map(|shared| CallbackRegistry { shared })
    }
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        log::debug!("CallbackRegistry created (logic: 0, render: 0)");
        Self {
            shared: Rc::new(Shared {
                collections: RefCell::new(Collections {
                    logic: CallbackList::new(),
                    render: CallbackList::new(),
                }),
                logic_active: Cell::new(false),
                render_active: Cell::new(false),
            }),
        }
    }

    /// Create a non-owning handle to this registry
    pub fn downgrade(&self) -> WeakCallbackRegistry {
        WeakCallbackRegistry {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Append a callback to the logic pass
    pub fn register_logic<F>(&self, callback: F) -> LogicHandle
    where
        F: FnMut() + 'static,
    {
        let handle = self.shared.collections.borrow_mut().logic.insert(Rc::new(RefCell::new(callback)));
        log::info!(
            "Registered logic {:?} (logic: {}, render: {})",
            handle,
            self.logic_len(),
            self.render_len()
        );
        handle
    }

    /// Append a callback to the render pass
    pub fn register_render<F>(&self, callback: F) -> RenderHandle
    where
        F: FnMut() + 'static,
    {
        let handle = self.shared.collections.borrow_mut().render.insert(Rc::new(RefCell::new(callback)));
        log::info!(
            "Registered render {:?} (logic: {}, render: {})",
            handle,
            self.logic_len(),
            self.render_len()
        );
        handle
    }

    /// Remove a logic callback
    ///
    /// Fails with [`DispatchError::InvalidHandle`] if the handle is not live.
    /// The registry is left untouched in that case.
    pub fn unregister_logic(&self, handle: LogicHandle) -> Result<(), DispatchError> {
        // Bound to a local so the callable is dropped after the borrow ends.
        let removed = self.shared.collections.borrow_mut().logic.remove(handle);
        self.finish_unregister(Pass::Logic, handle.data(), removed)
    }

    /// Remove a render callback
    ///
    /// Fails with [`DispatchError::InvalidHandle`] if the handle is not live.
    /// The registry is left untouched in that case.
    pub fn unregister_render(&self, handle: RenderHandle) -> Result<(), DispatchError> {
        let removed = self.shared.collections.borrow_mut().render.remove(handle);
        self.finish_unregister(Pass::Render, handle.data(), removed)
    }

    fn finish_unregister(
        &self,
        pass: Pass,
        handle: slotmap::KeyData,
        removed: Option<Callback>,
    ) -> Result<(), DispatchError> {
        if removed.is_none() {
            let error = DispatchError::InvalidHandle { pass, handle };
            log::warn!("Rejected unregister: {}", error);
            return Err(error);
        }
        drop(removed);
        log::info!(
            "Unregistered {} {:?} (logic: {}, render: {})",
            pass,
            handle,
            self.logic_len(),
            self.render_len()
        );
        Ok(())
    }

    /// Run every logic callback live at call time, in registration order
    ///
    /// Returns how many callbacks ran.
    pub fn dispatch_logic(&self) -> Result<usize, DispatchError> {
        let snapshot = self.shared.collections.borrow().logic.snapshot();
        Self::run_pass(Pass::Logic, &self.shared.logic_active, &snapshot)
    }

    /// Run every render callback live at call time, in registration order
    ///
    /// Returns how many callbacks ran.
    pub fn dispatch_render(&self) -> Result<usize, DispatchError> {
        let snapshot = self.shared.collections.borrow().render.snapshot();
        Self::run_pass(Pass::Render, &self.shared.render_active, &snapshot)
    }

    fn run_pass(pass: Pass, active: &Cell<bool>, snapshot: &[Callback]) -> Result<usize, DispatchError> {
        if active.get() {
            let error = DispatchError::NestedDispatch { pass };
            log::warn!("Rejected dispatch: {}", error);
            return Err(error);
        }

        active.set(true);
        let _guard = PassGuard(active);
        log::trace!("Dispatching {} pass over {} callbacks", pass, snapshot.len());

        for callback in snapshot {
            let mut callback = callback.borrow_mut();
            (&mut *callback)();
        }

        Ok(snapshot.len())
    }

    /// Number of live logic callbacks
    pub fn logic_len(&self) -> usize {
        self.shared.collections.borrow().logic.len()
    }

    /// Number of live render callbacks
    pub fn render_len(&self) -> usize {
        self.shared.collections.borrow().render.len()
    }

    /// Whether `handle` refers to a live logic callback
    pub fn is_logic_registered(&self, handle: LogicHandle) -> bool {
        self.shared.collections.borrow().logic.contains(handle)
    }

    /// Whether `handle` refers to a live render callback
    pub fn is_render_registered(&self, handle: RenderHandle) -> bool {
        self.shared.collections.borrow().render.contains(handle)
    }

    /// Whether either pass is currently running
    pub fn is_dispatching(&self) -> bool {
        self.shared.logic_active.get() || self.shared.render_active.get()
    }

    /// Drop every callback of both passes
    ///
    /// Used at shutdown. Every previously issued handle becomes invalid.
    pub fn clear(&self) {
        let (logic, render) = {
            let mut collections = self.shared.collections.borrow_mut();
            (collections.logic.drain(), collections.render.drain())
        };
        log::info!(
            "Cleared registry, released {} logic and {} render callbacks",
            logic.len(),
            render.len()
        );
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("logic", &self.logic_len())
            .field("render", &self.render_len())
            .field("dispatching", &self.is_dispatching())
            .finish()
    }
}

impl fmt::Debug for WeakCallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakCallbackRegistry")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}
