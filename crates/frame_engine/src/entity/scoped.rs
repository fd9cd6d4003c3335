//! Paired logic/render registration released on drop

use crate::dispatch::{CallbackRegistry, DispatchError};
use crate::foundation::collections::{LogicHandle, RenderHandle};

/// Owns one logic handle and one render handle on a registry
///
/// Both handles are released together, either by [`close`](Self::close) or
/// when the value is dropped, so an entity can never leak one side.
#[derive(Debug)]
pub struct ScopedRegistration {
    registry: CallbackRegistry,
    label: &'static str,
    logic: LogicHandle,
    render: RenderHandle,
    active: bool,
}

impl ScopedRegistration {
    /// Register `logic` and `render` on `registry`
    ///
    /// `label` only appears in log lines.
    pub fn new<L, R>(registry: &CallbackRegistry, label: &'static str, logic: L, render: R) -> Self
    where
        L: FnMut() + 'static,
        R: FnMut() + 'static,
    {
        let logic = registry.register_logic(logic);
        let render = registry.register_render(render);
        log::debug!("{} registered logic {:?} render {:?}", label, logic, render);

        Self {
            registry: registry.clone(),
            label,
            logic,
            render,
            active: true,
        }
    }

    /// Handle of the logic callback
    pub const fn logic_handle(&self) -> LogicHandle {
        self.logic
    }

    /// Handle of the render callback
    pub const fn render_handle(&self) -> RenderHandle {
        self.render
    }

    /// Unregister both callbacks now
    ///
    /// Both removals are attempted even if the first fails; the first error is
    /// returned.
    pub fn close(mut self) -> Result<(), DispatchError> {
        self.release()
    }

    /// Give up ownership without unregistering
    ///
    /// The callbacks stay registered until someone unregisters them with the
    /// returned handles or the registry is cleared.
    pub fn detach(mut self) -> (LogicHandle, RenderHandle) {
        self.active = false;
        log::debug!("{} detached logic {:?} render {:?}", self.label, self.logic, self.render);
        (self.logic, self.render)
    }

    fn release(&mut self) -> Result<(), DispatchError> {
        if !std::mem::replace(&mut self.active, false) {
            return Ok(());
        }
        let logic = self.registry.unregister_logic(self.logic);
        let render = self.registry.unregister_render(self.render);
        log::info!("{} released logic {:?} render {:?}", self.label, self.logic, self.render);
        logic.and(render)
    }
}

impl Drop for ScopedRegistration {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::error!("{} failed to release its callbacks: {}", self.label, e);
        }
    }
}
