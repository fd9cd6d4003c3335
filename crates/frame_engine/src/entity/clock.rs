//! Clock entity: counts time since its creation and draws it

use std::cell::Cell;
use std::rc::Rc;

use super::{ScopedRegistration, Services};
use crate::dispatch::CallbackRegistry;
use crate::foundation::collections::{LogicHandle, RenderHandle};
use crate::foundation::math::Vec2;

/// Elapsed-time display driven entirely by its two callbacks
///
/// The accumulator lives in shared state owned by the callbacks. Dropping the
/// `Clock` unregisters them, which freezes the value. [`detach`](Self::detach)
/// instead hands ownership to the registry.
#[derive(Debug)]
pub struct Clock {
    elapsed: Rc<Cell<f32>>,
    position: Vec2,
    created_at: f32,
    registration: ScopedRegistration,
}

impl Clock {
    /// Create a clock drawn at `position` and register its callbacks
    pub fn new(registry: &CallbackRegistry, services: &Services, position: Vec2) -> Self {
        let elapsed = Rc::new(Cell::new(0.0_f32));
        let created_at = services.time.total_time();

        let logic = {
            let elapsed = Rc::clone(&elapsed);
            let time = services.time.clone();
            move || elapsed.set(elapsed.get() + time.delta_time())
        };
        let render = {
            let elapsed = Rc::clone(&elapsed);
            let renderer = Rc::clone(&services.renderer);
            move || renderer.draw_text(&format_elapsed(elapsed.get()), position)
        };

        let registration = ScopedRegistration::new(registry, "Clock", logic, render);
        log::info!(
            "Clock created at t={:.2} (logic {:?}, render {:?}, registry logic: {}, render: {})",
            created_at,
            registration.logic_handle(),
            registration.render_handle(),
            registry.logic_len(),
            registry.render_len()
        );

        Self {
            elapsed,
            position,
            created_at,
            registration,
        }
    }

    /// Seconds accumulated by the logic callback
    pub fn elapsed(&self) -> f32 {
        self.elapsed.get()
    }

    /// Where the clock is drawn
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Frame-time total when the clock was created
    pub const fn created_at(&self) -> f32 {
        self.created_at
    }

    /// The clock's handles on the registry
    pub const fn registration(&self) -> &ScopedRegistration {
        &self.registration
    }

    /// Stop owning the clock and leave it to the registry
    ///
    /// The registered closures hold the only remaining references to the clock
    /// state, so the clock runs for as long as its callbacks stay registered.
    pub fn detach(self) -> (LogicHandle, RenderHandle) {
        log::info!("Clock at ({}, {}) handed to the registry", self.position.x, self.position.y);
        self.registration.detach()
    }
}

fn format_elapsed(seconds: f32) -> String {
    format!("{seconds:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::time::FrameTime;
    use crate::render::TextCapture;
    use approx::assert_relative_eq;

    fn services() -> (Services, Rc<TextCapture>) {
        let capture = Rc::new(TextCapture::new());
        let services = Services::new(FrameTime::new(), capture.clone());
        (services, capture)
    }

    #[test]
    fn test_accumulates_and_draws_one_decimal() {
        let registry = CallbackRegistry::new();
        let (services, capture) = services();
        let position = Vec2::new(10.0, 48.0);
        let clock = Clock::new(&registry, &services, position);

        for _ in 0..3 {
            services.time.advance(0.5);
            registry.dispatch_logic().unwrap();
            registry.dispatch_render().unwrap();
        }

        assert_relative_eq!(clock.elapsed(), 1.5);
        assert_eq!(clock.position(), position);
        assert!(registry.is_logic_registered(clock.registration().logic_handle()));
        let drawn = capture.take();
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[0].text, "0.5");
        assert_eq!(drawn[2].text, "1.5");
        assert_eq!(drawn[2].position, position);
    }

    #[test]
    fn test_zero_point_is_creation_time() {
        let registry = CallbackRegistry::new();
        let (services, _capture) = services();
        services.time.advance(4.0);

        let clock = Clock::new(&registry, &services, Vec2::zeros());
        services.time.advance(0.25);
        registry.dispatch_logic().unwrap();

        assert_relative_eq!(clock.created_at(), 4.0);
        assert_relative_eq!(clock.elapsed(), 0.25);
    }

    #[test]
    fn test_drop_before_first_frame() {
        let registry = CallbackRegistry::new();
        let (services, capture) = services();

        drop(Clock::new(&registry, &services, Vec2::zeros()));

        assert_eq!(registry.logic_len(), 0);
        assert_eq!(registry.render_len(), 0);
        registry.dispatch_render().unwrap();
        assert!(capture.is_empty());
    }

    #[test]
    fn test_detached_clock_keeps_running() {
        let registry = CallbackRegistry::new();
        let (services, capture) = services();

        let (logic, render) = Clock::new(&registry, &services, Vec2::zeros()).detach();
        services.time.advance(1.0);
        registry.dispatch_logic().unwrap();
        registry.dispatch_render().unwrap();

        assert_eq!(capture.take()[0].text, "1.0");
        assert!(registry.is_logic_registered(logic));
        assert!(registry.is_render_registered(render));
    }
}
