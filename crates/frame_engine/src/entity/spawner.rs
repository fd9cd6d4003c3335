//! Clock spawner: creates a new clock on each rising edge of a trigger

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{Clock, ScopedRegistration, Services};
use crate::dispatch::CallbackRegistry;
use crate::foundation::math::Vec2;
use crate::input::TriggerSource;

/// Placement of spawned clocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Position of the first spawned clock
    pub origin: Vec2,
    /// Offset added for every further clock
    pub spacing: Vec2,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::new(0.0, 0.0),
            spacing: Vec2::new(0.0, 48.0),
        }
    }
}

impl SpawnerConfig {
    #[allow(clippy::cast_precision_loss)]
    fn position_of(&self, index: usize) -> Vec2 {
        self.origin + self.spacing * index as f32
    }
}

#[derive(Debug, Default)]
struct SpawnerState {
    was_active: Cell<bool>,
    spawned: Cell<usize>,
}

/// Watches a trigger and spawns one [`Clock`] per rising edge
///
/// Spawned clocks are detached: the spawner keeps no reference to them and
/// they live as long as their callbacks stay registered. The logic callback
/// reaches the registry through a weak handle so the registry does not own
/// itself through the spawner.
///
/// A clock spawned during a frame's logic pass is drawn, showing `0.0`, by
/// that same frame's render pass. Its logic callback first runs next frame.
#[derive(Debug)]
pub struct ClockSpawner {
    state: Rc<SpawnerState>,
    registration: ScopedRegistration,
}

impl ClockSpawner {
    /// Create a spawner and register its callbacks
    pub fn new(
        registry: &CallbackRegistry,
        services: &Services,
        trigger: Rc<dyn TriggerSource>,
        config: SpawnerConfig,
    ) -> Self {
        let state = Rc::new(SpawnerState::default());

        let logic = {
            let state = Rc::clone(&state);
            let registry = registry.downgrade();
            let services = services.clone();
            move || {
                let active = trigger.is_active();
                let rising = active && !state.was_active.get();
                state.was_active.set(active);
                if !rising {
                    return;
                }

                let Some(registry) = registry.upgrade() else {
                    log::warn!("Spawn trigger fired after the registry was dropped");
                    return;
                };
                let index = state.spawned.get();
                log::info!("Spawn trigger fired, creating clock #{}", index);
                Clock::new(&registry, &services, config.position_of(index)).detach();
                state.spawned.set(index + 1);
            }
        };
        // Reserved for visual feedback; nothing to draw yet.
        let render = || {};

        let registration = ScopedRegistration::new(registry, "ClockSpawner", logic, render);
        log::info!(
            "ClockSpawner created (logic {:?}, render {:?})",
            registration.logic_handle(),
            registration.render_handle()
        );

        Self { state, registration }
    }

    /// Number of clocks created so far
    pub fn spawned_count(&self) -> usize {
        self.state.spawned.get()
    }

    /// The spawner's handles on the registry
    pub const fn registration(&self) -> &ScopedRegistration {
        &self.registration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::time::FrameTime;
    use crate::input::ScriptedTrigger;
    use crate::render::TextCapture;

    fn setup(samples: Vec<bool>) -> (CallbackRegistry, Services, Rc<TextCapture>, ClockSpawner) {
        let registry = CallbackRegistry::new();
        let capture = Rc::new(TextCapture::new());
        let services = Services::new(FrameTime::new(), capture.clone());
        let spawner = ClockSpawner::new(
            &registry,
            &services,
            Rc::new(ScriptedTrigger::new(samples)),
            SpawnerConfig::default(),
        );
        (registry, services, capture, spawner)
    }

    fn frame(registry: &CallbackRegistry, services: &Services) {
        services.time.advance(0.5);
        registry.dispatch_logic().unwrap();
        registry.dispatch_render().unwrap();
    }

    #[test]
    fn test_spawns_once_on_rising_edge() {
        let (registry, services, capture, spawner) = setup(vec![false, false, true]);

        frame(&registry, &services);
        frame(&registry, &services);
        assert_eq!(spawner.spawned_count(), 0);
        assert_eq!(registry.logic_len(), 1);

        // Triggering frame: the clock's logic misses this pass, its render
        // callback is picked up by the render pass that follows.
        frame(&registry, &services);
        assert_eq!(spawner.spawned_count(), 1);
        assert_eq!(registry.logic_len(), 2);
        assert_eq!(registry.render_len(), 2);
        let drawn = capture.take();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].text, "0.0");

        // Next frame: the clock's callbacks run.
        frame(&registry, &services);
        let drawn = capture.take();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].text, "0.5");
        assert_eq!(spawner.spawned_count(), 1);
    }

    #[test]
    fn test_held_trigger_spawns_only_once() {
        let (registry, services, _capture, spawner) = setup(vec![true, true, true, false, true]);

        for _ in 0..5 {
            frame(&registry, &services);
        }

        assert_eq!(spawner.spawned_count(), 2);
        assert_eq!(registry.logic_len(), 3);
    }

    #[test]
    fn test_spawned_clocks_are_spaced() {
        let (registry, services, capture, _spawner) = setup(vec![true, false, true]);

        for _ in 0..4 {
            frame(&registry, &services);
        }

        let drawn = capture.take();
        let last_frame: Vec<_> = drawn.iter().rev().take(2).collect();
        assert_eq!(last_frame[0].position, Vec2::new(0.0, 48.0));
        assert_eq!(last_frame[1].position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_drop_releases_spawner_but_not_spawned_clocks() {
        let (registry, services, _capture, spawner) = setup(vec![true]);
        frame(&registry, &services);
        assert_eq!(registry.logic_len(), 2);
        let handle = spawner.registration().logic_handle();

        drop(spawner);

        assert!(!registry.is_logic_registered(handle));
        assert_eq!(registry.logic_len(), 1);
        assert_eq!(registry.render_len(), 1);
    }
}
