//! Per-frame callback dispatch
//!
//! [`CallbackRegistry`] holds the logic and render callbacks registered by
//! entities and runs each collection once per frame.

mod registry;

pub use registry::{CallbackRegistry, Pass, WeakCallbackRegistry};

use crate::foundation::collections::KeyData;
use thiserror::Error;

/// Registry errors
///
/// Both variants are caller bugs. They are logged and returned, and the
/// registry stays usable afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The handle does not name a live entry of that pass
    #[error("invalid {pass} handle {handle:?}: already removed or never issued")]
    InvalidHandle {
        /// Collection the handle was presented to
        pass: Pass,
        /// Raw slot and generation of the rejected handle
        handle: KeyData,
    },

    /// A callback tried to dispatch the pass it is running in
    #[error("{pass} pass is already being dispatched")]
    NestedDispatch {
        /// Pass that was re-entered
        pass: Pass,
    },
}
