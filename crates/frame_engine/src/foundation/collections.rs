//! Stable handle types for the callback collections
//!
//! Handles are generation-tagged slot map keys. A handle keeps resolving to the
//! entry it was issued for no matter how many other entries are removed, and a
//! handle whose entry is gone resolves to nothing, even if the slot was reused.

use slotmap::new_key_type;

pub use slotmap::KeyData;

new_key_type! {
    /// Handle to a registered logic callback
    pub struct LogicHandle;

    /// Handle to a registered render callback
    pub struct RenderHandle;
}
