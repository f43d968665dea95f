//! Specialized collection types

pub use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Generational handle to a collider registered in a scene.
    ///
    /// Removing a collider bumps the slot generation, so a handle kept past
    /// removal never resolves to whatever reuses the slot.
    pub struct ColliderHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;
