//! Gameplay behaviors attached to entities
//!
//! A behavior is a small piece of per-entity logic the update loop calls at
//! fixed points of the frame: before integration, after the frame's contacts
//! were applied (only when there were any) and after everything else.

mod jump;

pub use jump::{JumpBehavior, JumpPhase};

use crate::foundation::math::Vec3;
use crate::game::Frame;
use crate::input::KeyCode;
use crate::physics::forces::Body;
use crate::scene::CollisionRecord;

/// What a behavior may read and change while it runs
pub struct BehaviorContext<'a> {
    /// Key of the owning entity
    pub key: &'a str,
    /// Owner position in its parent's frame
    pub position: Vec3,
    /// Owner kinematic state
    pub body: &'a mut Body,
    /// Contacts resolved during the owner's last integration
    pub collisions: &'a [CollisionRecord],
    /// Current frame
    pub frame: Frame<'a>,
}

/// Per-entity gameplay hook set
///
/// Every method defaults to doing nothing.
pub trait Behavior {
    /// Name used in diagnostics
    fn name(&self) -> &str {
        "behavior"
    }

    /// Keys this behavior reads from the keyboard.
    ///
    /// The game watches them so their events are recorded.
    fn watched_keys(&self) -> Vec<KeyCode> {
        Vec::new()
    }

    /// Runs before the owner integrates
    fn pre_update(&mut self, _context: &mut BehaviorContext<'_>) {}

    /// Runs once per frame in which the owner resolved at least one contact
    fn on_collision(&mut self, _context: &mut BehaviorContext<'_>) {}

    /// Runs after the owner finished its own update, before its children
    fn post_update(&mut self, _context: &mut BehaviorContext<'_>) {}
}
