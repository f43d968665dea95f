//! Keyboard-triggered jumping

use crate::input::KeyCode;
use super::{Behavior, BehaviorContext};

/// Stages of a jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    /// Standing on something
    #[default]
    Grounded,
    /// Trigger hit this frame
    Start,
    /// Impulse being applied while the trigger is held
    Impulsion,
    /// Impulse released, still rising
    Ascension,
    /// Falling
    Descent,
}

/// Applies an upward impulse while a trigger key is held after touching ground
#[derive(Debug, Clone)]
pub struct JumpBehavior {
    trigger: KeyCode,
    phase: JumpPhase,
    retain: u32,
    potential: f64,
    cutoff: u32,
}

impl Default for JumpBehavior {
    fn default() -> Self {
        Self::new(KeyCode::Space)
    }
}

impl JumpBehavior {
    /// Jump on `trigger` with the default potential (200) and cutoff (15 frames)
    pub fn new(trigger: KeyCode) -> Self {
        Self {
            trigger,
            phase: JumpPhase::Grounded,
            retain: 0,
            potential: 200.0,
            cutoff: 15,
        }
    }

    /// Impulse; the vertical velocity applied is `potential / mass`
    pub fn with_potential(mut self, potential: f64) -> Self {
        self.potential = potential;
        self
    }

    /// Frames after which holding the trigger stops adding lift
    pub fn with_cutoff(mut self, cutoff: u32) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Frames of grace during which a jump may start without a contact
    pub fn with_retain(mut self, retain: u32) -> Self {
        self.retain = retain;
        self
    }

    /// Current phase
    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    /// Trigger key
    pub fn trigger(&self) -> KeyCode {
        self.trigger
    }
}

impl Behavior for JumpBehavior {
    fn name(&self) -> &str {
        "jump"
    }

    fn watched_keys(&self) -> Vec<KeyCode> {
        vec![self.trigger]
    }

    fn pre_update(&mut self, context: &mut BehaviorContext<'_>) {
        let trigger = context.frame.keyboard.state(self.trigger);
        let body = &mut *context.body;

        if self.phase == JumpPhase::Start {
            self.phase = JumpPhase::Impulsion;
        }

        if !context.collisions.is_empty() {
            self.retain = 1;
            if matches!(self.phase, JumpPhase::Ascension | JumpPhase::Descent) {
                self.phase = JumpPhase::Grounded;
            }
        }

        if self.retain > 0 && trigger.hit {
            self.phase = JumpPhase::Start;
        }

        if matches!(self.phase, JumpPhase::Start | JumpPhase::Impulsion) {
            if trigger.pressed && self.retain > 0 && trigger.hold < self.cutoff {
                body.velocity.y = self.potential / body.mass;
            } else {
                self.phase = JumpPhase::Ascension;
            }
        }

        if self.phase == JumpPhase::Ascension && body.velocity.y < 0.0 {
            self.phase = JumpPhase::Descent;
        }

        if trigger.lift || body.velocity.y < 0.0 {
            self.retain = self.retain.saturating_sub(1);
        }
    }
}
