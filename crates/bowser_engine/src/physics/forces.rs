//! Kinematic state and per-frame force accumulators

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Contact response coefficients an entity exposes to whatever strikes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Friction coefficient in `[0, 1]`
    pub roughness: f64,
    /// Restitution coefficient in `[0, 1]`
    pub elasticity: f64,
}

impl Surface {
    /// Surface with the given coefficients, clamped to `[0, 1]`.
    pub fn new(roughness: f64, elasticity: f64) -> Self {
        Self {
            roughness: clamp_unit(roughness),
            elasticity: clamp_unit(elasticity),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Kinematic state of a dynamic entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Acceleration accumulated since the last integration
    pub acceleration: Vec3,
    /// External force accumulated since the last integration
    pub force: Vec3,
    /// Extra displacement queued for the next integration
    pub displacement: Vec3,
    /// Mass, always positive
    pub mass: f64,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            force: Vec3::zeros(),
            displacement: Vec3::zeros(),
            mass: 1.0,
        }
    }
}

impl Body {
    /// Add a force to be applied at the next integration.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Advance velocity and produce this frame's displacement.
    ///
    /// Force, acceleration and queued displacement are consumed here, so
    /// whatever was applied between two integrations counts exactly once.
    /// `cof` is the friction accumulator left over from the previous frame.
    pub fn integrate(&mut self, gravity: Vec3, cof: f64, delta: f64) -> Vec3 {
        self.acceleration += self.force / self.mass;
        self.velocity += gravity + self.acceleration * cof;
        let displacement = (self.displacement + self.velocity) * delta;

        self.force = Vec3::zeros();
        self.acceleration = Vec3::zeros();
        self.displacement = Vec3::zeros();
        displacement
    }
}

/// Velocity corrections gathered while resolving one frame's contacts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    /// Cancels velocity along contact normals
    pub normal_force: Vec3,
    /// Tangential damping scaled by the struck surface's roughness
    pub friction: Vec3,
    /// Restitution scaled by the struck surface's elasticity
    pub bounce_force: Vec3,
    /// Last drag correction applied
    pub drag_force: Vec3,
    /// Maximum roughness (or drag) touched this frame
    pub cof: f64,
}

impl Default for Forces {
    fn default() -> Self {
        Self {
            normal_force: Vec3::zeros(),
            friction: Vec3::zeros(),
            bounce_force: Vec3::zeros(),
            drag_force: Vec3::zeros(),
            cof: 0.0,
        }
    }
}

impl Forces {
    /// Clear the contact accumulators before a resolution pass.
    pub fn begin_frame(&mut self) {
        self.cof = 0.0;
        self.normal_force = Vec3::zeros();
        self.friction = Vec3::zeros();
        self.bounce_force = Vec3::zeros();
    }

    /// Accumulate the response to one contact with a surface of unit `normal`.
    pub fn record_contact(&mut self, normal: &Vec3, velocity: &Vec3, surface: Surface) {
        let perpendicular = normal * velocity.dot(normal);

        self.normal_force -= perpendicular;
        self.friction += (perpendicular - velocity) * surface.roughness;
        self.cof = self.cof.max(surface.roughness);
        self.bounce_force -= perpendicular * surface.elasticity;
    }

    /// Sum of the contact corrections to add to velocity.
    pub fn contact_response(&self) -> Vec3 {
        self.normal_force + self.friction + self.bounce_force
    }

    /// Apply scene drag to `velocity` and fold it into `cof`.
    pub fn apply_drag(&mut self, velocity: &mut Vec3, drag: f64) {
        self.drag_force = *velocity * -drag;
        *velocity += self.drag_force;
        self.cof = self.cof.max(drag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_consumes_force() {
        let mut body = Body {
            mass: 2.0,
            ..Default::default()
        };
        body.apply_force(Vec3::new(4.0, 0.0, 0.0));

        // cof scales acceleration into velocity
        let moved = body.integrate(Vec3::zeros(), 0.5, 1.0);
        assert_relative_eq!(body.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.force, Vec3::zeros());
        assert_eq!(body.acceleration, Vec3::zeros());

        // Nothing left to apply on the next pass
        body.integrate(Vec3::zeros(), 0.5, 1.0);
        assert_relative_eq!(body.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_gravity_is_not_scaled_by_cof() {
        let mut body = Body::default();
        body.displacement = Vec3::new(1.0, 0.0, 0.0);

        let moved = body.integrate(Vec3::new(0.0, -1.0, 0.0), 0.0, 0.5);
        assert_relative_eq!(body.velocity, Vec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(moved, Vec3::new(0.5, -0.5, 0.0));
        assert_eq!(body.displacement, Vec3::zeros());
    }

    #[test]
    fn test_contact_response_on_floor() {
        let mut forces = Forces::default();
        let velocity = Vec3::new(2.0, -4.0, 0.0);

        forces.begin_frame();
        forces.record_contact(&Vec3::y(), &velocity, Surface::new(0.5, 0.3));

        assert_relative_eq!(forces.normal_force, Vec3::new(0.0, 4.0, 0.0));
        assert_relative_eq!(forces.friction, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(forces.bounce_force, Vec3::new(0.0, 1.2, 0.0), epsilon = 1e-12);
        assert_relative_eq!(forces.cof, 0.5);
        assert_relative_eq!(
            velocity + forces.contact_response(),
            Vec3::new(1.0, 1.2, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_drag() {
        let mut forces = Forces::default();
        let mut velocity = Vec3::new(10.0, 0.0, 0.0);

        forces.apply_drag(&mut velocity, 0.1);
        assert_relative_eq!(velocity, Vec3::new(9.0, 0.0, 0.0));
        assert_relative_eq!(forces.drag_force, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(forces.cof, 0.1);
    }

    #[test]
    fn test_surface_clamped() {
        assert_eq!(Surface::new(1.5, -0.2), Surface::new(1.0, 0.0));
        assert_eq!(Surface::new(f64::NAN, 0.3).roughness, 0.0);
    }
}
