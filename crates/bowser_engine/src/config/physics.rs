//! Physics tuning shared by every entity of a scene

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;

/// Default recursion ceiling for contact resolution
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 8;

/// Default amount the resolution ray is shortened by
pub const DEFAULT_RAY_EPSILON: f64 = 1e-4;

/// Scene-wide physics constants.
///
/// `gravity` is added to velocity once per frame (it is not scaled by the
/// frame delta) and `drag` removes that fraction of velocity every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-frame velocity change applied to dynamic entities
    pub gravity: Vec3,

    /// Fraction of velocity removed each frame, in `[0, 1)`
    pub drag: f64,

    /// Maximum corrections applied to one entity in one frame
    pub max_resolution_depth: usize,

    /// Length subtracted from every resolution ray
    pub ray_epsilon: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::zeros(),
            drag: 0.0,
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
            ray_epsilon: DEFAULT_RAY_EPSILON,
        }
    }
}

impl PhysicsConfig {
    /// Builder pattern: set gravity
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder pattern: set drag
    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    /// Builder pattern: set the resolution depth ceiling
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}

impl Config for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.drag) {
            return Err(ConfigError::Invalid(format!(
                "drag must be in [0, 1), got {}",
                self.drag
            )));
        }

        if self.gravity.iter().any(|component| !component.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }

        if self.max_resolution_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_resolution_depth must be at least 1".to_string(),
            ));
        }

        if !(self.ray_epsilon > 0.0 && self.ray_epsilon.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "ray_epsilon must be a positive number, got {}",
                self.ray_epsilon
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_resolution_depth, 8);
        assert_eq!(config.ray_epsilon, 1e-4);
    }

    #[test]
    fn test_drag_range() {
        assert!(PhysicsConfig::default().with_drag(0.99).validate().is_ok());
        assert!(matches!(
            PhysicsConfig::default().with_drag(1.0).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(PhysicsConfig::default().with_drag(-0.1).validate().is_err());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = PhysicsConfig::default().with_max_resolution_depth(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_with_partial_fields() {
        let config = PhysicsConfig::from_toml_str(
            r#"
            gravity = [0.0, -0.5, 0.0]
            drag = 0.1
            "#,
        )
        .unwrap();

        assert_eq!(config.gravity, Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(config.drag, 0.1);
        assert_eq!(config.max_resolution_depth, DEFAULT_MAX_RESOLUTION_DEPTH);
    }

    #[test]
    fn test_parse_ron() {
        let config = PhysicsConfig::from_ron_str(
            "(gravity: (0.0, -1.0, 0.0), drag: 0.25, max_resolution_depth: 4)",
        )
        .unwrap();

        assert_eq!(config.gravity, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(config.drag, 0.25);
        assert_eq!(config.max_resolution_depth, 4);
    }

    #[test]
    fn test_invalid_toml_value_rejected() {
        let result = PhysicsConfig::from_toml_str("drag = 2.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = PhysicsConfig::load_from_file("physics.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = std::env::temp_dir().join(format!("bowser_physics_{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let config = PhysicsConfig::default()
            .with_gravity(Vec3::new(0.0, -0.25, 0.0))
            .with_drag(0.05);
        config.save_to_file(&path).unwrap();

        let loaded = PhysicsConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
