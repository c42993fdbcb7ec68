#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Surface and bulk properties of a physics object
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Coefficient of restitution (bounciness), 0-1
    pub restitution: f32,

    /// Coefficient of friction
    pub friction: f32,

    /// Density of the material (kg/m^3)
    pub density: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(density: f32, friction: f32, restitution: f32) -> Self {
        Self {
            density,
            friction,
            restitution,
        }
    }

    /// Creates a material for ice (low friction, high restitution)
    pub fn ice() -> Self {
        Self::new(900.0, 0.05, 0.4)
    }

    /// Creates a material for rubber (high friction, high restitution)
    pub fn rubber() -> Self {
        Self::new(1200.0, 0.8, 0.7)
    }

    /// Creates a material for wood (medium friction, low restitution)
    pub fn wood() -> Self {
        Self::new(700.0, 0.6, 0.2)
    }

    /// Creates a material for metal (medium friction, medium restitution)
    pub fn metal() -> Self {
        Self::new(7800.0, 0.4, 0.5)
    }

    /// Creates a material for concrete (high friction, low restitution)
    pub fn concrete() -> Self {
        Self::new(2400.0, 0.9, 0.1)
    }

    /// Combined restitution for a contact between two materials (the bouncier one wins)
    #[inline]
    pub fn combined_restitution(&self, other: &Material) -> f32 {
        self.restitution.max(other.restitution)
    }

    /// Combined friction for a contact between two materials (the slipperier one wins)
    #[inline]
    pub fn combined_friction(&self, other: &Material) -> f32 {
        self.friction.min(other.friction)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1000.0,  // Density of water (kg/m^3)
            friction: 0.5,    // Medium friction
            restitution: 0.3, // Slight bounce
        }
    }
}
