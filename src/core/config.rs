use crate::core::GravityType;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the physics simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// The fixed time step for the simulation
    pub time_step: f32,

    /// The maximum number of substeps for variable time step simulation
    pub max_substeps: u32,

    /// The type of gravity in the simulation
    pub gravity: GravityType,

    /// Upper bound on penetration resolution passes per step
    pub position_iterations: u32,

    /// Upper bound on Gauss-Seidel velocity passes per step
    pub velocity_iterations: u32,

    /// Whether persistent contacts reuse last frame's accumulated impulses
    pub warm_starting: bool,

    /// Closing speed below which restitution is ignored (resting contacts)
    pub restitution_velocity_threshold: f32,

    /// Penetration below which a contact is considered resolved
    pub position_epsilon: f32,

    /// Impulse magnitude below which the velocity pass stops iterating
    pub velocity_epsilon: f32,

    /// Fraction of the lever arm a single penetration pass may rotate a body by
    pub angular_move_limit: f32,

    /// Global damping factor for linear velocity
    pub linear_damping: f32,

    /// Global damping factor for angular velocity
    pub angular_damping: f32,

    /// Whether to allow sleeping bodies
    pub allow_sleeping: bool,

    /// Averaged kinetic motion below which a body falls asleep
    pub sleep_epsilon: f32,

    /// Weight the motion average keeps after one second (applied per step as `bias^dt`)
    pub sleep_motion_bias: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            max_substeps: 10,
            gravity: GravityType::default(),
            position_iterations: 16,
            velocity_iterations: 10,
            warm_starting: true,
            restitution_velocity_threshold: 0.25,
            position_epsilon: 0.01,
            velocity_epsilon: 0.01,
            angular_move_limit: 0.2,
            linear_damping: 0.0,
            angular_damping: 0.0,
            allow_sleeping: true,
            sleep_epsilon: 0.3,
            sleep_motion_bias: 0.5,
        }
    }
}
