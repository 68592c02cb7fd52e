/// Tunable constants for input edits, the camera, the projectile and aiming
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base translation per arrow press
    pub base_step: f32,
    /// Joint rotation per arrow press, in degrees
    pub joint_step_degrees: f32,

    /// Orbit angle change per arrow press, in radians
    pub camera_step: f32,
    /// Elevation limit either side of the horizon, in degrees
    pub camera_max_elevation_degrees: f32,
    pub camera_radius: f32,
    pub camera_initial_azimuth: f32,

    pub stylus_length: f32,
    /// Height added to the middle control point of the launch arc
    pub lob_height: f32,
    /// Z offset of the impact point from the launch point
    pub impact_offset_z: f32,
    /// Normalized progress per second
    pub launch_rate: f32,

    pub aim_iterations: usize,
    pub aim_tolerance: f32,
    /// Rotation axes shorter than this are treated as colinear and skipped
    pub aim_min_axis: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_step: 0.1,
            joint_step_degrees: 5.0,
            camera_step: 0.05,
            camera_max_elevation_degrees: 89.0,
            camera_radius: 10.0,
            camera_initial_azimuth: FRAC_PI_2,
            stylus_length: 1.2,
            lob_height: 2.0,
            impact_offset_z: -1.5,
            launch_rate: 1.5,
            aim_iterations: 10,
            aim_tolerance: 0.01,
            aim_min_axis: 0.001,
        }
    }
}

impl Settings {
    pub fn joint_step(&self) -> f32 {
        self.joint_step_degrees.to_radians()
    }

    pub fn camera_max_elevation(&self) -> f32 {
        self.camera_max_elevation_degrees.to_radians()
    }
}
