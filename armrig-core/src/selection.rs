//! Which part the arrow keys act on, and what each arrow does to it.

use log::info;
use nalgebra::Vector3;
use std::fmt;

use crate::projection::OrbitCamera;
use crate::rig::{Part, Rig};
use crate::settings::Settings;
use crate::transform::Transform;

/// Mutually exclusive selection targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    None,
    Camera,
    Base,
    Top,
    Arm1,
    Arm2,
    Pen,
}

impl Target {
    /// Rig part edited by this target, if any
    pub fn part(self) -> Option<Part> {
        match self {
            Target::Base => Some(Part::Base),
            Target::Top => Some(Part::Top),
            Target::Arm1 => Some(Part::Arm1),
            Target::Arm2 => Some(Part::Arm2),
            Target::Pen => Some(Part::Pen),
            Target::None | Target::Camera => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part() {
            Some(part) => write!(f, "{}", part),
            None if *self == Target::Camera => f.write_str("camera"),
            None => f.write_str("nothing"),
        }
    }
}

/// Arrow key directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// -1 for left/down, +1 for right/up
    fn sign(self) -> f32 {
        match self {
            Direction::Left | Direction::Down => -1.0,
            Direction::Right | Direction::Up => 1.0,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Current selection; mirrors itself onto the rig's node flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Target,
}

impl Selection {
    pub fn current(&self) -> Target {
        self.current
    }

    pub fn is_selected(&self, target: Target) -> bool {
        target != Target::None && self.current == target
    }

    /// Select `target`, clearing every other flag first
    pub fn select(&mut self, target: Target, rig: &mut Rig) {
        rig.graph.clear_selection();
        self.current = target;
        if let Some(part) = target.part() {
            let id = rig.id(part);
            rig.graph.node_mut(id).selected = true;
        }
        info!("{} selected", target);
    }

    /// Apply one arrow press to the selected target.
    ///
    /// Returns `false` when the press has no meaning for the current target.
    pub fn apply(
        &self,
        direction: Direction,
        shift: bool,
        rig: &mut Rig,
        camera: &mut OrbitCamera,
        settings: &Settings,
    ) -> bool {
        let sign = direction.sign();
        let step = settings.joint_step() * sign;

        match (self.current, direction.is_horizontal()) {
            (Target::Camera, true) => camera.orbit(settings.camera_step * sign),
            (Target::Camera, false) => camera.tilt(settings.camera_step * sign),
            (Target::Base, true) => {
                let offset = Vector3::new(settings.base_step * sign, 0.0, 0.0);
                let local = rig.local_mut(Part::Base);
                *local = Transform::translate(local, &offset);
            }
            (Target::Top, true) => rotate_part(rig, Part::Top, step, Vector3::y()),
            (Target::Arm1, false) => rotate_part(rig, Part::Arm1, step, Vector3::x()),
            (Target::Arm2, false) => rotate_part(rig, Part::Arm2, step, Vector3::x()),
            // Shift switches the pen from swivel to twist
            (Target::Pen, true) if shift => rotate_part(rig, Part::Pen, step, Vector3::z()),
            (Target::Pen, true) => rotate_part(rig, Part::Pen, step, Vector3::y()),
            (Target::Pen, false) => rotate_part(rig, Part::Pen, step, Vector3::x()),
            _ => return false,
        }
        true
    }
}

fn rotate_part(rig: &mut Rig, part: Part, angle: f32, axis: Vector3<f32>) {
    let local = rig.local_mut(part);
    *local = Transform::rotate(local, angle, &axis);
}
