//! Projectile flight along a quadratic Bézier arc.
//!
//! The arc is fixed at launch from the pen's world transform; progress then
//! advances at a constant rate until it reaches 1, at which point the landing
//! point is reported once and the projectile goes idle again.

use log::info;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::settings::Settings;

/// Quadratic Bézier curve through three control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub control: [Point3<f32>; 3],
}

impl QuadraticBezier {
    pub fn new(c0: Point3<f32>, c1: Point3<f32>, c2: Point3<f32>) -> Self {
        Self {
            control: [c0, c1, c2],
        }
    }

    /// `(1-t)²C0 + 2(1-t)t C1 + t²C2`
    pub fn evaluate(&self, t: f32) -> Point3<f32> {
        let [c0, c1, c2] = self.control;
        let u = 1.0 - t;
        Point3::from(c0.coords * (u * u) + c1.coords * (2.0 * u * t) + c2.coords * (t * t))
    }

    pub fn start(&self) -> Point3<f32> {
        self.control[0]
    }

    pub fn end(&self) -> Point3<f32> {
        self.control[2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Launched,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    phase: Phase,
    progress: f32,
    position: Point3<f32>,
    arc: Option<QuadraticBezier>,
}

impl Default for Projectile {
    fn default() -> Self {
        Self::new()
    }
}

impl Projectile {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            progress: 0.0,
            position: Point3::origin(),
            arc: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_launched(&self) -> bool {
        self.phase == Phase::Launched
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// The arc of the current or most recent flight
    pub fn arc(&self) -> Option<&QuadraticBezier> {
        self.arc.as_ref()
    }

    /// Control points for a launch from the pen's world transform.
    ///
    /// C0 sits on the stylus tip, C1 is pushed along the stylus axis and
    /// lifted to make a lob, and C2 lands on the ground plane offset along Z.
    pub fn launch_arc(pen_world: &Matrix4<f32>, settings: &Settings) -> QuadraticBezier {
        let length = settings.stylus_length;
        let tip = pen_world * Vector4::new(0.0, 0.0, length - 0.2, 1.0);
        let c0 = Point3::new(tip.x, tip.y, tip.z);

        let axis = (pen_world * Vector4::new(0.0, 1.0, 0.0, 0.0)).xyz();
        let direction = axis.try_normalize(1e-12).unwrap_or_else(Vector3::y);

        let c1 = c0 + direction * length * 0.5 + Vector3::new(0.0, settings.lob_height, 0.0);
        let c2 = Point3::new(c0.x, 0.0, c0.z + settings.impact_offset_z);

        QuadraticBezier::new(c0, c1, c2)
    }

    /// Start a flight. Returns `false` if one is already in progress.
    pub fn launch(&mut self, pen_world: &Matrix4<f32>, settings: &Settings) -> bool {
        if self.is_launched() {
            return false;
        }
        let arc = Self::launch_arc(pen_world, settings);
        info!(
            "Projectile launched from ({:.2}, {:.2}, {:.2}) toward ({:.2}, {:.2}, {:.2})",
            arc.start().x,
            arc.start().y,
            arc.start().z,
            arc.end().x,
            arc.end().y,
            arc.end().z
        );
        self.arc = Some(arc);
        self.position = arc.start();
        self.progress = 0.0;
        self.phase = Phase::Launched;
        true
    }

    /// Advance by `dt` seconds. Returns the impact point on the tick that lands.
    pub fn advance(&mut self, dt: f32, rate: f32) -> Option<Point3<f32>> {
        if !self.is_launched() {
            return None;
        }
        let arc = self.arc?;

        self.progress = (self.progress + dt.max(0.0) * rate).min(1.0);
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.position = arc.end();
            self.phase = Phase::Idle;
            info!(
                "Projectile landed at ({:.2}, {:.2}, {:.2})",
                self.position.x, self.position.y, self.position.z
            );
            return Some(self.position);
        }

        self.position = arc.evaluate(self.progress);
        None
    }
}
