/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Smallest aspect ratio handed to the projection
const MIN_ASPECT: f32 = 1e-3;

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Point3::new(10.0, 10.0, 10.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the perspective projection matrix.
    ///
    /// A collapsed viewport (zero or NaN aspect) is held at `MIN_ASPECT`.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let aspect = self.aspect.max(MIN_ASPECT);
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space with a precomputed
    /// view-projection matrix. Returns `(x, y, depth)` with depth in NDC.
    pub fn project_to_screen(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = view_projection * point.to_homogeneous();

        // Behind the eye or on the eye plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

/// Spherical camera placement around the world origin, driven by arrow keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Azimuth in radians
    pub horizontal: f32,
    /// Elevation in radians, kept within `max_elevation`
    pub vertical: f32,
    pub radius: f32,
    pub max_elevation: f32,
}

impl OrbitCamera {
    pub fn new(horizontal: f32, radius: f32, max_elevation: f32) -> Self {
        Self {
            horizontal,
            vertical: 0.0,
            radius,
            max_elevation,
        }
    }

    pub fn orbit(&mut self, delta: f32) {
        self.horizontal += delta;
    }

    /// Change elevation, clamped so the view never flips over the pole
    pub fn tilt(&mut self, delta: f32) {
        self.vertical = (self.vertical + delta).clamp(-self.max_elevation, self.max_elevation);
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::new(
            self.radius * self.vertical.cos() * self.horizontal.sin(),
            self.radius * self.vertical.sin(),
            self.radius * self.vertical.cos() * self.horizontal.cos(),
        )
    }

    /// Point `camera` at the origin from the current orbit position
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = Point3::origin();
    }
}
