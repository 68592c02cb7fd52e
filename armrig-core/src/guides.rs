/// Scene guides: the ground grid and the coordinate axes, drawn as lines
use nalgebra::Point3;

/// What a guide line marks; back ends pick a color per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideKind {
    AxisX,
    AxisY,
    AxisZ,
    Grid,
}

/// One world-space line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub kind: GuideKind,
}

impl Segment {
    pub fn new(start: Point3<f32>, end: Point3<f32>, kind: GuideKind) -> Self {
        Self { start, end, kind }
    }
}

/// Length of each coordinate axis from the origin
pub const AXIS_LENGTH: f32 = 5.0;

/// Grid lines run from -GRID_EXTENT to GRID_EXTENT, one unit apart
pub const GRID_EXTENT: i32 = 5;

/// Axes from the origin along +X, +Y and +Z
pub fn coordinate_axes() -> [Segment; 3] {
    let origin = Point3::origin();
    [
        Segment::new(origin, Point3::new(AXIS_LENGTH, 0.0, 0.0), GuideKind::AxisX),
        Segment::new(origin, Point3::new(0.0, AXIS_LENGTH, 0.0), GuideKind::AxisY),
        Segment::new(origin, Point3::new(0.0, 0.0, AXIS_LENGTH), GuideKind::AxisZ),
    ]
}

/// Square grid on the ground plane (y = 0), where projectiles land
pub fn ground_grid() -> Vec<Segment> {
    let extent = GRID_EXTENT as f32;
    (-GRID_EXTENT..=GRID_EXTENT)
        .flat_map(|i| {
            let i = i as f32;
            [
                Segment::new(
                    Point3::new(i, 0.0, -extent),
                    Point3::new(i, 0.0, extent),
                    GuideKind::Grid,
                ),
                Segment::new(
                    Point3::new(-extent, 0.0, i),
                    Point3::new(extent, 0.0, i),
                    GuideKind::Grid,
                ),
            ]
        })
        .collect()
}

/// Grid first, axes last so they win ties on the ground plane
pub fn scene_guides() -> Vec<Segment> {
    let mut guides = ground_grid();
    guides.extend(coordinate_axes());
    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_lies_on_ground() {
        let grid = ground_grid();
        // 11 lines along Z plus 11 along X
        assert_eq!(grid.len(), 22);
        for segment in &grid {
            assert_eq!(segment.start.y, 0.0);
            assert_eq!(segment.end.y, 0.0);
            assert!(((segment.end - segment.start).norm() - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_axes() {
        let axes = coordinate_axes();
        assert_eq!(axes[1].kind, GuideKind::AxisY);
        assert!((axes[1].end - Point3::new(0.0, 5.0, 0.0)).norm() < 1e-6);
        assert_eq!(scene_guides().len(), 25);
    }
}
