/// ASCII rasterizer for terminal rendering, with a pick buffer alongside
use armrig_core::{Camera, GuideKind, IndexedMesh, PickId, Segment, Triangle};
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Faces turned away from the light still get this much brightness
const AMBIENT: f32 = 0.2;

/// Guides sit a hair behind coincident surfaces
const GUIDE_DEPTH_BIAS: f32 = 1e-5;

/// How a cell is colored when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellStyle {
    Shaded,
    Selected,
    Guide(GuideKind),
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    style_buffer: Vec<CellStyle>,
    /// Flat pick id per cell, [`PickId::BACKGROUND`] where nothing was drawn
    id_buffer: Vec<u8>,
    light_dir: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            style_buffer: vec![CellStyle::Shaded; size],
            id_buffer: vec![PickId::BACKGROUND; size],
            light_dir: Vector3::new(0.4, 1.0, 0.6).normalize(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Nothing can be drawn into a zero-sized viewport
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Viewport aspect ratio corrected for the cell shape
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / (self.height.max(1) as f32 * CELL_ASPECT)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.style_buffer.fill(CellStyle::Shaded);
        self.id_buffer.fill(PickId::BACKGROUND);
    }

    /// Draw world-space guide lines. They are depth tested against meshes
    /// but never written into the id buffer, so they pick as background.
    pub fn render_guides(&mut self, guides: &[Segment], view_projection: &Matrix4<f32>) {
        if self.is_empty() {
            return;
        }
        for segment in guides {
            self.render_segment(segment, view_projection);
        }
    }

    fn render_segment(&mut self, segment: &Segment, view_projection: &Matrix4<f32>) {
        let (width, height) = (self.width as u32, self.height as u32);
        let Some(a) = Camera::project_to_screen(view_projection, &segment.start, width, height)
        else {
            return;
        };
        let Some(b) = Camera::project_to_screen(view_projection, &segment.end, width, height)
        else {
            return;
        };

        let character = match segment.kind {
            GuideKind::Grid => '.',
            GuideKind::AxisX | GuideKind::AxisY | GuideKind::AxisZ => '+',
        };

        // DDA over the longer screen extent, one sample per cell
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let depth = a.2 + (b.2 - a.2) * t + GUIDE_DEPTH_BIAS;
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = character;
                self.style_buffer[idx] = CellStyle::Guide(segment.kind);
                self.id_buffer[idx] = PickId::BACKGROUND;
            }
        }
    }

    /// Rasterize `mesh` placed by `model` into every buffer
    pub fn render_mesh(
        &mut self,
        mesh: &IndexedMesh,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        selected: bool,
        pick_id: Option<PickId>,
    ) {
        if self.is_empty() {
            return;
        }
        let mvp = view_projection * model;
        let rotation: Matrix3<f32> = model.fixed_view::<3, 3>(0, 0).into_owned();
        let pick = pick_id.map_or(PickId::BACKGROUND, PickId::value);

        for triangle in mesh.triangles() {
            self.render_triangle(&triangle, &mvp, &rotation, selected, pick);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        mvp: &Matrix4<f32>,
        rotation: &Matrix3<f32>,
        selected: bool,
        pick: u8,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match Camera::project_to_screen(
                mvp,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Face normal in world space for shading
        let normal = (rotation * triangle.calculate_normal())
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let brightness = AMBIENT + (1.0 - AMBIENT) * normal.dot(&self.light_dir).max(0.0);

        // Map brightness to character, never the blank one
        let last = LUMINOSITY_RAMP.len() - 1;
        let char_index = ((brightness * last as f32) as usize).clamp(1, last);
        let fragment = Fragment {
            character: LUMINOSITY_RAMP[char_index],
            style: if selected {
                CellStyle::Selected
            } else {
                CellStyle::Shaded
            },
            pick,
        };

        self.rasterize_triangle(&screen_coords, fragment);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], fragment: Fragment) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = fragment.character;
                    self.style_buffer[idx] = fragment.style;
                    self.id_buffer[idx] = fragment.pick;
                }
            }
        }
    }

    /// Pick id of the nearest surface drawn at a cell
    pub fn pick(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return PickId::BACKGROUND;
        }
        self.id_buffer[y * self.width + x]
    }

    pub fn is_highlighted(&self, x: usize, y: usize) -> bool {
        self.style_at(x, y) == Some(CellStyle::Selected)
    }

    /// Guide drawn at a cell, if a guide line is the nearest thing there
    pub fn guide_at(&self, x: usize, y: usize) -> Option<GuideKind> {
        match self.style_at(x, y)? {
            CellStyle::Guide(kind) => Some(kind),
            _ => None,
        }
    }

    fn style_at(&self, x: usize, y: usize) -> Option<CellStyle> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.style_buffer[y * self.width + x])
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Selected parts stand out, everything else by intensity
                let color = match self.style_buffer[idx] {
                    CellStyle::Selected => Color::Yellow,
                    CellStyle::Guide(GuideKind::AxisX) => Color::Red,
                    CellStyle::Guide(GuideKind::AxisY) => Color::Green,
                    CellStyle::Guide(GuideKind::AxisZ) => Color::Blue,
                    CellStyle::Guide(GuideKind::Grid) => Color::DarkGrey,
                    CellStyle::Shaded => match c {
                        ' ' | '.' | ':' => Color::DarkGrey,
                        '-' | '=' => Color::Grey,
                        '+' | '*' => Color::White,
                        '#' | '%' | '@' => Color::Cyan,
                        _ => Color::White,
                    },
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
    character: char,
    style: CellStyle,
    pick: u8,
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
