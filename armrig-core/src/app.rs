//! Application state: everything the frame loop reads and mutates.

use log::{info, warn};
use nalgebra::Matrix4;

use crate::aim::{self, AimReport, TwoJointChain};
use crate::error::RigError;
use crate::guides::{self, Segment};
use crate::input::{Command, KeyAction, KeyInput};
use crate::library::Drawable;
use crate::pick::{PickId, PickResult};
use crate::projectile::Projectile;
use crate::projection::{Camera, OrbitCamera};
use crate::rig::{Part, Rig};
use crate::selection::{Selection, Target};
use crate::settings::Settings;
use crate::transform::Transform;

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Selected(Target),
    Edited(Target),
    Launched,
    Quit,
    Ignored,
}

/// One draw call for the front end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub world: Matrix4<f32>,
    pub drawable: Drawable,
    pub selected: bool,
    pub pick_id: Option<PickId>,
}

pub struct App {
    pub rig: Rig,
    pub selection: Selection,
    pub orbit: OrbitCamera,
    pub projectile: Projectile,
    pub settings: Settings,
    camera: Camera,
    guides: Vec<Segment>,
    projectile_rest: Matrix4<f32>,
    message: String,
    last_aim: Option<AimReport>,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, RigError> {
        Ok(Self::with_rig(Rig::standard()?, settings))
    }

    pub fn with_rig(mut rig: Rig, settings: Settings) -> Self {
        let orbit = OrbitCamera::new(
            settings.camera_initial_azimuth,
            settings.camera_radius,
            settings.camera_max_elevation(),
        );
        let projectile_rest = *rig.local(Part::Projectile);
        let id = rig.id(Part::Projectile);
        rig.graph.node_mut(id).visible = false;
        rig.update_transforms();

        Self {
            rig,
            selection: Selection::default(),
            orbit,
            projectile: Projectile::new(),
            settings,
            camera: Camera::default(),
            guides: guides::scene_guides(),
            projectile_rest,
            message: String::new(),
            last_aim: None,
        }
    }

    /// Map a key event onto selection, transform edits or a launch
    pub fn handle_key(&mut self, input: &KeyInput) -> InputOutcome {
        if input.action == KeyAction::Release {
            return InputOutcome::Ignored;
        }
        let Some(command) = input.key.command() else {
            return InputOutcome::Ignored;
        };

        match command {
            Command::Select(target) => {
                self.selection.select(target, &mut self.rig);
                if target == Target::Camera {
                    self.orbit.apply(&mut self.camera);
                }
                self.message = format!("{} selected", target);
                InputOutcome::Selected(target)
            }
            Command::Nudge(direction) => {
                let edited = self.selection.apply(
                    direction,
                    input.shift,
                    &mut self.rig,
                    &mut self.orbit,
                    &self.settings,
                );
                if !edited {
                    return InputOutcome::Ignored;
                }
                if self.selection.current() == Target::Camera {
                    self.orbit.apply(&mut self.camera);
                }
                InputOutcome::Edited(self.selection.current())
            }
            Command::Launch => {
                self.rig.update_transforms();
                let pen = *self.rig.world(Part::Pen);
                if self.projectile.launch(&pen, &self.settings) {
                    self.place_projectile();
                    self.rig.update_transforms();
                    self.message = "projectile launched".to_string();
                    InputOutcome::Launched
                } else {
                    InputOutcome::Ignored
                }
            }
            Command::Quit => InputOutcome::Quit,
        }
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Returns the aim report on the frame the projectile lands.
    pub fn update(&mut self, dt: f32) -> Option<AimReport> {
        self.rig.update_transforms();

        let landed = self.projectile.advance(dt, self.settings.launch_rate);
        self.place_projectile();
        self.rig.update_transforms();

        let impact = landed?;
        let chain = self.aim_chain();
        let report = aim::adjust_toward(&mut self.rig.graph, &chain, &impact, &self.settings);
        self.message = if report.converged {
            format!("arm reached impact after {} iterations", report.iterations)
        } else {
            format!("arm stopped {:.2} short of impact", report.distance)
        };
        self.last_aim = Some(report);
        Some(report)
    }

    /// arm1 and arm2 steer the pen
    pub fn aim_chain(&self) -> TwoJointChain {
        TwoJointChain {
            first: self.rig.id(Part::Arm1),
            second: self.rig.id(Part::Arm2),
            effector: self.rig.id(Part::Pen),
        }
    }

    /// Keep the projectile node on the flight path, or parked and hidden
    fn place_projectile(&mut self) {
        let launched = self.projectile.is_launched();
        let local = if launched {
            let position = Transform::translation_matrix(&self.projectile.position().coords);
            match self.rig.world(Part::Pen).try_inverse() {
                Some(pen_inverse) => pen_inverse * position,
                None => {
                    warn!("Pen transform is singular, projectile left in place");
                    *self.rig.local(Part::Projectile)
                }
            }
        } else {
            self.projectile_rest
        };

        let id = self.rig.id(Part::Projectile);
        let node = self.rig.graph.node_mut(id);
        node.local = local;
        node.visible = launched;
    }

    /// Draw list for every visible node that has a drawable
    pub fn render_items(&self) -> Vec<RenderItem> {
        self.rig
            .graph
            .visible_nodes()
            .into_iter()
            .filter_map(|id| {
                let node = self.rig.graph.node(id);
                node.drawable.map(|drawable| RenderItem {
                    world: *node.world(),
                    drawable,
                    selected: node.selected,
                    pick_id: node.pick_id,
                })
            })
            .collect()
    }

    /// Ground grid and coordinate axes, fixed in world space
    pub fn guides(&self) -> &[Segment] {
        &self.guides
    }

    /// Camera for a viewport of the given aspect ratio
    pub fn camera(&self, aspect: f32) -> Camera {
        let mut camera = self.camera.clone();
        camera.aspect = aspect;
        camera
    }

    /// Interpret a value read back from the pick buffer
    pub fn pick(&mut self, channel: u8) -> PickResult {
        let result = PickResult::from_channel(channel);
        match result {
            PickResult::Object(id) => match self.rig.part_for_pick(id) {
                Some(part) => info!("Picked {} ({})", part, result),
                None => info!("Picked {}", result),
            },
            PickResult::Background => info!("Picked background"),
        }
        self.message = result.to_string();
        result
    }

    /// Latest status line for the HUD
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn last_aim(&self) -> Option<&AimReport> {
        self.last_aim.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IndexedMesh;
    use crate::input::Key;
    use crate::library::MeshLibrary;

    fn app() -> App {
        App::new(Settings::default()).unwrap()
    }

    #[test]
    fn test_release_is_ignored() {
        let mut app = app();
        let input = KeyInput {
            key: Key::Char('p'),
            action: KeyAction::Release,
            shift: false,
        };
        assert_eq!(app.handle_key(&input), InputOutcome::Ignored);
        assert_eq!(app.selection.current(), Target::None);
    }

    #[test]
    fn test_select_then_edit() {
        let mut app = app();
        assert_eq!(
            app.handle_key(&KeyInput::press(Key::Char('1'))),
            InputOutcome::Selected(Target::Arm1)
        );
        assert_eq!(app.message(), "arm1 selected");
        assert_eq!(
            app.handle_key(&KeyInput::press(Key::Up)),
            InputOutcome::Edited(Target::Arm1)
        );
        assert_eq!(app.handle_key(&KeyInput::press(Key::Left)), InputOutcome::Ignored);
    }

    #[test]
    fn test_camera_edit_moves_view() {
        let mut app = app();
        app.handle_key(&KeyInput::press(Key::Char('c')));
        let before = app.camera(1.0).position;
        app.handle_key(&KeyInput::press(Key::Right));
        assert_ne!(app.camera(1.0).position, before);
        assert_eq!(app.camera(2.0).aspect, 2.0);
    }

    #[test]
    fn test_projectile_hidden_until_launch() {
        let mut app = app();
        let mut library = MeshLibrary::new();
        for part in Part::ALL {
            let drawable = library.insert(IndexedMesh::cuboid(0.1, 0.1, 0.1));
            app.rig.attach_drawable(part, drawable);
        }
        let projectile_pick = PickId::new(8);

        assert_eq!(app.render_items().len(), 6);
        assert!(app.render_items().iter().all(|item| item.pick_id != projectile_pick));

        assert_eq!(app.handle_key(&KeyInput::press(Key::Char('s'))), InputOutcome::Launched);
        assert_eq!(app.handle_key(&KeyInput::press(Key::Char('s'))), InputOutcome::Ignored);
        assert_eq!(app.render_items().len(), 7);
    }

    #[test]
    fn test_projectile_node_follows_flight() {
        let mut app = app();
        app.handle_key(&KeyInput::press(Key::Char('s')));
        let start = app.projectile.arc().unwrap().start();
        let node = app.rig.graph.node(app.rig.id(Part::Projectile));
        assert!((node.world_position() - start).norm() < 1e-5);

        assert!(app.update(0.2).is_none());
        let node = app.rig.graph.node(app.rig.id(Part::Projectile));
        assert!((node.world_position() - app.projectile.position()).norm() < 1e-5);
    }

    #[test]
    fn test_landing_triggers_aim() {
        let mut app = app();
        app.handle_key(&KeyInput::press(Key::Char('s')));
        let impact = app.projectile.arc().unwrap().end();

        let report = app.update(1.0).expect("projectile should land");
        assert!(report.iterations <= app.settings.aim_iterations);
        assert!(report.converged);
        let pen = app.rig.graph.node(app.rig.id(Part::Pen)).world_position();
        assert!((pen - impact).norm() < app.settings.aim_tolerance);

        assert!(!app.rig.graph.node(app.rig.id(Part::Projectile)).visible);
        assert!(app.update(1.0).is_none());
        assert_eq!(app.last_aim(), Some(&report));
    }

    #[test]
    fn test_guides_mark_the_landing_plane() {
        let mut app = app();
        app.handle_key(&KeyInput::press(Key::Char('s')));
        let impact = app.projectile.arc().unwrap().end();

        let grid: Vec<_> = app
            .guides()
            .iter()
            .filter(|segment| segment.kind == crate::guides::GuideKind::Grid)
            .collect();
        assert!(!grid.is_empty());
        assert!(grid.iter().all(|segment| segment.start.y == impact.y));
    }

    #[test]
    fn test_pick_messages() {
        let mut app = app();
        assert_eq!(app.pick(255), PickResult::Background);
        assert_eq!(app.message(), "background");
        app.pick(7);
        assert_eq!(app.message(), "point 7");
    }
}
