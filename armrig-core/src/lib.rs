//! armrig core library: the articulated arm, its scene graph and everything
//! that drives it between frames.
//!
//! Rendering back ends only consume [`App::render_items`] and feed key and
//! pick events back in; no drawing happens here.

pub mod aim;
pub mod app;
pub mod error;
pub mod geometry;
pub mod guides;
pub mod indexer;
pub mod input;
pub mod library;
pub mod obj;
pub mod pick;
pub mod projectile;
pub mod projection;
pub mod rig;
pub mod scene;
pub mod selection;
pub mod settings;
pub mod transform;

// Re-export commonly used types
pub use aim::{adjust_toward, AimReport, TwoJointChain};
pub use app::{App, InputOutcome, RenderItem};
pub use error::{Error, MeshError, Result, RigError};
pub use geometry::{IndexedMesh, Triangle, Vertex};
pub use guides::{GuideKind, Segment};
pub use indexer::index_vbo;
pub use input::{Command, Key, KeyAction, KeyInput};
pub use library::{Drawable, DrawableId, MeshLibrary};
pub use obj::{load_indexed, load_obj, parse_obj, ObjData};
pub use pick::{PickId, PickResult};
pub use projectile::{Phase, Projectile, QuadraticBezier};
pub use projection::{Camera, OrbitCamera};
pub use rig::{Part, PartSpec, Rig, STANDARD_RIG};
pub use scene::{NodeId, SceneGraph, SceneNode};
pub use selection::{Direction, Selection, Target};
pub use settings::Settings;
pub use transform::Transform;
