//! The robotic-arm rig: a fixed part table turned into a scene graph.

use log::debug;
use nalgebra::{Matrix4, Vector3};
use std::collections::HashMap;
use std::fmt;

use crate::error::RigError;
use crate::library::Drawable;
use crate::pick::PickId;
use crate::scene::{NodeId, SceneGraph};
use crate::transform::Transform;

/// Named parts of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Base,
    Top,
    Arm1,
    Joint,
    Arm2,
    Pen,
    Projectile,
}

impl Part {
    pub const ALL: [Part; 7] = [
        Part::Base,
        Part::Top,
        Part::Arm1,
        Part::Joint,
        Part::Arm2,
        Part::Pen,
        Part::Projectile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Part::Base => "base",
            Part::Top => "top",
            Part::Arm1 => "arm1",
            Part::Joint => "joint",
            Part::Arm2 => "arm2",
            Part::Pen => "pen",
            Part::Projectile => "projectile",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of a rig table
#[derive(Debug, Clone, Copy)]
pub struct PartSpec {
    pub part: Part,
    pub parent: Option<Part>,
    /// Rest position relative to the parent
    pub offset: [f32; 3],
    pub pick_id: u8,
    /// OBJ file for this part inside an asset directory
    pub mesh_file: &'static str,
    /// Box used when no asset directory is given (width, height, depth)
    pub fallback_size: [f32; 3],
}

/// The standard arm, parents listed before children
pub const STANDARD_RIG: [PartSpec; 7] = [
    PartSpec {
        part: Part::Base,
        parent: None,
        offset: [0.0, 0.0, 0.0],
        pick_id: 2,
        mesh_file: "Base2.obj",
        fallback_size: [1.6, 0.3, 1.6],
    },
    PartSpec {
        part: Part::Top,
        parent: Some(Part::Base),
        offset: [0.0, 1.0, 0.0],
        pick_id: 3,
        mesh_file: "Top.obj",
        fallback_size: [0.8, 0.4, 0.8],
    },
    PartSpec {
        part: Part::Arm1,
        parent: Some(Part::Top),
        offset: [0.0, 0.2, 0.0],
        pick_id: 4,
        mesh_file: "Arm1.obj",
        fallback_size: [0.25, 0.25, 1.2],
    },
    PartSpec {
        part: Part::Joint,
        parent: Some(Part::Arm1),
        offset: [0.0, 0.0, -1.2],
        pick_id: 5,
        mesh_file: "Joint.obj",
        fallback_size: [0.35, 0.35, 0.35],
    },
    PartSpec {
        part: Part::Arm2,
        parent: Some(Part::Joint),
        offset: [0.0, 0.0, -0.03],
        pick_id: 6,
        mesh_file: "Arm2.obj",
        fallback_size: [0.2, 1.0, 0.2],
    },
    PartSpec {
        part: Part::Pen,
        parent: Some(Part::Arm2),
        offset: [0.0, -0.7, 0.71],
        pick_id: 7,
        mesh_file: "Pen.obj",
        fallback_size: [0.1, 0.1, 0.8],
    },
    PartSpec {
        part: Part::Projectile,
        parent: Some(Part::Pen),
        offset: [0.0, 0.0, 0.9],
        pick_id: 8,
        mesh_file: "Object.obj",
        fallback_size: [0.15, 0.15, 0.15],
    },
];

/// A scene graph plus the node of every rig part
#[derive(Debug, Clone)]
pub struct Rig {
    pub graph: SceneGraph,
    nodes: HashMap<Part, NodeId>,
    specs: Vec<PartSpec>,
}

impl Rig {
    pub fn standard() -> Result<Self, RigError> {
        Self::from_table(&STANDARD_RIG)
    }

    /// Build the tree from a table where each parent precedes its children
    pub fn from_table(table: &[PartSpec]) -> Result<Self, RigError> {
        let mut graph = SceneGraph::new();
        let mut nodes = HashMap::with_capacity(table.len());

        for spec in table {
            if nodes.contains_key(&spec.part) {
                return Err(RigError::DuplicatePart(spec.part.name()));
            }
            let unknown_parent = || RigError::UnknownParent {
                part: spec.part.name(),
                parent: spec.parent.map_or("", Part::name),
            };
            let parent = match spec.parent {
                Some(parent) => Some(*nodes.get(&parent).ok_or_else(unknown_parent)?),
                None => None,
            };
            let offset = Vector3::from(spec.offset);
            let id = graph
                .add_node(spec.part.name(), parent, Transform::translation_matrix(&offset))
                .ok_or_else(unknown_parent)?;
            graph.node_mut(id).pick_id = PickId::new(spec.pick_id);
            nodes.insert(spec.part, id);
        }

        if let Some(missing) = Part::ALL.iter().find(|part| !nodes.contains_key(part)) {
            return Err(RigError::MissingPart(missing.name()));
        }

        graph.update_transforms();
        debug!("Built rig with {} nodes", graph.len());

        Ok(Self {
            graph,
            nodes,
            specs: table.to_vec(),
        })
    }

    pub fn id(&self, part: Part) -> NodeId {
        // from_table guarantees every part is present
        self.nodes[&part]
    }

    pub fn specs(&self) -> &[PartSpec] {
        &self.specs
    }

    pub fn local(&self, part: Part) -> &Matrix4<f32> {
        &self.graph.node(self.id(part)).local
    }

    pub fn local_mut(&mut self, part: Part) -> &mut Matrix4<f32> {
        let id = self.id(part);
        &mut self.graph.node_mut(id).local
    }

    pub fn world(&self, part: Part) -> &Matrix4<f32> {
        self.graph.node(self.id(part)).world()
    }

    pub fn attach_drawable(&mut self, part: Part, drawable: Drawable) {
        let id = self.id(part);
        self.graph.node_mut(id).drawable = Some(drawable);
    }

    /// Part whose node carries this pick id
    pub fn part_for_pick(&self, pick: PickId) -> Option<Part> {
        Part::ALL
            .into_iter()
            .find(|&part| self.graph.node(self.id(part)).pick_id == Some(pick))
    }

    pub fn update_transforms(&mut self) {
        self.graph.update_transforms();
    }
}
