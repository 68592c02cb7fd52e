/// Drawable storage: meshes are loaded once and referenced by handle
use crate::geometry::IndexedMesh;

/// Handle into a [`MeshLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId(usize);

/// What a scene node holds: a buffer handle plus the number of indices to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    pub handle: DrawableId,
    pub index_count: usize,
}

/// Owns every mesh for the lifetime of the application.
///
/// Meshes are never removed, so a [`Drawable`] handed out by this library
/// stays valid until the library itself is dropped.
#[derive(Debug, Default)]
pub struct MeshLibrary {
    meshes: Vec<IndexedMesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mesh: IndexedMesh) -> Drawable {
        let drawable = Drawable {
            handle: DrawableId(self.meshes.len()),
            index_count: mesh.index_count(),
        };
        self.meshes.push(mesh);
        drawable
    }

    pub fn get(&self, handle: DrawableId) -> Option<&IndexedMesh> {
        self.meshes.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
