//! Reusable scratch storage for one object at a time

use crate::{Group, VertexArray};

/// Vertex and primitive storage shared by every object in a file
///
/// Allocated once, then [`reset`](MeshBuffer::reset) before each object so
/// nothing decoded for one object can leak into the next. Capacity is kept
/// across resets.
#[derive(Debug, Default, Clone)]
pub struct MeshBuffer {
    pub vertices: VertexArray,
    pub group: Group,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all vertices and delete all primitives
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.group.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.group.is_empty()
    }
}
