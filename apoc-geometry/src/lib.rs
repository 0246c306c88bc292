//! apoc-geometry: mesh storage for decoded Apocalypse objects
//!
//! The record decoder reads raw vertex and primitive data; everything that
//! happens to that data afterwards lives here:
//!
//! - [`VertexArray`] - vertex positions with usage marks, duplicate
//!   detection and compacting renumbering
//! - [`Primitive`] / [`Group`] - polygon side lists, colours and ids
//! - [`MeshBuffer`] - the reusable per-object scratch pair
//! - [`clip_polygons`] - splitting of overlapping coplanar polygons
//!
//! # Usage
//!
//! ```ignore
//! use apoc_geometry::{MeshBuffer, DVec3};
//!
//! let mut buffer = MeshBuffer::new();
//! for object in objects {
//!     buffer.reset();
//!     let v = buffer.vertices.add(DVec3::new(0.0, 0.0, 0.0))?;
//!     buffer.group.add()?.add_side(v)?;
//! }
//! ```

mod buffer;
mod clip;
mod error;
mod group;
mod primitive;
mod vertex;

pub use buffer::MeshBuffer;
pub use clip::clip_polygons;
pub use error::GeometryError;
pub use group::Group;
pub use primitive::Primitive;
pub use vertex::VertexArray;

pub use glam::DVec3;

/// Maximum number of sides a single primitive can hold
///
/// Flats use one primitive for every vertex of the object, so this is the
/// vertex limit of the archive format rather than the mesh side limit.
pub const MAX_PRIMITIVE_SIDES: usize = 256;
