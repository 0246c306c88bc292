//! apoc-format: object archive decoder for Apocalypse
//!
//! Apocalypse keeps its 3D objects in one binary image loaded at a fixed
//! address. Two address tables inside the image point at the object records:
//! one for flats (single ground polygons with 2D vertices) and one for
//! polygon meshes. This crate reads those tables and decodes the records
//! into [`apoc_geometry`] storage.
//!
//! # Record layout
//!
//! All integers are little-endian.
//!
//! - Flat: `i32` vertex count, then `(x, y)` pairs of `i32`
//! - Mesh: `i32` vertex count, `(x, y, z)` triples of `i32`, `i32` primitive
//!   count, one 8-byte slot per primitive (side count byte followed by up to
//!   seven vertex index bytes), then one colour byte per primitive
//!
//! # Usage
//!
//! ```ignore
//! use apoc_format::{ObjectIndex, ObjectKind, ObjectReader, decode_object, locate_object};
//! use apoc_geometry::MeshBuffer;
//!
//! let mut reader = ObjectReader::new(std::io::Cursor::new(std::fs::read("Apocalypse")?));
//! let kind = ObjectKind::Mesh;
//! let index = ObjectIndex::read(&mut reader, kind.default_index_offset(), 0, 199)?;
//!
//! let mut buffer = MeshBuffer::new();
//! for (object, offset) in index.iter() {
//!     locate_object(&mut reader, object, offset)?;
//!     buffer.reset();
//!     let info = decode_object(&mut reader, kind, object, Some(&mut buffer))?;
//!     println!("{}: {} vertices", kind.object_name(object), info.vertex_count);
//! }
//! ```

mod decoder;
mod error;
mod index;
mod names;
mod reader;

pub use decoder::{DecodedObject, decode_object, flip_backfacing, locate_object};
pub use error::{DecodeError, Field};
pub use index::{ObjectIndex, resolve_address};
pub use names::{flat_name, mesh_name};
pub use reader::{ObjectReader, Peek};

// =============================================================================
// Constants
// =============================================================================

/// Address at which the game image is loaded
pub const LOAD_ADDRESS: u64 = 0x8f00;

/// Address of the flat object address table
pub const FLAT_INDEX_ADDRESS: u64 = 0x18b64;

/// Address of the mesh object address table
pub const MESH_INDEX_ADDRESS: u64 = 0x19b6c;

/// Number of entries in the mesh address table
pub const MAX_MESHES: usize = 200;

/// Number of entries in the flat address table
pub const MAX_FLATS: usize = 26;

/// Maximum vertices in one object
pub const MAX_VERTICES: usize = 256;

/// Minimum sides of a mesh primitive
pub const MIN_SIDES: usize = 3;

/// Maximum sides of a mesh primitive
pub const MAX_SIDES: usize = 7;

/// Size of one mesh primitive record, whatever its side count
pub const PRIMITIVE_STRIDE: u64 = 8;

/// Size of one address table entry
pub const INDEX_ENTRY_SIZE: u64 = 4;

/// The two kinds of object record in an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Single ground or ceiling polygon with 2D vertices
    Flat,
    /// Polygon mesh with 3D vertices and coloured primitives
    Mesh,
}

impl ObjectKind {
    /// Number of objects of this kind in an archive
    pub const fn max_objects(self) -> usize {
        match self {
            ObjectKind::Flat => MAX_FLATS,
            ObjectKind::Mesh => MAX_MESHES,
        }
    }

    /// File offset of this kind's address table
    pub const fn default_index_offset(self) -> u64 {
        match self {
            ObjectKind::Flat => FLAT_INDEX_ADDRESS - LOAD_ADDRESS,
            ObjectKind::Mesh => MESH_INDEX_ADDRESS - LOAD_ADDRESS,
        }
    }

    /// Canonical name of object `index` of this kind
    pub fn object_name(self, index: usize) -> String {
        match self {
            ObjectKind::Flat => flat_name(index),
            ObjectKind::Mesh => mesh_name(index),
        }
    }
}
