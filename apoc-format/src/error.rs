//! Archive decoding error types

use std::fmt;
use std::io;

use apoc_geometry::GeometryError;

/// Errors raised while resolving the address table or decoding a record
///
/// Every format error names the object (and where relevant the primitive and
/// side) it was found in.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The address table could not be reached
    #[error("failed to seek objects index at file position {offset} ({offset:#x})")]
    IndexSeek {
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// The address table ended early
    #[error("failed to read address from input file (object {object})")]
    TruncatedIndex { object: usize },

    /// An address points before the address table
    #[error("bad address {address} ({address:#x}) for object {object} in index")]
    BadAddress { object: usize, address: i32 },

    /// An object's resolved offset is outside the file
    #[error("failed to seek object {object} at file position {offset} ({offset:#x})")]
    BadObjectOffset { object: usize, offset: u64 },

    #[error("bad number of vertices, {count} (object {object})")]
    BadVertexCount { object: usize, count: i32 },

    #[error("bad number of primitives, {count} (object {object})")]
    BadPrimitiveCount { object: usize, count: i32 },

    #[error("bad side count {count} (primitive {primitive} of object {object})")]
    BadSideCount {
        object: usize,
        primitive: usize,
        count: u8,
    },

    #[error("bad vertex {vertex} (side {side} of primitive {primitive} of object {object})")]
    BadVertexIndex {
        object: usize,
        primitive: usize,
        side: usize,
        vertex: u8,
    },

    /// A record ended early
    #[error("failed to read {field} (object {object})")]
    Truncated { object: usize, field: Field },

    /// Vertex or primitive storage failed
    #[error("{source} (object {object})")]
    Geometry {
        object: usize,
        #[source]
        source: GeometryError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Map a read failure to `Truncated` when it was a short read
    pub(crate) fn read(object: usize, field: Field) -> impl FnOnce(io::Error) -> DecodeError {
        move |e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                DecodeError::Truncated { object, field }
            } else {
                DecodeError::Io(e)
            }
        }
    }

    pub(crate) fn geometry(object: usize) -> impl FnOnce(GeometryError) -> DecodeError {
        move |source| DecodeError::Geometry { object, source }
    }
}

/// The part of a record being read when it ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    VertexCount,
    Vertex(usize),
    PrimitiveCount,
    SideCount { primitive: usize },
    Side { primitive: usize, side: usize },
    Colour { primitive: usize },
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::VertexCount => write!(f, "number of vertices"),
            Field::Vertex(v) => write!(f, "vertex {}", v),
            Field::PrimitiveCount => write!(f, "number of primitives"),
            Field::SideCount { primitive } => {
                write!(f, "no. of sides of primitive {}", primitive)
            }
            Field::Side { primitive, side } => {
                write!(f, "side {} of primitive {}", side, primitive)
            }
            Field::Colour { primitive } => write!(f, "colour of primitive {}", primitive),
        }
    }
}
