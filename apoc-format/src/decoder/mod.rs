//! Object record decoder
//!
//! Records are decoded into a caller-owned [`MeshBuffer`]. Passing no buffer
//! decodes in listing mode: every byte is read and every structural check
//! is made, but no geometry is stored.
//!
//! - `flat` - single-polygon objects with 2D vertices
//! - `mesh` - polygon meshes with 3D vertices and fixed-size primitive slots
//! - `tests` - record building helpers and decoder tests

mod flat;
mod mesh;


use std::io::{Read, Seek};

use apoc_geometry::MeshBuffer;

use crate::reader::{ObjectReader, Peek};
use crate::{DecodeError, Field, MAX_VERTICES, ObjectKind};

pub use flat::flip_backfacing;

/// Counts read from an object record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedObject {
    pub vertex_count: usize,
    pub primitive_count: usize,
}

/// Seek to an object record and check that data is present there
pub fn locate_object<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    offset: u64,
) -> Result<(), DecodeError> {
    let bad_offset = DecodeError::BadObjectOffset { object, offset };

    if reader.seek_to(offset).is_err() {
        return Err(bad_offset);
    }
    match reader.peek_byte() {
        Ok(Peek::Byte(_)) => {
            tracing::debug!(
                "Found object {} at file position {} ({:#x})",
                object,
                offset,
                offset
            );
            Ok(())
        }
        Ok(Peek::EndOfStream) | Err(_) => Err(bad_offset),
    }
}

/// Decode the record at the reader's position
///
/// With `Some(buffer)` the vertices and primitives are appended to the
/// buffer, which the caller is expected to have reset. With `None` the
/// record is only validated and skipped.
pub fn decode_object<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    kind: ObjectKind,
    object: usize,
    buffer: Option<&mut MeshBuffer>,
) -> Result<DecodedObject, DecodeError> {
    let count = reader
        .read_i32()
        .map_err(DecodeError::read(object, Field::VertexCount))?;
    let vertex_count = checked_vertex_count(object, count)?;

    match kind {
        ObjectKind::Flat => {
            flat::decode_flat(reader, object, vertex_count, buffer)?;
            Ok(DecodedObject {
                vertex_count,
                primitive_count: 1,
            })
        }
        ObjectKind::Mesh => {
            let primitive_count = mesh::decode_mesh(reader, object, vertex_count, buffer)?;
            Ok(DecodedObject {
                vertex_count,
                primitive_count,
            })
        }
    }
}

fn checked_vertex_count(object: usize, count: i32) -> Result<usize, DecodeError> {
    usize::try_from(count)
        .ok()
        .filter(|n| (1..=MAX_VERTICES).contains(n))
        .ok_or(DecodeError::BadVertexCount { object, count })
}

/// Read one coordinate as stored: a whole number of world units
fn read_coord<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    vertex: usize,
) -> Result<f64, DecodeError> {
    reader
        .read_i32()
        .map(f64::from)
        .map_err(DecodeError::read(object, Field::Vertex(vertex)))
}

fn log_position<R: Read + Seek>(reader: &mut ObjectReader<R>, what: &str, count: usize) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok(pos) = reader.position() {
            tracing::debug!("Found {} {} at file position {} ({:#x})", count, what, pos, pos);
        }
    }
}
