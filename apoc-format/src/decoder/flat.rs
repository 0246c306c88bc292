//! Flat objects: one polygon through every vertex, in the Z=0 plane

use std::io::{Read, Seek};

use apoc_geometry::{DVec3, MeshBuffer};

use super::{log_position, read_coord};
use crate::DecodeError;
use crate::reader::ObjectReader;

pub(super) fn decode_flat<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    vertex_count: usize,
    buffer: Option<&mut MeshBuffer>,
) -> Result<(), DecodeError> {
    log_position(reader, "vertices", vertex_count);

    let Some(MeshBuffer { vertices, group }) = buffer else {
        for v in 0..vertex_count {
            read_coord(reader, object, v)?;
            read_coord(reader, object, v)?;
        }
        return Ok(());
    };

    vertices
        .alloc(vertex_count)
        .map_err(DecodeError::geometry(object))?;

    let id = group.len() + 1;
    let primitive = group.add().map_err(DecodeError::geometry(object))?;
    primitive.set_id(id);

    for v in 0..vertex_count {
        let x = read_coord(reader, object, v)?;
        let y = read_coord(reader, object, v)?;

        let index = vertices
            .add(DVec3::new(x, y, 0.0))
            .map_err(DecodeError::geometry(object))?;
        tracing::trace!("Vertex {} {}", index, vertices.describe(index));

        primitive
            .add_side(index)
            .map_err(DecodeError::geometry(object))?;
    }

    tracing::debug!("Flat: {}", primitive.describe(vertices));
    Ok(())
}

/// Turn every primitive in the buffer to face up (+Z)
///
/// Returns the number of primitives whose winding was reversed.
pub fn flip_backfacing(buffer: &mut MeshBuffer) -> usize {
    let MeshBuffer { vertices, group } = buffer;
    let mut flipped = 0;

    for (p, primitive) in group.iter_mut().enumerate() {
        if primitive.set_normal(vertices, DVec3::Z) {
            tracing::debug!("Flipped ground polygon {}", p);
            flipped += 1;
        }
    }

    flipped
}
