//! Polygon meshes

use std::io::{Read, Seek};

use apoc_geometry::{DVec3, MeshBuffer};

use super::{log_position, read_coord};
use crate::reader::ObjectReader;
use crate::{DecodeError, Field, MAX_SIDES, MIN_SIDES, PRIMITIVE_STRIDE};

/// Decode vertices, primitive topology and primitive colours
///
/// Returns the number of primitives.
pub(super) fn decode_mesh<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    vertex_count: usize,
    mut buffer: Option<&mut MeshBuffer>,
) -> Result<usize, DecodeError> {
    decode_vertices(reader, object, vertex_count, buffer.as_deref_mut())?;

    let count = reader
        .read_i32()
        .map_err(DecodeError::read(object, Field::PrimitiveCount))?;
    let primitive_count = usize::try_from(count)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or(DecodeError::BadPrimitiveCount { object, count })?;

    decode_primitives(reader, object, vertex_count, primitive_count, buffer.as_deref_mut())?;
    decode_colours(reader, object, primitive_count, buffer)?;

    Ok(primitive_count)
}

fn decode_vertices<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    vertex_count: usize,
    buffer: Option<&mut MeshBuffer>,
) -> Result<(), DecodeError> {
    log_position(reader, "vertices", vertex_count);

    let mut vertices = match buffer {
        Some(buffer) => {
            buffer
                .vertices
                .alloc(vertex_count)
                .map_err(DecodeError::geometry(object))?;
            Some(&mut buffer.vertices)
        }
        None => None,
    };

    for v in 0..vertex_count {
        let x = read_coord(reader, object, v)?;
        let y = read_coord(reader, object, v)?;
        let z = read_coord(reader, object, v)?;

        if let Some(vertices) = vertices.as_deref_mut() {
            let index = vertices
                .add(DVec3::new(x, y, z))
                .map_err(DecodeError::geometry(object))?;
            tracing::trace!("Vertex {} {}", index, vertices.describe(index));
        }
    }

    Ok(())
}

/// Read the fixed-size topology slots
///
/// Each slot is `PRIMITIVE_STRIDE` bytes whatever its side count; unused
/// trailing bytes are skipped by seeking to the end of the slot.
fn decode_primitives<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    vertex_count: usize,
    primitive_count: usize,
    mut buffer: Option<&mut MeshBuffer>,
) -> Result<(), DecodeError> {
    log_position(reader, "primitives", primitive_count);

    for p in 0..primitive_count {
        let start = reader.position()?;
        tracing::trace!("Found primitive {} at file position {} ({:#x})", p, start, start);

        let count = reader
            .read_u8()
            .map_err(DecodeError::read(object, Field::SideCount { primitive: p }))?;
        let side_count = usize::from(count);
        if !(MIN_SIDES..=MAX_SIDES).contains(&side_count) {
            return Err(DecodeError::BadSideCount {
                object,
                primitive: p,
                count,
            });
        }

        let mut sides = [0usize; MAX_SIDES];
        for (side, slot) in sides.iter_mut().enumerate().take(side_count) {
            let vertex = reader
                .read_u8()
                .map_err(DecodeError::read(object, Field::Side { primitive: p, side }))?;
            if usize::from(vertex) >= vertex_count {
                return Err(DecodeError::BadVertexIndex {
                    object,
                    primitive: p,
                    side,
                    vertex,
                });
            }
            *slot = usize::from(vertex);
        }

        if let Some(MeshBuffer { vertices, group }) = buffer.as_deref_mut() {
            let id = group.len() + 1;
            let primitive = group.add().map_err(DecodeError::geometry(object))?;
            primitive.set_id(id);
            for &v in &sides[..side_count] {
                primitive
                    .add_side(v)
                    .map_err(DecodeError::geometry(object))?;
            }

            if let Some(side) = primitive.skew_side(vertices) {
                tracing::warn!(
                    "Skew polygon detected (side {} of primitive {} of object {})",
                    side,
                    p,
                    object
                );
            }
            tracing::trace!("{}", primitive.describe(vertices));
        }

        reader.seek_to(start + PRIMITIVE_STRIDE)?;
    }

    Ok(())
}

/// Read one colour byte per primitive, after all the topology slots
fn decode_colours<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    object: usize,
    primitive_count: usize,
    mut buffer: Option<&mut MeshBuffer>,
) -> Result<(), DecodeError> {
    log_position(reader, "colours", primitive_count);

    // Primitives of this record are the last ones in the group
    let first = buffer
        .as_deref()
        .map_or(0, |buffer| buffer.group.len().saturating_sub(primitive_count));

    for p in 0..primitive_count {
        let colour = reader
            .read_u8()
            .map_err(DecodeError::read(object, Field::Colour { primitive: p }))?;

        if let Some(primitive) = buffer
            .as_deref_mut()
            .and_then(|buffer| buffer.group.get_mut(first + p))
        {
            primitive.set_colour(colour);
        }
    }

    Ok(())
}
