//! Wavefront OBJ output

use std::io::{self, Write};

use apoc_geometry::{Group, VertexArray};
use serde::Deserialize;

use crate::materials::MaterialNamer;

/// How polygons with more than three sides are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonSplit {
    /// One face per primitive
    #[default]
    None,
    /// Triangle fans around the first vertex
    Fans,
    /// Triangle strips zig-zagging between both ends of the polygon
    Strips,
}

/// The primitives of one object and how to write them
pub struct PrimitiveBlock<'a> {
    pub vertices: &'a VertexArray,
    pub group: &'a Group,
    /// Vertices written by earlier objects in the same file
    pub vertex_base: usize,
    /// Vertices written for this object
    pub vertex_count: usize,
    pub negative_indices: bool,
    pub split: PolygonSplit,
}

pub fn write_header<W: Write + ?Sized>(w: &mut W, mtllib: &str) -> io::Result<()> {
    writeln!(w, "# Apocalypse graphics")?;
    writeln!(w, "# Converted by apoc-obj {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(w, "mtllib {}", mtllib)
}

/// Start a new object, separated from the previous one by a blank line
pub fn write_object_name<W: Write + ?Sized>(w: &mut W, name: &str) -> io::Result<()> {
    writeln!(w, "\no {}", name)
}

/// Write the used, non-duplicate vertices in order, returning how many
pub fn write_vertices<W: Write + ?Sized>(w: &mut W, vertices: &VertexArray) -> io::Result<usize> {
    let mut count = 0;
    for pos in vertices.emitted() {
        writeln!(w, "v {} {} {}", pos.x, pos.y, pos.z)?;
        count += 1;
    }
    Ok(count)
}

/// Write the faces of an object, switching material whenever it changes
pub fn write_primitives<W: Write + ?Sized>(
    w: &mut W,
    block: &PrimitiveBlock<'_>,
    materials: &mut MaterialNamer,
) -> io::Result<()> {
    let mut current_material: Option<String> = None;

    for primitive in block.group {
        let material = materials.material_for(primitive);
        if current_material.as_deref() != Some(material.as_str()) {
            writeln!(w, "usemtl {}", material)?;
            current_material = Some(material);
        }

        let refs: Vec<String> = primitive
            .sides()
            .iter()
            .map(|&v| vertex_ref(block, block.vertices.output_id(v)))
            .collect();

        if refs.len() <= 3 {
            write_face(w, refs.iter())?;
            continue;
        }
        match block.split {
            PolygonSplit::None => write_face(w, refs.iter())?,
            PolygonSplit::Fans => {
                for [a, b, c] in fan_triangles(refs.len()) {
                    write_face(w, [&refs[a], &refs[b], &refs[c]])?;
                }
            }
            PolygonSplit::Strips => {
                for [a, b, c] in strip_triangles(refs.len()) {
                    write_face(w, [&refs[a], &refs[b], &refs[c]])?;
                }
            }
        }
    }

    Ok(())
}

fn write_face<'a, W, I>(w: &mut W, refs: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a String>,
{
    write!(w, "f")?;
    for r in refs {
        write!(w, " {}", r)?;
    }
    writeln!(w)
}

/// OBJ reference to the vertex with output id `id`
///
/// Negative references count back from the last vertex written, which is
/// the last vertex of this object.
fn vertex_ref(block: &PrimitiveBlock<'_>, id: usize) -> String {
    if block.negative_indices {
        format!("-{}", block.vertex_count - id)
    } else {
        (block.vertex_base + id + 1).to_string()
    }
}

/// Corner indices of a triangle fan covering an `n`-sided polygon
pub fn fan_triangles(n: usize) -> impl Iterator<Item = [usize; 3]> {
    (1..n.saturating_sub(1)).map(|i| [0, i, i + 1])
}

/// Corner indices of a triangle strip covering an `n`-sided polygon
///
/// The strip takes corners alternately from the start and the end of the
/// polygon. Every other triangle is flipped to keep the winding order.
pub fn strip_triangles(n: usize) -> impl Iterator<Item = [usize; 3]> {
    let mut order = Vec::with_capacity(n);
    if n > 0 {
        order.push(0);
    }
    let (mut low, mut high) = (1, n);
    let mut from_start = true;
    while low < high {
        if from_start {
            order.push(low);
            low += 1;
        } else {
            high -= 1;
            order.push(high);
        }
        from_start = !from_start;
    }

    (0..n.saturating_sub(2)).map(move |k| {
        if k % 2 == 0 {
            [order[k], order[k + 1], order[k + 2]]
        } else {
            [order[k + 1], order[k], order[k + 2]]
        }
    })
}
