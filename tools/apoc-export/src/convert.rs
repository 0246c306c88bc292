//! Conversion of a range of archive objects to OBJ text or a listing

use anyhow::{Context, Result, bail};
use std::io::{Read, Seek, Write};

use apoc_format::{
    ObjectIndex, ObjectKind, ObjectReader, decode_object, flip_backfacing, locate_object,
};
use apoc_geometry::{MeshBuffer, clip_polygons};

use crate::config::OutputSection;
use crate::materials::MaterialNamer;
use crate::obj::{self, PolygonSplit, PrimitiveBlock};

const WRITE_FAILED: &str = "Failed writing to output file";

/// Column headings of the object listing
pub const LIST_HEADER: &str = "Index  Name                  Verts  Prims      Offset        Size";

/// Which objects to process
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// First object number (default 0)
    pub first: Option<usize>,
    /// Last object number, clamped to the last object in the archive
    pub last: Option<usize>,
    /// Only process the first object with this name
    pub name: Option<String>,
}

/// How decoded objects are turned into OBJ output
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub mtllib: String,
    pub human_readable: bool,
    pub false_colour: bool,
    pub keep_unused: bool,
    pub keep_duplicates: bool,
    pub negative_indices: bool,
    pub clip: bool,
    pub flip_backfacing: bool,
    pub split: PolygonSplit,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::from(&OutputSection::default())
    }
}

impl From<&OutputSection> for OutputOptions {
    fn from(section: &OutputSection) -> Self {
        Self {
            mtllib: section.mtllib.clone(),
            human_readable: section.human,
            false_colour: section.false_colour,
            keep_unused: section.unused,
            keep_duplicates: section.duplicate,
            negative_indices: section.negative,
            clip: section.clip,
            flip_backfacing: section.flip,
            split: section.split,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub kind: ObjectKind,
    pub selection: Selection,
    /// File offset of the address table, if not the default for `kind`
    pub index_offset: Option<u64>,
    pub output: OutputOptions,
}

impl ConvertOptions {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            selection: Selection::default(),
            index_offset: None,
            output: OutputOptions::default(),
        }
    }
}

/// Where results go
pub enum Mode<'a> {
    /// Write OBJ text
    Convert(&'a mut dyn Write),
    /// Write one line per object describing its record
    List(&'a mut dyn Write),
}

/// One object that was converted or listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub index: usize,
    pub name: String,
    /// Global OBJ index (0-based) of the object's first vertex
    pub first_vertex: usize,
    /// Vertices written, or vertices in the record when listing
    pub vertex_count: usize,
    pub primitive_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub objects: Vec<ObjectSummary>,
    /// Vertices written to the output file
    pub vertex_total: usize,
}

/// State carried from one object to the next within a file
struct ConversionState {
    vertex_total: usize,
    list_header_printed: bool,
    materials: MaterialNamer,
}

impl ConversionState {
    fn new(output: &OutputOptions) -> Self {
        Self {
            vertex_total: 0,
            list_header_printed: false,
            materials: MaterialNamer::new(output.human_readable, output.false_colour),
        }
    }
}

/// Convert or list the selected objects of an archive
///
/// The address table entries for the whole range are read before any object
/// is decoded. Processing stops at the first error.
pub fn convert<R: Read + Seek>(
    input: R,
    mode: Mode<'_>,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    let (out, listing) = match mode {
        Mode::Convert(out) => (out, false),
        Mode::List(out) => (out, true),
    };
    let kind = options.kind;
    let output = &options.output;

    if !listing {
        obj::write_header(&mut *out, &output.mtllib).context(WRITE_FAILED)?;
    }

    let (first, last) = object_range(kind, &options.selection)?;
    let table_offset = options
        .index_offset
        .unwrap_or_else(|| kind.default_index_offset());

    let mut reader = ObjectReader::new(input);
    let index = ObjectIndex::read(&mut reader, table_offset, first, last)?;

    let mut state = ConversionState::new(output);
    let mut buffer = MeshBuffer::new();
    let mut summary = ConversionSummary::default();
    let mut found = false;

    for (object, offset) in index.iter() {
        let name = kind.object_name(object);
        if let Some(wanted) = &options.selection.name {
            if name != *wanted {
                continue;
            }
            found = true;
        }

        locate_object(&mut reader, object, offset)?;

        let entry = if listing {
            list_object(&mut reader, out, kind, object, name, offset, &mut state)?
        } else {
            convert_object(&mut reader, out, options, object, name, &mut buffer, &mut state)?
        };
        summary.objects.push(entry);

        if found {
            break;
        }
    }

    if let Some(wanted) = &options.selection.name {
        if !found {
            tracing::warn!("No object named {} between {} and {}", wanted, first, last);
        }
    }

    summary.vertex_total = state.vertex_total;
    Ok(summary)
}

/// Inclusive object range to process
fn object_range(kind: ObjectKind, selection: &Selection) -> Result<(usize, usize)> {
    let max = kind.max_objects() - 1;
    let first = selection.first.unwrap_or(0);
    let last = selection.last.map_or(max, |last| last.min(max));
    if first > last {
        bail!(
            "First object number ({}) is greater than last object number ({})",
            first,
            last
        );
    }
    Ok((first, last))
}

fn convert_object<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    out: &mut dyn Write,
    options: &ConvertOptions,
    object: usize,
    name: String,
    buffer: &mut MeshBuffer,
    state: &mut ConversionState,
) -> Result<ObjectSummary> {
    let output = &options.output;

    buffer.reset();
    decode_object(reader, options.kind, object, Some(&mut *buffer))?;

    if options.kind == ObjectKind::Flat && output.flip_backfacing {
        let flipped = flip_backfacing(buffer);
        if flipped > 0 {
            tracing::debug!("Flipped {} primitives of {}", flipped, name);
        }
    }

    if output.clip {
        let clipped = clip_polygons(&mut buffer.vertices, &mut buffer.group)
            .with_context(|| format!("Clipping overlapping polygons of {} failed", name))?;
        if clipped > 0 {
            tracing::debug!("Clipped {} primitives of {}", clipped, name);
        }
    }

    mark_vertices(buffer, output.keep_unused);

    if !output.keep_duplicates {
        let duplicates = buffer.vertices.find_duplicates();
        if duplicates > 0 {
            tracing::debug!("{} has {} duplicate vertices", name, duplicates);
        }
    }
    if !(output.keep_unused && output.keep_duplicates) {
        buffer.vertices.renumber();
    }

    obj::write_object_name(&mut *out, &name).context(WRITE_FAILED)?;
    let vertex_count = obj::write_vertices(&mut *out, &buffer.vertices).context(WRITE_FAILED)?;

    let block = PrimitiveBlock {
        vertices: &buffer.vertices,
        group: &buffer.group,
        vertex_base: state.vertex_total,
        vertex_count,
        negative_indices: output.negative_indices,
        split: output.split,
    };
    obj::write_primitives(&mut *out, &block, &mut state.materials).context(WRITE_FAILED)?;

    let entry = ObjectSummary {
        index: object,
        name,
        first_vertex: state.vertex_total,
        vertex_count,
        primitive_count: buffer.group.len(),
    };
    state.vertex_total += vertex_count;
    Ok(entry)
}

/// Mark the vertices to write: all of them, or only those primitives use
fn mark_vertices(buffer: &mut MeshBuffer, keep_unused: bool) {
    if keep_unused {
        buffer.vertices.set_all_used();
        return;
    }

    buffer.group.set_used(&mut buffer.vertices);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let mut unused = 0;
        for v in 0..buffer.vertices.len() {
            if !buffer.vertices.is_used(v) {
                tracing::debug!("Vertex {} {} is unused", v, buffer.vertices.describe(v));
                unused += 1;
            }
        }
        tracing::debug!("{} unused vertices", unused);
    }
}

fn list_object<R: Read + Seek>(
    reader: &mut ObjectReader<R>,
    out: &mut dyn Write,
    kind: ObjectKind,
    object: usize,
    name: String,
    offset: u64,
    state: &mut ConversionState,
) -> Result<ObjectSummary> {
    let decoded = decode_object(reader, kind, object, None)?;
    let end = reader
        .position()
        .context("Failed to get position in input file")?;

    if !state.list_header_printed {
        writeln!(out, "\n{}", LIST_HEADER).context(WRITE_FAILED)?;
        state.list_header_printed = true;
    }
    writeln!(
        out,
        "{:5}  {:<20.20}  {:5}  {:5}  {:10}  {:10}",
        object,
        name,
        decoded.vertex_count,
        decoded.primitive_count,
        offset,
        end - offset
    )
    .context(WRITE_FAILED)?;

    Ok(ObjectSummary {
        index: object,
        name,
        first_vertex: state.vertex_total,
        vertex_count: decoded.vertex_count,
        primitive_count: decoded.primitive_count,
    })
}
