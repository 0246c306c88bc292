//! Programmatic archive generation for integration tests.
//!
//! Lays out a zero-filled game image with both address tables at their
//! default offsets, followed by the object records. Every table entry
//! that isn't given a record of its own points at a shared triangle so the
//! full object range always decodes.

#![allow(dead_code)]

use apoc_format::{LOAD_ADDRESS, MAX_FLATS, MAX_MESHES, ObjectKind, PRIMITIVE_STRIDE};
use std::path::Path;

/// Corners of a 100 unit cube
pub const CUBE_POINTS: [[i32; 3]; 8] = [
    [0, 0, 0],
    [100, 0, 0],
    [100, 100, 0],
    [0, 100, 0],
    [0, 0, 100],
    [100, 0, 100],
    [100, 100, 100],
    [0, 100, 100],
];

/// Faces of the cube wound counter-clockwise seen from outside, with colours
pub const CUBE_FACES: [([u8; 4], u8); 6] = [
    ([0, 3, 2, 1], 4),
    ([4, 5, 6, 7], 4),
    ([0, 1, 5, 4], 8),
    ([1, 2, 6, 5], 8),
    ([2, 3, 7, 6], 12),
    ([3, 0, 4, 7], 12),
];

const TRIANGLE: [[i32; 3]; 3] = [[0, 0, 0], [10, 0, 0], [0, 10, 0]];

pub struct ArchiveBuilder {
    records: Vec<u8>,
    meshes: Vec<Option<usize>>,
    flats: Vec<Option<usize>>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            meshes: vec![None; MAX_MESHES],
            flats: vec![None; MAX_FLATS],
        }
    }

    /// Add a mesh record for `index`
    pub fn mesh(mut self, index: usize, points: &[[i32; 3]], primitives: &[(&[u8], u8)]) -> Self {
        self.meshes[index] = Some(self.records.len());
        let record = mesh_record(points, primitives);
        self.records.extend_from_slice(&record);
        self
    }

    /// Add a mesh record for `index` with the cube
    pub fn cube(self, index: usize) -> Self {
        let faces: Vec<(&[u8], u8)> = CUBE_FACES
            .iter()
            .map(|(sides, colour)| (&sides[..], *colour))
            .collect();
        self.mesh(index, &CUBE_POINTS, &faces)
    }

    /// Add a flat record for `index`
    pub fn flat(mut self, index: usize, points: &[[i32; 2]]) -> Self {
        self.flats[index] = Some(self.records.len());
        let record = flat_record(points);
        self.records.extend_from_slice(&record);
        self
    }

    /// Add raw bytes as the record for `index`
    pub fn raw(mut self, kind: ObjectKind, index: usize, bytes: &[u8]) -> Self {
        let start = Some(self.records.len());
        match kind {
            ObjectKind::Flat => self.flats[index] = start,
            ObjectKind::Mesh => self.meshes[index] = start,
        }
        self.records.extend_from_slice(bytes);
        self
    }

    /// File offset of the first record
    pub fn records_start() -> usize {
        ObjectKind::Mesh.default_index_offset() as usize + MAX_MESHES * 4
    }

    pub fn build(mut self) -> Vec<u8> {
        let filler_mesh = self.records.len();
        self.records
            .extend_from_slice(&mesh_record(&TRIANGLE, &[(&[0u8, 1, 2][..], 0)]));
        let filler_flat = self.records.len();
        self.records
            .extend_from_slice(&flat_record(&[[0, 0], [10, 0], [0, 10]]));

        let start = Self::records_start();
        let mut data = vec![0u8; start];
        write_table(
            &mut data,
            ObjectKind::Mesh.default_index_offset() as usize,
            &self.meshes,
            start + filler_mesh,
        );
        write_table(
            &mut data,
            ObjectKind::Flat.default_index_offset() as usize,
            &self.flats,
            start + filler_flat,
        );
        data.extend_from_slice(&self.records);
        data
    }

    pub fn write_to(self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

/// Move the mesh address table to file offset `to`, zeroing the default one
///
/// Records stay where they are, so `to` must lie before the first record.
pub fn move_mesh_table(data: &mut [u8], to: usize) {
    let from = ObjectKind::Mesh.default_index_offset() as usize;
    let len = MAX_MESHES * 4;
    let table = data[from..from + len].to_vec();
    data[from..from + len].fill(0);
    data[to..to + len].copy_from_slice(&table);
}

fn write_table(data: &mut [u8], table: usize, entries: &[Option<usize>], filler: usize) {
    let start = ArchiveBuilder::records_start();
    for (i, entry) in entries.iter().enumerate() {
        let offset = entry.map_or(filler, |record| start + record);
        let address = (LOAD_ADDRESS as usize + offset) as i32;
        data[table + i * 4..table + i * 4 + 4].copy_from_slice(&address.to_le_bytes());
    }
}

pub fn flat_record(points: &[[i32; 2]]) -> Vec<u8> {
    let mut data = (points.len() as i32).to_le_bytes().to_vec();
    for [x, y] in points {
        data.extend_from_slice(&x.to_le_bytes());
        data.extend_from_slice(&y.to_le_bytes());
    }
    data
}

pub fn mesh_record(points: &[[i32; 3]], primitives: &[(&[u8], u8)]) -> Vec<u8> {
    let mut data = (points.len() as i32).to_le_bytes().to_vec();
    for point in points {
        for c in point {
            data.extend_from_slice(&c.to_le_bytes());
        }
    }
    data.extend_from_slice(&(primitives.len() as i32).to_le_bytes());
    for (sides, _) in primitives {
        let mut slot = vec![0u8; PRIMITIVE_STRIDE as usize];
        slot[0] = sides.len() as u8;
        slot[1..=sides.len()].copy_from_slice(sides);
        data.extend_from_slice(&slot);
    }
    for (_, colour) in primitives {
        data.push(*colour);
    }
    data
}

/// Parsed `v` and `f` lines of OBJ text
pub struct ObjText {
    pub objects: Vec<String>,
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<i64>>,
}

pub fn parse_obj(text: &str) -> ObjText {
    let mut obj = ObjText {
        objects: Vec::new(),
        vertices: Vec::new(),
        faces: Vec::new(),
    };
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("o") => obj.objects.push(parts.next().unwrap().to_string()),
            Some("v") => {
                let c: Vec<f64> = parts.map(|p| p.parse().unwrap()).collect();
                obj.vertices.push([c[0], c[1], c[2]]);
            }
            Some("f") => obj.faces.push(parts.map(|p| p.parse().unwrap()).collect()),
            _ => {}
        }
    }
    obj
}
