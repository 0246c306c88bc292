//! Polygon primitives

use glam::DVec3;
use smallvec::SmallVec;
use std::fmt::Write as _;

use crate::{GeometryError, MAX_PRIMITIVE_SIDES, VertexArray};

/// Distance from the plane, relative to the polygon's extent, beyond which a
/// vertex counts as off-plane
const SKEW_TOLERANCE: f64 = 1e-6;

/// One polygon face: vertex indices in winding order plus a colour
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Primitive {
    id: usize,
    colour: u8,
    sides: SmallVec<[usize; 8]>,
}

impl Primitive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append vertex `v` as the next side, returning the side number
    pub fn add_side(&mut self, v: usize) -> Result<usize, GeometryError> {
        if self.sides.len() >= MAX_PRIMITIVE_SIDES {
            return Err(GeometryError::TooManySides {
                max: MAX_PRIMITIVE_SIDES,
            });
        }
        self.sides.push(v);
        Ok(self.sides.len() - 1)
    }

    pub fn sides(&self) -> &[usize] {
        &self.sides
    }

    pub fn num_sides(&self) -> usize {
        self.sides.len()
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    pub fn colour(&self) -> u8 {
        self.colour
    }

    pub fn set_colour(&mut self, colour: u8) {
        self.colour = colour;
    }

    /// Unit normal by Newell's method, or `None` for a degenerate polygon
    pub fn normal(&self, vertices: &VertexArray) -> Option<DVec3> {
        if self.sides.len() < 3 {
            return None;
        }

        let mut n = DVec3::ZERO;
        for (i, &v) in self.sides.iter().enumerate() {
            let c = vertices.coords(v);
            let next = vertices.coords(self.sides[(i + 1) % self.sides.len()]);
            n.x += (c.y - next.y) * (c.z + next.z);
            n.y += (c.z - next.z) * (c.x + next.x);
            n.z += (c.x - next.x) * (c.y + next.y);
        }
        n.try_normalize()
    }

    /// Orient the primitive to face `normal`
    ///
    /// Reverses the winding order if the current normal points away from
    /// `normal`. Returns true if the winding was changed.
    pub fn set_normal(&mut self, vertices: &VertexArray, normal: DVec3) -> bool {
        match self.normal(vertices) {
            Some(current) if current.dot(normal) < 0.0 => {
                self.sides.reverse();
                true
            }
            _ => false,
        }
    }

    /// First side whose vertex lies off the primitive's plane, if any
    pub fn skew_side(&self, vertices: &VertexArray) -> Option<usize> {
        let normal = self.normal(vertices)?;
        let origin = vertices.coords(self.sides[0]);

        let (min, max) = self.sides.iter().fold(
            (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
            |(min, max), &v| {
                let p = vertices.coords(v);
                (min.min(p), max.max(p))
            },
        );
        let tolerance = SKEW_TOLERANCE * (max - min).length().max(1.0);

        self.sides
            .iter()
            .position(|&v| (vertices.coords(v) - origin).dot(normal).abs() > tolerance)
    }

    /// Multi-line description of the primitive for diagnostics
    pub fn describe(&self, vertices: &VertexArray) -> String {
        let mut out = format!(
            "Primitive {} (colour {}, {} sides)",
            self.id,
            self.colour,
            self.sides.len()
        );
        for (side, &v) in self.sides.iter().enumerate() {
            let _ = write!(out, "\n  {}: vertex {} {}", side, v, vertices.describe(v));
        }
        out
    }
}
