//! Clipping of overlapping coplanar polygons
//!
//! Primitives in a group are drawn in order, so a later primitive lying in
//! the same plane as an earlier one hides part of it. Renderers that don't
//! draw in order z-fight on such pairs. To avoid that, the earlier primitive
//! is cut into the convex pieces that lie outside the later one and the
//! hidden remainder is dropped.

use glam::{DVec2, DVec3};

use crate::{GeometryError, Group, Primitive, VertexArray};

/// Minimum cosine between the normals of two coplanar primitives
const NORMAL_TOLERANCE: f64 = 1e-9;

/// Maximum plane distance (in coordinate units) for two primitives to count as coplanar
const PLANE_TOLERANCE: f64 = 1e-6;

/// Polygons with a smaller projected area are treated as empty
const AREA_TOLERANCE: f64 = 1e-6;

/// Distance from a clip line within which a point counts as on the line
const LINE_TOLERANCE: f64 = 1e-9;

/// Split every primitive that is partly covered by a later coplanar one
///
/// New intersection vertices are appended to `vertices`. Pieces inherit the
/// colour and id of the primitive they were cut from. Returns the number of
/// primitives that were split or removed.
pub fn clip_polygons(vertices: &mut VertexArray, group: &mut Group) -> Result<usize, GeometryError> {
    let mut clipped = 0;
    let mut under = 0;

    while under < group.len() {
        let mut replaced = false;

        for over in under + 1..group.len() {
            let (Some(lower), Some(upper)) = (group.get(under), group.get(over)) else {
                break;
            };
            let Some(pieces) = subtract(vertices, lower, upper)? else {
                continue;
            };

            tracing::debug!(
                "Primitive {} is overlapped by primitive {}: split into {} pieces",
                under,
                over,
                pieces.len()
            );
            group.replace(under, pieces)?;
            clipped += 1;
            replaced = true;
            break;
        }

        // A replaced primitive's pieces are checked again from the same slot
        if !replaced {
            under += 1;
        }
    }

    Ok(clipped)
}

/// A polygon corner in projected 2D space, remembering where it came from
#[derive(Debug, Clone, Copy)]
struct ClipPoint {
    at: DVec2,
    pos: DVec3,
    vertex: Option<usize>,
}

impl ClipPoint {
    fn lerp(&self, other: &ClipPoint, t: f64) -> ClipPoint {
        ClipPoint {
            at: self.at.lerp(other.at, t),
            pos: self.pos.lerp(other.pos, t),
            vertex: None,
        }
    }
}

/// Cut `upper` out of `lower`
///
/// Returns `None` when the two don't overlap (or can't be clipped), or the
/// pieces of `lower` outside `upper` when they do.
fn subtract(
    vertices: &mut VertexArray,
    lower: &Primitive,
    upper: &Primitive,
) -> Result<Option<Vec<Primitive>>, GeometryError> {
    let (Some(normal), Some(upper_normal)) = (lower.normal(vertices), upper.normal(vertices)) else {
        return Ok(None);
    };

    // Back-to-back polygons face different ways and don't hide each other
    if normal.dot(upper_normal) < 1.0 - NORMAL_TOLERANCE {
        return Ok(None);
    }

    let origin = vertices.coords(lower.sides()[0]);
    let distance = (vertices.coords(upper.sides()[0]) - origin).dot(normal);
    if distance.abs() > PLANE_TOLERANCE {
        return Ok(None);
    }

    if lower.skew_side(vertices).is_some() || upper.skew_side(vertices).is_some() {
        return Ok(None);
    }

    let lower_points = project(vertices, lower, normal);
    let upper_points = project(vertices, upper, normal);
    if !is_convex(&lower_points) || !is_convex(&upper_points) {
        return Ok(None);
    }

    let mut outside_pieces = Vec::new();
    let mut remainder = lower_points;

    for i in 0..upper_points.len() {
        let a = upper_points[i].at;
        let b = upper_points[(i + 1) % upper_points.len()].at;
        let (inside, outside) = split(&remainder, a, b);

        if area(&outside) > AREA_TOLERANCE {
            outside_pieces.push(outside);
        }
        if area(&inside) <= AREA_TOLERANCE {
            return Ok(None);
        }
        remainder = inside;
    }

    let mut pieces = Vec::with_capacity(outside_pieces.len());
    for points in outside_pieces {
        let mut piece = Primitive::new();
        piece.set_id(lower.id());
        piece.set_colour(lower.colour());
        for point in points {
            let v = match point.vertex {
                Some(v) => v,
                None => vertices.add(point.pos)?,
            };
            piece.add_side(v)?;
        }
        pieces.push(piece);
    }

    Ok(Some(pieces))
}

/// Project a primitive onto the coordinate plane most parallel to it
///
/// Axes are chosen so that a polygon wound counter-clockwise about `normal`
/// has positive signed area in 2D.
fn project(vertices: &VertexArray, primitive: &Primitive, normal: DVec3) -> Vec<ClipPoint> {
    let abs = normal.abs();
    let to_2d = |p: DVec3| -> DVec2 {
        if abs.z >= abs.x && abs.z >= abs.y {
            if normal.z > 0.0 { DVec2::new(p.x, p.y) } else { DVec2::new(p.y, p.x) }
        } else if abs.x >= abs.y {
            if normal.x > 0.0 { DVec2::new(p.y, p.z) } else { DVec2::new(p.z, p.y) }
        } else if normal.y > 0.0 {
            DVec2::new(p.z, p.x)
        } else {
            DVec2::new(p.x, p.z)
        }
    };

    primitive
        .sides()
        .iter()
        .map(|&v| {
            let pos = vertices.coords(v);
            ClipPoint {
                at: to_2d(pos),
                pos,
                vertex: Some(v),
            }
        })
        .collect()
}

/// Signed area by the shoelace formula
fn area(points: &[ClipPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = (0..points.len())
        .map(|i| points[i].at.perp_dot(points[(i + 1) % points.len()].at))
        .sum();
    twice / 2.0
}

fn is_convex(points: &[ClipPoint]) -> bool {
    let n = points.len();
    if n < 3 || area(points) <= AREA_TOLERANCE {
        return false;
    }
    (0..n).all(|i| {
        let a = points[i].at;
        let b = points[(i + 1) % n].at;
        let c = points[(i + 2) % n].at;
        (b - a).perp_dot(c - b) >= -LINE_TOLERANCE
    })
}

/// Split a convex polygon by the line through `a` and `b`
///
/// Returns the part to the left of the line (inside a counter-clockwise
/// clip polygon) and the part to the right.
fn split(points: &[ClipPoint], a: DVec2, b: DVec2) -> (Vec<ClipPoint>, Vec<ClipPoint>) {
    let edge = b - a;
    let side = |p: DVec2| {
        let s = edge.perp_dot(p - a);
        if s.abs() <= LINE_TOLERANCE { 0.0 } else { s }
    };

    let mut inside = Vec::with_capacity(points.len() + 1);
    let mut outside = Vec::with_capacity(points.len() + 1);

    for i in 0..points.len() {
        let current = &points[i];
        let next = &points[(i + 1) % points.len()];
        let sc = side(current.at);
        let sn = side(next.at);

        if sc >= 0.0 {
            inside.push(*current);
        }
        if sc <= 0.0 {
            outside.push(*current);
        }
        if (sc > 0.0 && sn < 0.0) || (sc < 0.0 && sn > 0.0) {
            let crossing = current.lerp(next, sc / (sc - sn));
            inside.push(crossing);
            outside.push(crossing);
        }
    }

    (inside, outside)
}
