//! Ordered collections of primitives

use crate::{GeometryError, Primitive, VertexArray};

/// Primitives of one object, in drawing order
#[derive(Debug, Default, Clone)]
pub struct Group {
    primitives: Vec<Primitive>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty primitive and return it for filling in
    pub fn add(&mut self) -> Result<&mut Primitive, GeometryError> {
        self.primitives
            .try_reserve(1)
            .map_err(|_| GeometryError::PrimitiveAlloc)?;
        self.primitives.push(Primitive::new());
        let last = self.primitives.len() - 1;
        Ok(&mut self.primitives[last])
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Primitive> {
        self.primitives.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Primitive> {
        self.primitives.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Primitive> {
        self.primitives.iter_mut()
    }

    /// Delete all primitives, keeping the allocation
    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    /// Mark every vertex referenced by a primitive as used
    pub fn set_used(&self, vertices: &mut VertexArray) {
        for primitive in &self.primitives {
            for &v in primitive.sides() {
                vertices.set_used(v);
            }
        }
    }

    /// Replace the primitive at `index` with `pieces` (possibly none)
    pub(crate) fn replace(
        &mut self,
        index: usize,
        pieces: Vec<Primitive>,
    ) -> Result<(), GeometryError> {
        self.primitives
            .try_reserve(pieces.len())
            .map_err(|_| GeometryError::PrimitiveAlloc)?;
        self.primitives.splice(index..=index, pieces);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_set_used_marks_only_referenced() {
        let mut vertices = VertexArray::new();
        for x in 0..4 {
            vertices.add(DVec3::new(x as f64, 0.0, 0.0)).unwrap();
        }

        let mut group = Group::new();
        let primitive = group.add().unwrap();
        primitive.add_side(0).unwrap();
        primitive.add_side(2).unwrap();
        primitive.add_side(3).unwrap();

        group.set_used(&mut vertices);
        assert!(vertices.is_used(0));
        assert!(!vertices.is_used(1));
        assert!(vertices.is_used(2));
        assert!(vertices.is_used(3));
    }

    #[test]
    fn test_replace_splices_in_place() {
        let mut group = Group::new();
        for id in 1..=3 {
            group.add().unwrap().set_id(id);
        }

        let mut a = Primitive::new();
        a.set_id(20);
        let mut b = Primitive::new();
        b.set_id(21);
        group.replace(1, vec![a, b]).unwrap();

        let ids: Vec<usize> = group.iter().map(Primitive::id).collect();
        assert_eq!(ids, vec![1, 20, 21, 3]);

        group.replace(0, Vec::new()).unwrap();
        assert_eq!(group.len(), 3);
    }
}
