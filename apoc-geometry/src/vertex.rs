//! Vertex storage with usage marking and renumbering

use glam::DVec3;
use hashbrown::HashMap;

use crate::GeometryError;

#[derive(Debug, Clone, Copy)]
struct Slot {
    pos: DVec3,
    used: bool,
    /// Earlier vertex with identical coordinates, set by `find_duplicates`
    duplicate_of: Option<usize>,
    /// Index in the emitted vertex list
    id: usize,
}

/// Ordered vertex positions for one object
///
/// Vertices start out unused. Callers mark the ones they want to keep, then
/// [`renumber`](VertexArray::renumber) assigns compact output ids so unused
/// and duplicate vertices can be dropped from the output.
#[derive(Debug, Default, Clone)]
pub struct VertexArray {
    slots: Vec<Slot>,
}

impl VertexArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `count` more vertices
    pub fn alloc(&mut self, count: usize) -> Result<(), GeometryError> {
        self.slots
            .try_reserve(count)
            .map_err(|_| GeometryError::VertexAlloc(count))
    }

    /// Append a vertex, returning its index
    pub fn add(&mut self, pos: DVec3) -> Result<usize, GeometryError> {
        self.slots
            .try_reserve(1)
            .map_err(|_| GeometryError::VertexAlloc(1))?;
        let index = self.slots.len();
        self.slots.push(Slot {
            pos,
            used: false,
            duplicate_of: None,
            id: index,
        });
        Ok(index)
    }

    /// Remove all vertices, keeping the allocation
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Position of vertex `v`
    ///
    /// # Panics
    /// Panics if `v` is out of range.
    pub fn coords(&self, v: usize) -> DVec3 {
        self.slots[v].pos
    }

    pub fn set_all_used(&mut self) {
        for slot in &mut self.slots {
            slot.used = true;
        }
    }

    pub fn set_used(&mut self, v: usize) {
        self.slots[v].used = true;
    }

    pub fn is_used(&self, v: usize) -> bool {
        self.slots[v].used
    }

    /// Unmark used vertices whose coordinates repeat an earlier used vertex
    ///
    /// Each duplicate remembers its first occurrence so that primitives
    /// referring to it are written with the surviving vertex's id after
    /// renumbering. Returns the number of duplicates found.
    pub fn find_duplicates(&mut self) -> usize {
        let mut first_seen: HashMap<[u64; 3], usize> = HashMap::with_capacity(self.slots.len());
        let mut count = 0;

        for v in 0..self.slots.len() {
            let slot = self.slots[v];
            if !slot.used {
                continue;
            }
            // Adding zero folds -0.0 into 0.0 so both hash alike
            let key = [
                (slot.pos.x + 0.0).to_bits(),
                (slot.pos.y + 0.0).to_bits(),
                (slot.pos.z + 0.0).to_bits(),
            ];
            match first_seen.get(&key) {
                Some(&original) => {
                    tracing::debug!(
                        "Vertex {} {} duplicates vertex {}",
                        v,
                        self.describe(v),
                        original
                    );
                    let slot = &mut self.slots[v];
                    slot.used = false;
                    slot.duplicate_of = Some(original);
                    count += 1;
                }
                None => {
                    first_seen.insert(key, v);
                }
            }
        }

        count
    }

    /// Assign compact output ids to used vertices, in order
    ///
    /// Duplicates take the id of the vertex they duplicate. Returns the
    /// number of vertices that will be emitted.
    pub fn renumber(&mut self) -> usize {
        let mut next = 0;
        for (v, slot) in self.slots.iter_mut().enumerate() {
            if slot.used {
                if slot.id != next {
                    tracing::trace!("Renumbering vertex {} as {}", v, next);
                }
                slot.id = next;
                next += 1;
            }
        }

        for v in 0..self.slots.len() {
            if let Some(original) = self.slots[v].duplicate_of {
                self.slots[v].id = self.slots[original].id;
            }
        }

        next
    }

    /// Id of vertex `v` in the emitted vertex list
    pub fn output_id(&self, v: usize) -> usize {
        self.slots[v].id
    }

    /// Positions of the vertices that will be emitted, in output order
    pub fn emitted(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.slots.iter().filter(|s| s.used).map(|s| s.pos)
    }

    /// Number of vertices that will be emitted
    pub fn num_used(&self) -> usize {
        self.slots.iter().filter(|s| s.used).count()
    }

    /// Printable form of vertex `v`, e.g. `{1,-2,0}`
    pub fn describe(&self, v: usize) -> String {
        let p = self.slots[v].pos;
        format!("{{{},{},{}}}", p.x, p.y, p.z)
    }
}
