use crate::*;

/// Arena of link slots keyed by stable ids.
///
/// A slot is either occupied, holding the entity's link payload, or vacant.
/// Ids are handed out by [`Slots::push`] in increasing order and a vacated
/// slot is never handed out again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots<T>(Vec<Option<T>>);

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Slots<T> {
    pub fn get(&self, id: usize) -> Option<&T> {
        self.0.get(id)?.as_ref()
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.0.get_mut(id)?.as_mut()
    }

    pub fn is_occupied(&self, id: usize) -> bool {
        self.get(id).is_some()
    }

    /// Vacates the slot, returning what it held.
    pub fn take(&mut self, id: usize) -> Option<T> {
        self.0.get_mut(id)?.take()
    }

    pub fn set(&mut self, id: usize, x: T) {
        if id >= self.0.len() {
            self.0.resize_with(id + 1, || None);
        }
        self.0[id] = Some(x);
    }

    /// Allocates a fresh id at the end of the arena.
    pub fn push(&mut self, x: T) -> usize {
        self.0.push(Some(x));
        self.0.len() - 1
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|x| x.is_some()).count()
    }

    pub fn iter_ids(&self) -> EntityIterator<'_, T> {
        EntityIterator::new(&self.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(id, x)| x.as_ref().map(|x| (id, x)))
    }
}

impl<T: Default> Slots<T> {
    pub fn get_or_default(&mut self, id: usize) -> &mut T {
        if !self.is_occupied(id) {
            self.set(id, T::default());
        }
        self.0[id].get_or_insert_with(T::default)
    }
}

impl Slots<usize> {
    /// Vacates the slot only if it still points at `target`.
    pub fn clear_if(&mut self, id: usize, target: usize) -> bool {
        if self.get(id) == Some(&target) {
            self.take(id);
            true
        } else {
            false
        }
    }
}

impl Slots<Vec<usize>> {
    pub fn list(&self, id: usize) -> &[usize] {
        self.get(id).map_or(&[][..], Vec::as_slice)
    }

    pub fn add_to(&mut self, id: usize, x: usize) {
        let list = self.get_or_default(id);
        if !list.contains(&x) {
            list.push(x);
        }
    }

    pub fn remove_from(&mut self, id: usize, x: usize) {
        if let Some(list) = self.get_mut(id) {
            list.retain(|&y| y != x);
        }
    }
}

/// The two edge slots of a vertex.
///
/// A vertex starts at most one edge and ends at most one edge. Removing an
/// edge empties the matching slot but keeps the other one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertEdges {
    pub incoming: Option<usize>,
    pub outgoing: Option<usize>,
}

impl VertEdges {
    pub fn is_empty(&self) -> bool {
        self.incoming.is_none() && self.outgoing.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.incoming.into_iter().chain(self.outgoing)
    }
}

/// Down-links of a face. `wires[0]` is the boundary, the rest are holes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceLinks {
    pub wires: Vec<usize>,
    pub tris: Vec<usize>,
}

/// Down-links of a collection, plus its parent collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollLinks {
    pub parent: Option<usize>,
    pub points: Vec<usize>,
    pub plines: Vec<usize>,
    pub pgons: Vec<usize>,
}

impl CollLinks {
    /// Members of the given object kind. Non-object kinds have no members.
    pub fn members(&self, kind: EntType) -> &[usize] {
        match kind {
            EntType::Point => &self.points,
            EntType::Pline => &self.plines,
            EntType::Pgon => &self.pgons,
            _ => &[],
        }
    }

    pub fn members_mut(&mut self, kind: EntType) -> Option<&mut Vec<usize>> {
        match kind {
            EntType::Point => Some(&mut self.points),
            EntType::Pline => Some(&mut self.plines),
            EntType::Pgon => Some(&mut self.pgons),
            _ => None,
        }
    }
}

/// The raw topology of a model: parallel slot arenas holding down-links
/// (whole to parts) and up-links (part to wholes).
///
/// An entity exists iff its down-link slot is occupied. Positions have no
/// down-links, so for them the vertex up-link slot is used instead; an empty
/// vertex list is a live, unused position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStore {
    pub(crate) up_posis_verts: Slots<Vec<usize>>,

    pub(crate) dn_verts_posis: Slots<usize>,
    pub(crate) up_verts_points: Slots<usize>,
    pub(crate) up_verts_edges: Slots<VertEdges>,
    pub(crate) up_verts_tris: Slots<Vec<usize>>,

    pub(crate) dn_edges_verts: Slots<[usize; 2]>,
    pub(crate) up_edges_wires: Slots<usize>,

    pub(crate) dn_wires_edges: Slots<Vec<usize>>,
    pub(crate) up_wires_faces: Slots<usize>,
    pub(crate) up_wires_plines: Slots<usize>,

    pub(crate) dn_tris_verts: Slots<[usize; 3]>,
    pub(crate) up_tris_faces: Slots<usize>,

    pub(crate) dn_faces: Slots<FaceLinks>,
    pub(crate) up_faces_pgons: Slots<usize>,

    pub(crate) dn_points_verts: Slots<usize>,
    pub(crate) up_points_colls: Slots<Vec<usize>>,

    pub(crate) dn_plines_wires: Slots<usize>,
    pub(crate) up_plines_colls: Slots<Vec<usize>>,

    pub(crate) dn_pgons_faces: Slots<usize>,
    pub(crate) up_pgons_colls: Slots<Vec<usize>>,

    pub(crate) dn_colls: Slots<CollLinks>,
}

// Runs `$body` with `$slots` bound to the slot arena that defines existence
// for `$kind`.
macro_rules! with_primary {
    ($store:expr, $kind:expr, |$slots:ident| $body:expr) => {
        match $kind {
            EntType::Posi => {
                let $slots = &$store.up_posis_verts;
                $body
            }
            EntType::Vert => {
                let $slots = &$store.dn_verts_posis;
                $body
            }
            EntType::Edge => {
                let $slots = &$store.dn_edges_verts;
                $body
            }
            EntType::Wire => {
                let $slots = &$store.dn_wires_edges;
                $body
            }
            EntType::Tri => {
                let $slots = &$store.dn_tris_verts;
                $body
            }
            EntType::Face => {
                let $slots = &$store.dn_faces;
                $body
            }
            EntType::Point => {
                let $slots = &$store.dn_points_verts;
                $body
            }
            EntType::Pline => {
                let $slots = &$store.dn_plines_wires;
                $body
            }
            EntType::Pgon => {
                let $slots = &$store.dn_pgons_faces;
                $body
            }
            EntType::Coll => {
                let $slots = &$store.dn_colls;
                $body
            }
        }
    };
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, kind: EntType, id: usize) -> bool {
        with_primary!(self, kind, |slots| slots.is_occupied(id))
    }

    /// Number of live entities of a kind.
    pub fn num_ents(&self, kind: EntType) -> usize {
        with_primary!(self, kind, |slots| slots.count())
    }

    /// Ids of the live entities of a kind, in increasing order.
    pub fn ent_ids(&self, kind: EntType) -> Vec<usize> {
        with_primary!(self, kind, |slots| slots.iter_ids().collect())
    }

    pub fn nav(&self) -> Nav<'_> {
        Nav::new(self)
    }

    /// The up-link arena from an object kind to its collections.
    pub(crate) fn up_colls(&self, kind: EntType) -> Option<&Slots<Vec<usize>>> {
        match kind {
            EntType::Point => Some(&self.up_points_colls),
            EntType::Pline => Some(&self.up_plines_colls),
            EntType::Pgon => Some(&self.up_pgons_colls),
            _ => None,
        }
    }

    pub(crate) fn up_colls_mut(&mut self, kind: EntType) -> Option<&mut Slots<Vec<usize>>> {
        match kind {
            EntType::Point => Some(&mut self.up_points_colls),
            EntType::Pline => Some(&mut self.up_plines_colls),
            EntType::Pgon => Some(&mut self.up_pgons_colls),
            _ => None,
        }
    }
}
