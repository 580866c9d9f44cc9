use crate::*;

// One-step traversals that read a single slot.
macro_rules! nav_links {
    (@one $(#[$doc:meta])* $from:ident, $to:ident, $field:ident) => { paste! {
        $(#[$doc])*
        pub fn [<$from _ $to>](self, $from: usize) -> Option<usize> {
            self.store.$field.get($from).copied()
        }
    }};
    (@one $(#[$doc:meta])* $from:ident, $to:ident, $field:ident, list) => { paste! {
        $(#[$doc])*
        pub fn [<$from _ $to>](self, $from: usize) -> &'a [usize] {
            self.store.$field.list($from)
        }
    }};
    ($(
        $(#[$doc:meta])*
        $from:ident -> $to:ident: $field:ident $(as $many:tt)?;
    )*) => {
        $(
            nav_links!(@one $(#[$doc])* $from, $to, $field $(, $many)?);
        )*
    };
}

/// Read-only traversal over an [`EntityStore`].
///
/// Missing entities give empty results. The only failures are the wire
/// neighbour queries asked about an edge or vertex that is not in the wire.
#[derive(Clone, Copy)]
pub struct Nav<'a> {
    store: &'a EntityStore,
}

impl<'a> Nav<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    pub fn store(self) -> &'a EntityStore {
        self.store
    }

    pub fn exists(self, kind: EntType, id: usize) -> bool {
        self.store.exists(kind, id)
    }

    nav_links! {
        vert -> posi: dn_verts_posis;
        point -> vert: dn_points_verts;
        pline -> wire: dn_plines_wires;
        pgon -> face: dn_pgons_faces;
        /// The point owning a standalone vertex.
        vert -> point: up_verts_points;
        edge -> wire: up_edges_wires;
        wire -> face: up_wires_faces;
        wire -> pline: up_wires_plines;
        tri -> face: up_tris_faces;
        face -> pgon: up_faces_pgons;

        posi -> verts: up_posis_verts as list;
        wire -> edges: dn_wires_edges as list;
        vert -> tris: up_verts_tris as list;
        point -> colls: up_points_colls as list;
        pline -> colls: up_plines_colls as list;
        pgon -> colls: up_pgons_colls as list;
    }

    pub fn edge_verts(self, edge: usize) -> Option<[usize; 2]> {
        self.store.dn_edges_verts.get(edge).copied()
    }

    pub fn tri_verts(self, tri: usize) -> Option<[usize; 3]> {
        self.store.dn_tris_verts.get(tri).copied()
    }

    pub fn vert_edges(self, vert: usize) -> VertEdges {
        self.store
            .up_verts_edges
            .get(vert)
            .copied()
            .unwrap_or_default()
    }

    pub fn face_wires(self, face: usize) -> &'a [usize] {
        self.store
            .dn_faces
            .get(face)
            .map_or(&[][..], |f| f.wires.as_slice())
    }

    pub fn face_tris(self, face: usize) -> &'a [usize] {
        self.store
            .dn_faces
            .get(face)
            .map_or(&[][..], |f| f.tris.as_slice())
    }

    pub fn face_boundary(self, face: usize) -> Option<usize> {
        self.face_wires(face).first().copied()
    }

    pub fn face_holes(self, face: usize) -> &'a [usize] {
        self.face_wires(face).get(1..).unwrap_or_default()
    }

    pub fn face_has_holes(self, face: usize) -> bool {
        self.face_wires(face).len() > 1
    }

    pub fn coll_members(self, coll: usize, kind: EntType) -> &'a [usize] {
        self.store
            .dn_colls
            .get(coll)
            .map_or(&[][..], |c| c.members(kind))
    }

    pub fn coll_points(self, coll: usize) -> &'a [usize] {
        self.coll_members(coll, EntType::Point)
    }

    pub fn coll_plines(self, coll: usize) -> &'a [usize] {
        self.coll_members(coll, EntType::Pline)
    }

    pub fn coll_pgons(self, coll: usize) -> &'a [usize] {
        self.coll_members(coll, EntType::Pgon)
    }

    pub fn coll_parent(self, coll: usize) -> Option<usize> {
        self.store.dn_colls.get(coll)?.parent
    }

    /// Collections directly nested under `coll`.
    pub fn coll_children(self, coll: usize) -> Vec<usize> {
        self.store
            .dn_colls
            .iter()
            .filter(|(_, c)| c.parent == Some(coll))
            .map(|(id, _)| id)
            .collect()
    }

    /// `coll` and every collection nested below it, depth first.
    pub fn coll_descendants(self, coll: usize) -> DepthSearchIterator<'a> {
        DepthSearchIterator::new(coll, self)
    }

    /// Collections an object belongs to. Non-object kinds belong to none.
    pub fn obj_colls(self, kind: EntType, obj: usize) -> &'a [usize] {
        self.store
            .up_colls(kind)
            .map_or(&[][..], |slots| slots.list(obj))
    }

    /// Existing positions without vertices, optionally restricted to `subset`.
    pub fn unused_posis(self, subset: Option<&[usize]>) -> Vec<usize> {
        match subset {
            Some(posis) => dedup_ids(posis.iter().copied().filter(|&p| self.posi_is_unused(p))),
            None => self
                .store
                .up_posis_verts
                .iter_ids()
                .filter(|&p| self.posi_is_unused(p))
                .collect(),
        }
    }

    pub fn posi_is_unused(self, posi: usize) -> bool {
        self.store
            .up_posis_verts
            .get(posi)
            .is_some_and(Vec::is_empty)
    }

    pub fn wire_is_face(self, wire: usize) -> bool {
        self.store.up_wires_faces.is_occupied(wire)
    }

    pub fn wire_is_pline(self, wire: usize) -> bool {
        self.store.up_wires_plines.is_occupied(wire)
    }

    pub fn wire_is_hole(self, wire: usize) -> bool {
        self.wire_face(wire)
            .and_then(|face| self.face_wires(face).iter().position(|&w| w == wire))
            .is_some_and(|index| index > 0)
    }

    /// A wire is closed when its last edge ends where its first edge starts.
    pub fn wire_is_closed(self, wire: usize) -> bool {
        let edges = self.wire_edges(wire);
        let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
            return false;
        };
        match (self.edge_verts(first), self.edge_verts(last)) {
            (Some([start, _]), Some([_, end])) => start == end,
            _ => false,
        }
    }

    pub fn wire_is_open(self, wire: usize) -> bool {
        !self.wire_is_closed(wire)
    }

    /// The vertex sequence of a wire. A closed wire does not repeat its
    /// first vertex.
    pub fn wire_verts(self, wire: usize) -> Vec<usize> {
        let edges = self.wire_edges(wire);
        let mut verts: Vec<usize> = edges
            .iter()
            .filter_map(|&e| self.edge_verts(e))
            .map(|[start, _]| start)
            .collect();
        if !self.wire_is_closed(wire) {
            if let Some([_, end]) = edges.last().and_then(|&e| self.edge_verts(e)) {
                verts.push(end);
            }
        }
        verts
    }

    pub fn wire_next_edge(self, wire: usize, edge: usize) -> Result<Option<usize>, TopoError> {
        let edges = self.wire_edges(wire);
        let index = edges
            .iter()
            .position(|&e| e == edge)
            .ok_or(TopoError::EdgeNotInWire { edge, wire })?;
        Ok(self.step(edges, index, 1, self.wire_is_closed(wire)))
    }

    pub fn wire_prev_edge(self, wire: usize, edge: usize) -> Result<Option<usize>, TopoError> {
        let edges = self.wire_edges(wire);
        let index = edges
            .iter()
            .position(|&e| e == edge)
            .ok_or(TopoError::EdgeNotInWire { edge, wire })?;
        Ok(self.step(edges, index, -1, self.wire_is_closed(wire)))
    }

    pub fn wire_next_vert(self, wire: usize, vert: usize) -> Result<Option<usize>, TopoError> {
        let verts = self.wire_verts(wire);
        let index = verts
            .iter()
            .position(|&v| v == vert)
            .ok_or(TopoError::VertNotInWire { vert, wire })?;
        Ok(self.step(&verts, index, 1, self.wire_is_closed(wire)))
    }

    pub fn wire_prev_vert(self, wire: usize, vert: usize) -> Result<Option<usize>, TopoError> {
        let verts = self.wire_verts(wire);
        let index = verts
            .iter()
            .position(|&v| v == vert)
            .ok_or(TopoError::VertNotInWire { vert, wire })?;
        Ok(self.step(&verts, index, -1, self.wire_is_closed(wire)))
    }

    fn step(self, seq: &[usize], index: usize, dir: isize, closed: bool) -> Option<usize> {
        let target = index as isize + dir;
        if (0..seq.len() as isize).contains(&target) {
            Some(seq[target as usize])
        } else if closed {
            Some(seq[target.rem_euclid(seq.len() as isize) as usize])
        } else {
            None
        }
    }

    /// The object a wire belongs to: its pline, or the pgon of its face.
    pub fn wire_obj(self, wire: usize) -> Option<(EntType, usize)> {
        if let Some(pline) = self.wire_pline(wire) {
            return Some((EntType::Pline, pline));
        }
        let pgon = self.face_pgon(self.wire_face(wire)?)?;
        Some((EntType::Pgon, pgon))
    }

    /// The wire a vertex belongs to, found through either of its edges.
    pub fn vert_wire(self, vert: usize) -> Option<usize> {
        self.vert_edges(vert)
            .iter()
            .find_map(|edge| self.edge_wire(edge))
    }

    /// The object a vertex belongs to.
    pub fn vert_obj(self, vert: usize) -> Option<(EntType, usize)> {
        if let Some(point) = self.vert_point(vert) {
            return Some((EntType::Point, point));
        }
        if let Some(wire) = self.vert_wire(vert) {
            return self.wire_obj(wire);
        }
        let face = self.vert_tris(vert).iter().find_map(|&t| self.tri_face(t))?;
        Some((EntType::Pgon, self.face_pgon(face)?))
    }

    /// Every vertex below an entity, without duplicates.
    pub fn ent_verts(self, kind: EntType, id: usize) -> Vec<usize> {
        let verts: Vec<usize> = match kind {
            EntType::Posi => self.posi_verts(id).to_vec(),
            EntType::Vert => self.exists(kind, id).then_some(id).into_iter().collect(),
            EntType::Edge => self.edge_verts(id).into_iter().flatten().collect(),
            EntType::Wire => self.wire_verts(id),
            EntType::Tri => self.tri_verts(id).into_iter().flatten().collect(),
            EntType::Face => self
                .face_wires(id)
                .iter()
                .flat_map(|&w| self.wire_verts(w))
                .chain(
                    self.face_tris(id)
                        .iter()
                        .flat_map(|&t| self.tri_verts(t).into_iter().flatten()),
                )
                .collect(),
            EntType::Point => self.point_vert(id).into_iter().collect(),
            EntType::Pline => self
                .pline_wire(id)
                .map(|w| self.wire_verts(w))
                .unwrap_or_default(),
            EntType::Pgon => self
                .pgon_face(id)
                .map(|f| self.ent_verts(EntType::Face, f))
                .unwrap_or_default(),
            EntType::Coll => {
                let mut verts = Vec::new();
                for coll in self.coll_descendants(id) {
                    for kind in [EntType::Point, EntType::Pline, EntType::Pgon] {
                        for &obj in self.coll_members(coll, kind) {
                            verts.extend(self.ent_verts(kind, obj));
                        }
                    }
                }
                verts
            }
        };
        dedup_ids(verts)
    }

    /// Every position below an entity, without duplicates.
    pub fn ent_posis(self, kind: EntType, id: usize) -> Vec<usize> {
        match kind {
            EntType::Posi => self.exists(kind, id).then_some(id).into_iter().collect(),
            _ => dedup_ids(
                self.ent_verts(kind, id)
                    .into_iter()
                    .filter_map(|v| self.vert_posi(v)),
            ),
        }
    }
}
