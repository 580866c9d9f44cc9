use crate::*;

// Objects own a single child and are referenced by collections. Removing one
// clears the child's up-link back to the object.
macro_rules! rem_object {
    ($($(#[$doc:meta])* $obj:ident -> $child:ident;)*) => { paste! {
        $(
            $(#[$doc])*
            pub fn [<rem_ $obj>](&mut self, $obj: usize) -> Option<usize> {
                let $child = self.store.[<dn_ $obj s_ $child s>].take($obj)?;
                self.store.[<up_ $child s_ $obj s>].clear_if($child, $obj);
                self.store.[<up_ $obj s_colls>].take($obj);
                self.purge(EntType::[<$obj:camel>], $obj);
                Some($child)
            }
        )*
    }};
}

/// Single entity removal.
///
/// Each `rem_*` primitive clears the entity's own down-links, removes the
/// entity from the up-links of the children it referenced and purges its
/// attributes. The disconnected children are returned so the caller can carry
/// on. Parents are never touched: detaching the entity from whatever owns it
/// is the caller's job, see [`Cascader`].
///
/// Removing an id that is already gone returns `None` and does nothing.
/// Removing an entity that still has live dependents leaves dangling links
/// and is not checked.
pub struct Remover<'a, A> {
    store: &'a mut EntityStore,
    attribs: &'a mut A,
}

impl<'a, A: AttribBinding> Remover<'a, A> {
    pub fn new(store: &'a mut EntityStore, attribs: &'a mut A) -> Self {
        Self { store, attribs }
    }

    pub fn nav(&self) -> Nav<'_> {
        self.store.nav()
    }

    fn purge(&mut self, kind: EntType, id: usize) {
        trace!(kind:%, id; "Removed entity");
        self.attribs.purge(kind, &[id]);
    }

    /// Returns the vertices that still referenced the position.
    pub fn rem_posi(&mut self, posi: usize) -> Option<Vec<usize>> {
        let verts = self.store.up_posis_verts.take(posi)?;
        self.purge(EntType::Posi, posi);
        Some(verts)
    }

    /// Returns the position of the vertex. Both edge slots of the vertex are
    /// dropped along with its point and triangle up-links.
    pub fn rem_vert(&mut self, vert: usize) -> Option<usize> {
        let posi = self.store.dn_verts_posis.take(vert)?;
        self.store.up_posis_verts.remove_from(posi, vert);
        self.store.up_verts_edges.take(vert);
        self.store.up_verts_tris.take(vert);
        self.store.up_verts_points.take(vert);
        self.purge(EntType::Vert, vert);
        Some(posi)
    }

    /// Returns the `[start, end]` vertices. The matching edge slot of each
    /// vertex is emptied, the other slot is kept.
    pub fn rem_edge(&mut self, edge: usize) -> Option<[usize; 2]> {
        let [start, end] = self.store.dn_edges_verts.take(edge)?;
        if let Some(slots) = self.store.up_verts_edges.get_mut(start) {
            if slots.outgoing == Some(edge) {
                slots.outgoing = None;
            }
        }
        if let Some(slots) = self.store.up_verts_edges.get_mut(end) {
            if slots.incoming == Some(edge) {
                slots.incoming = None;
            }
        }
        self.store.up_edges_wires.take(edge);
        self.purge(EntType::Edge, edge);
        Some([start, end])
    }

    /// Returns the three vertices. Triangles carry no attributes.
    pub fn rem_tri(&mut self, tri: usize) -> Option<[usize; 3]> {
        let verts = self.store.dn_tris_verts.take(tri)?;
        for vert in verts {
            self.store.up_verts_tris.remove_from(vert, tri);
        }
        self.store.up_tris_faces.take(tri);
        trace!(kind:% = EntType::Tri, id = tri; "Removed entity");
        Some(verts)
    }

    /// Returns the edges of the wire, in order.
    pub fn rem_wire(&mut self, wire: usize) -> Option<Vec<usize>> {
        let edges = self.store.dn_wires_edges.take(wire)?;
        for &edge in &edges {
            self.store.up_edges_wires.clear_if(edge, wire);
        }
        self.store.up_wires_faces.take(wire);
        self.store.up_wires_plines.take(wire);
        self.purge(EntType::Wire, wire);
        Some(edges)
    }

    /// Returns the wires (boundary first) and triangles of the face.
    pub fn rem_face(&mut self, face: usize) -> Option<FaceLinks> {
        let links = self.store.dn_faces.take(face)?;
        for &wire in &links.wires {
            self.store.up_wires_faces.clear_if(wire, face);
        }
        for &tri in &links.tris {
            self.store.up_tris_faces.clear_if(tri, face);
        }
        self.store.up_faces_pgons.take(face);
        self.purge(EntType::Face, face);
        Some(links)
    }

    rem_object! {
        /// Returns the vertex of the point.
        point -> vert;
        /// Returns the wire of the polyline.
        pline -> wire;
        /// Returns the face of the polygon.
        pgon -> face;
    }

    /// Returns the parent and members of the collection. The members are
    /// only detached, never removed.
    ///
    /// Only a vacated slot counts as already removed: a `None` parent means a
    /// top-level collection, which is removed like any other.
    pub fn rem_coll(&mut self, coll: usize) -> Option<CollLinks> {
        let links = self.store.dn_colls.take(coll)?;
        for kind in [EntType::Point, EntType::Pline, EntType::Pgon] {
            if let Some(up) = self.store.up_colls_mut(kind) {
                for &obj in links.members(kind) {
                    up.remove_from(obj, coll);
                }
            }
        }
        self.purge(EntType::Coll, coll);
        Some(links)
    }
}
