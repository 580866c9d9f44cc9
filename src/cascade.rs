use crate::*;

/// Whole-subtree deletion built on [`Remover`] and [`Nav`].
///
/// Every operation takes any number of ids, skips ids that are already gone
/// and leaves the model consistent: no surviving entity points at a removed
/// one. Positions are never deleted as a side effect; positions that lose
/// their last vertex are returned to the caller as orphans instead.
pub struct Cascader<'a, A> {
    store: &'a mut EntityStore,
    attribs: &'a mut A,
}

impl<'a, A: AttribBinding> Cascader<'a, A> {
    pub fn new(store: &'a mut EntityStore, attribs: &'a mut A) -> Self {
        Self { store, attribs }
    }

    pub fn nav(&self) -> Nav<'_> {
        self.store.nav()
    }

    fn rem(&mut self) -> Remover<'_, A> {
        Remover::new(&mut *self.store, &mut *self.attribs)
    }

    fn exists(&self, kind: EntType, id: usize) -> bool {
        self.store.exists(kind, id)
    }

    fn live(&self, kind: EntType, ids: impl IntoIterator<Item = usize>) -> Vec<usize> {
        dedup_ids(ids)
            .into_iter()
            .filter(|&id| {
                let exists = self.exists(kind, id);
                if !exists {
                    trace!(kind:%, id; "Skipping removed entity");
                }
                exists
            })
            .collect()
    }

    /// Keeps the candidates that exist and have no vertices left.
    fn orphans(&self, candidates: Vec<usize>) -> Vec<usize> {
        let nav = self.nav();
        dedup_ids(candidates)
            .into_iter()
            .filter(|&posi| nav.posi_is_unused(posi))
            .collect()
    }

    #[cfg(feature = "validate")]
    fn check(&self) {
        if let Err(violations) = self.store.validate() {
            panic!("topology corrupted: {violations:#?}");
        }
    }

    #[cfg(not(feature = "validate"))]
    fn check(&self) {}

    /// Deletes the positions that have no vertices. Positions still in use
    /// are left alone. Returns the deleted positions.
    pub fn delete_unused_posis(&mut self, posis: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let posis: Vec<usize> = self
            .live(EntType::Posi, posis)
            .into_iter()
            .filter(|&posi| self.nav().posi_is_unused(posi))
            .collect();
        for &posi in &posis {
            self.rem().rem_posi(posi);
        }
        debug!(count = posis.len(); "Deleted unused positions");
        self.check();
        posis
    }

    /// Deletes positions together with every vertex using them.
    ///
    /// Each vertex is taken out of its object as [`Cascader::delete_verts`]
    /// does. Returns the other positions left without vertices.
    pub fn delete_posis(
        &mut self,
        posis: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        let posis = self.live(EntType::Posi, posis);
        let mut candidates = Vec::new();

        for &posi in &posis {
            if !self.exists(EntType::Posi, posi) {
                continue;
            }
            let verts = self.nav().posi_verts(posi).to_vec();
            candidates.extend(self.delete_verts_inner(verts)?);
            self.rem().rem_posi(posi);
        }

        let orphans = self.orphans(candidates);
        debug!(count = posis.len(), orphans = orphans.len(); "Deleted positions");
        self.check();
        Ok(orphans)
    }

    /// Takes vertices out of their objects.
    ///
    /// A point vertex deletes its point. A wire vertex is spliced out of its
    /// wire, dropping the triangles of the face that used it; when the wire
    /// would become too short (fewer than two vertices open, three closed) the
    /// whole polyline, polygon or hole is deleted instead. Returns the
    /// positions left without vertices, including those of the deleted
    /// vertices.
    pub fn delete_verts(
        &mut self,
        verts: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        let candidates = self.delete_verts_inner(verts)?;
        let orphans = self.orphans(candidates);
        self.check();
        Ok(orphans)
    }

    fn delete_verts_inner(
        &mut self,
        verts: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        let mut candidates = Vec::new();

        for vert in dedup_ids(verts) {
            // an earlier vertex may have taken this one down with its object
            if !self.exists(EntType::Vert, vert) {
                continue;
            }

            let nav = self.nav();
            if let Some(point) = nav.vert_point(vert) {
                candidates.extend(self.delete_points([point]));
            } else if let Some(wire) = nav.vert_wire(vert) {
                candidates.extend(self.delete_wire_vert(wire, vert)?);
            } else {
                // a vertex only used by triangles
                for tri in nav.vert_tris(vert).to_vec() {
                    self.detach_tri(tri);
                }
                candidates.extend(self.rem().rem_vert(vert));
            }
        }

        Ok(candidates)
    }

    fn delete_wire_vert(&mut self, wire: usize, vert: usize) -> Result<Vec<usize>, TopoError> {
        let nav = self.nav();
        let closed = nav.wire_is_closed(wire);
        let min = if closed { 3 } else { 2 };

        if nav.wire_verts(wire).len() <= min {
            return match nav.wire_obj(wire) {
                Some((EntType::Pline, pline)) => Ok(self.delete_plines([pline])),
                _ if nav.wire_is_hole(wire) => self.delete_pgon_holes_inner([wire]),
                Some((EntType::Pgon, pgon)) => Ok(self.delete_pgons([pgon])),
                _ => Ok(self.delete_wire_geom(wire)),
            };
        }

        // fails on a corrupted model where the vertex's edges are not in the wire
        let prev = nav.wire_prev_vert(wire, vert)?;
        let next = nav.wire_next_vert(wire, vert)?;
        trace!(wire, vert, prev:?, next:?; "Splicing vertex out of wire");

        let tris = nav.vert_tris(vert).to_vec();
        let VertEdges { incoming, outgoing } = nav.vert_edges(vert);
        let end = outgoing
            .and_then(|edge| nav.edge_verts(edge))
            .map(|[_, end]| end);

        for tri in tris {
            self.detach_tri(tri);
        }

        match (incoming, outgoing, end) {
            (Some(incoming), Some(outgoing), Some(end)) => {
                self.detach_edge(wire, outgoing);
                self.rem().rem_edge(outgoing);
                if let Some(verts) = self.store.dn_edges_verts.get_mut(incoming) {
                    verts[1] = end;
                }
                self.store.up_verts_edges.get_or_default(end).incoming = Some(incoming);
            }
            (None, Some(edge), _) | (Some(edge), None, _) => {
                self.detach_edge(wire, edge);
                self.rem().rem_edge(edge);
            }
            _ => {}
        }

        Ok(self.rem().rem_vert(vert).into_iter().collect())
    }

    fn detach_edge(&mut self, wire: usize, edge: usize) {
        if let Some(edges) = self.store.dn_wires_edges.get_mut(wire) {
            edges.retain(|&e| e != edge);
        }
        self.store.up_edges_wires.clear_if(edge, wire);
    }

    /// Removes a triangle from its face and the store.
    fn detach_tri(&mut self, tri: usize) {
        if let Some(face) = self.nav().tri_face(tri) {
            if let Some(links) = self.store.dn_faces.get_mut(face) {
                links.tris.retain(|&t| t != tri);
            }
        }
        self.rem().rem_tri(tri);
    }

    fn detach_from_colls(&mut self, kind: EntType, obj: usize) {
        let colls = self.nav().obj_colls(kind, obj).to_vec();
        for coll in colls {
            if let Some(members) = self
                .store
                .dn_colls
                .get_mut(coll)
                .and_then(|c| c.members_mut(kind))
            {
                members.retain(|&x| x != obj);
            }
            if let Some(up) = self.store.up_colls_mut(kind) {
                up.remove_from(obj, coll);
            }
        }
    }

    /// Removes a wire with its edges and vertices. Returns the positions of
    /// the removed vertices.
    fn delete_wire_geom(&mut self, wire: usize) -> Vec<usize> {
        let Some(edges) = self.rem().rem_wire(wire) else {
            return Vec::new();
        };
        let mut verts = Vec::new();
        for edge in edges {
            verts.extend(self.rem().rem_edge(edge).into_iter().flatten());
        }
        dedup_ids(verts)
            .into_iter()
            .filter_map(|vert| self.rem().rem_vert(vert))
            .collect()
    }

    /// Deletes points with their vertices. Returns the positions left without
    /// vertices.
    pub fn delete_points(&mut self, points: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let points = self.live(EntType::Point, points);
        let mut candidates = Vec::new();

        for &point in &points {
            self.detach_from_colls(EntType::Point, point);
            if let Some(vert) = self.rem().rem_point(point) {
                candidates.extend(self.rem().rem_vert(vert));
            }
        }

        debug!(count = points.len(); "Deleted points");
        self.check();
        self.orphans(candidates)
    }

    /// Deletes polylines with their wires, edges and vertices. Returns the
    /// positions left without vertices.
    pub fn delete_plines(&mut self, plines: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let plines = self.live(EntType::Pline, plines);
        let mut candidates = Vec::new();

        for &pline in &plines {
            self.detach_from_colls(EntType::Pline, pline);
            if let Some(wire) = self.rem().rem_pline(pline) {
                candidates.extend(self.delete_wire_geom(wire));
            }
        }

        debug!(count = plines.len(); "Deleted polylines");
        self.check();
        self.orphans(candidates)
    }

    /// Deletes polygons with their face, wires, edges, vertices and
    /// triangles. Returns the positions left without vertices.
    pub fn delete_pgons(&mut self, pgons: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let pgons = self.live(EntType::Pgon, pgons);
        let mut candidates = Vec::new();

        for &pgon in &pgons {
            self.detach_from_colls(EntType::Pgon, pgon);
            let Some(face) = self.rem().rem_pgon(pgon) else {
                continue;
            };
            let Some(FaceLinks { wires, tris }) = self.rem().rem_face(face) else {
                continue;
            };
            for wire in wires {
                candidates.extend(self.delete_wire_geom(wire));
            }
            // the vertices went with the wires
            for tri in tris {
                self.rem().rem_tri(tri);
            }
        }

        debug!(count = pgons.len(); "Deleted polygons");
        self.check();
        self.orphans(candidates)
    }

    /// Deletes hole wires of polygons with their edges and vertices. The
    /// triangles of the face that used a hole vertex are removed too.
    ///
    /// Fails without changing anything if one of the wires exists but is not
    /// a hole. Returns the positions left without vertices.
    pub fn delete_pgon_holes(
        &mut self,
        wires: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        let orphans = self.delete_pgon_holes_inner(wires)?;
        self.check();
        Ok(orphans)
    }

    fn delete_pgon_holes_inner(
        &mut self,
        wires: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        let wires = self.live(EntType::Wire, wires);
        for &wire in &wires {
            or_err(self.nav().wire_is_hole(wire), TopoError::NotAHole { wire })?;
        }

        let mut candidates = Vec::new();
        for &wire in &wires {
            let nav = self.nav();
            let Some(face) = nav.wire_face(wire) else {
                continue;
            };
            let tris: Vec<usize> = nav
                .wire_verts(wire)
                .into_iter()
                .flat_map(|v| nav.vert_tris(v).iter().copied())
                .collect();
            for tri in dedup_ids(tris) {
                self.detach_tri(tri);
            }

            if let Some(links) = self.store.dn_faces.get_mut(face) {
                links.wires.retain(|&w| w != wire);
            }
            self.store.up_wires_faces.clear_if(wire, face);
            candidates.extend(self.delete_wire_geom(wire));
        }

        debug!(count = wires.len(); "Deleted polygon holes");
        Ok(self.orphans(candidates))
    }

    /// Deletes collection records. Members are detached but stay alive, and
    /// nested collections move up to the deleted collection's parent.
    pub fn delete_colls(&mut self, colls: impl IntoIterator<Item = usize>) {
        let colls = self.live(EntType::Coll, colls);

        for &coll in &colls {
            let children = self.nav().coll_children(coll);
            let Some(links) = self.rem().rem_coll(coll) else {
                continue;
            };
            for child in children {
                if let Some(c) = self.store.dn_colls.get_mut(child) {
                    c.parent = links.parent;
                }
            }
        }

        debug!(count = colls.len(); "Deleted collections");
        self.check();
    }
}
