use crate::*;

// Make operations. They check all their input before allocating anything, so a
// failed call leaves the model untouched. Every new entity gets a fresh id.
impl<A: AttribBinding> Geom<A> {
    pub fn add_posi(&mut self) -> usize {
        self.store.up_posis_verts.push(Vec::new())
    }

    pub fn add_posis(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.add_posi()).collect()
    }

    fn check_posis(&self, posis: &[usize], need: usize) -> Result<(), TopoError> {
        or_err(
            posis.len() >= need,
            TopoError::TooFewPosis {
                need,
                got: posis.len(),
            },
        )?;
        for &posi in posis {
            self.check_exists(EntType::Posi, posi)?;
        }
        Ok(())
    }

    pub(crate) fn check_exists(&self, kind: EntType, id: usize) -> Result<(), TopoError> {
        or_err(self.store.exists(kind, id), TopoError::Missing { kind, id })
    }

    fn add_vert(&mut self, posi: usize) -> usize {
        let vert = self.store.dn_verts_posis.push(posi);
        self.store.up_posis_verts.add_to(posi, vert);
        vert
    }

    fn add_edge(&mut self, start: usize, end: usize) -> usize {
        let edge = self.store.dn_edges_verts.push([start, end]);
        self.store.up_verts_edges.get_or_default(start).outgoing = Some(edge);
        self.store.up_verts_edges.get_or_default(end).incoming = Some(edge);
        edge
    }

    fn add_wire(&mut self, verts: &[usize], closed: bool) -> usize {
        let mut edges: Vec<usize> = verts
            .windows(2)
            .map(|pair| self.add_edge(pair[0], pair[1]))
            .collect();
        if closed {
            if let (Some(&first), Some(&last)) = (verts.first(), verts.last()) {
                edges.push(self.add_edge(last, first));
            }
        }

        let wire = self.store.dn_wires_edges.push(edges.clone());
        for edge in edges {
            self.store.up_edges_wires.set(edge, wire);
        }
        wire
    }

    fn add_tri(&mut self, verts: [usize; 3]) -> usize {
        let tri = self.store.dn_tris_verts.push(verts);
        for vert in verts {
            self.store.up_verts_tris.add_to(vert, tri);
        }
        tri
    }

    pub fn add_point(&mut self, posi: usize) -> Result<usize, TopoError> {
        self.check_exists(EntType::Posi, posi)?;

        let vert = self.add_vert(posi);
        let point = self.store.dn_points_verts.push(vert);
        self.store.up_verts_points.set(vert, point);
        self.store.up_points_colls.set(point, Vec::new());
        Ok(point)
    }

    /// Adds a polyline through `posis`, closing it back to the first
    /// position when `closed` is set.
    pub fn add_pline(&mut self, posis: &[usize], closed: bool) -> Result<usize, TopoError> {
        self.check_posis(posis, if closed { 3 } else { 2 })?;

        let verts: Vec<usize> = posis.iter().map(|&p| self.add_vert(p)).collect();
        let wire = self.add_wire(&verts, closed);
        let pline = self.store.dn_plines_wires.push(wire);
        self.store.up_wires_plines.set(wire, pline);
        self.store.up_plines_colls.set(pline, Vec::new());
        Ok(pline)
    }

    /// Adds a polygon without holes. See [`Geom::add_pgon_with_holes`].
    pub fn add_pgon(&mut self, boundary: &[usize], tris: &[[usize; 3]]) -> Result<usize, TopoError> {
        self.add_pgon_with_holes(boundary, &[], tris)
    }

    /// Adds a polygon with a closed boundary wire and a closed wire per hole.
    ///
    /// `tris` index into the polygon's vertices: the boundary vertices first,
    /// then those of each hole in order. No tessellation is computed here.
    pub fn add_pgon_with_holes(
        &mut self,
        boundary: &[usize],
        holes: &[Vec<usize>],
        tris: &[[usize; 3]],
    ) -> Result<usize, TopoError> {
        self.check_posis(boundary, 3)?;
        for hole in holes {
            self.check_posis(hole, 3)?;
        }
        let len = boundary.len() + holes.iter().map(Vec::len).sum::<usize>();
        for &index in tris.iter().flatten() {
            or_err(index < len, TopoError::TriIndexOutOfRange { index, len })?;
        }

        let mut verts = Vec::with_capacity(len);
        let mut wires = Vec::with_capacity(holes.len() + 1);
        for ring in std::iter::once(boundary).chain(holes.iter().map(Vec::as_slice)) {
            let ring_verts: Vec<usize> = ring.iter().map(|&p| self.add_vert(p)).collect();
            wires.push(self.add_wire(&ring_verts, true));
            verts.extend(ring_verts);
        }
        let tris: Vec<usize> = tris
            .iter()
            .map(|t| self.add_tri(t.map(|i| verts[i])))
            .collect();

        let face = self.store.dn_faces.push(FaceLinks {
            wires: wires.clone(),
            tris: tris.clone(),
        });
        for wire in wires {
            self.store.up_wires_faces.set(wire, face);
        }
        for tri in tris {
            self.store.up_tris_faces.set(tri, face);
        }

        let pgon = self.store.dn_pgons_faces.push(face);
        self.store.up_faces_pgons.set(face, pgon);
        self.store.up_pgons_colls.set(pgon, Vec::new());
        Ok(pgon)
    }

    pub fn add_coll(&mut self, parent: Option<usize>) -> Result<usize, TopoError> {
        if let Some(parent) = parent {
            self.check_exists(EntType::Coll, parent)?;
        }

        Ok(self.store.dn_colls.push(CollLinks {
            parent,
            ..Default::default()
        }))
    }
}
