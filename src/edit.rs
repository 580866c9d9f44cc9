use crate::*;

impl<A: AttribBinding> Geom<A> {
    /// Rotates the edges of a closed wire so that the edge at `offset` comes
    /// first. Negative offsets rotate the other way.
    ///
    /// Attributes stay with the edges: an edge keeps its values whatever its
    /// new position in the wire.
    pub fn wire_shift(&mut self, wire: usize, offset: isize) -> Result<(), TopoError> {
        self.check_exists(EntType::Wire, wire)?;
        or_err(
            self.nav().wire_is_closed(wire),
            TopoError::ShiftOpenWire { wire },
        )?;

        if let Some(edges) = self.store.dn_wires_edges.get_mut(wire) {
            let len = edges.len() as isize;
            edges.rotate_left(offset.rem_euclid(len) as usize);
        }
        Ok(())
    }

    fn coll_add(
        &mut self,
        kind: EntType,
        coll: usize,
        objs: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.check_exists(EntType::Coll, coll)?;
        let objs = dedup_ids(objs);
        for &obj in &objs {
            self.check_exists(kind, obj)?;
        }

        for obj in objs {
            let Some(members) = self
                .store
                .dn_colls
                .get_mut(coll)
                .and_then(|c| c.members_mut(kind))
            else {
                break;
            };
            if !members.contains(&obj) {
                members.push(obj);
            }
            if let Some(up) = self.store.up_colls_mut(kind) {
                up.add_to(obj, coll);
            }
        }
        Ok(())
    }

    fn coll_remove(
        &mut self,
        kind: EntType,
        coll: usize,
        objs: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.check_exists(EntType::Coll, coll)?;

        for obj in objs {
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
        Ok(())
    }

    pub fn coll_add_points(
        &mut self,
        coll: usize,
        points: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.coll_add(EntType::Point, coll, points)
    }

    pub fn coll_add_plines(
        &mut self,
        coll: usize,
        plines: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.coll_add(EntType::Pline, coll, plines)
    }

    pub fn coll_add_pgons(
        &mut self,
        coll: usize,
        pgons: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.coll_add(EntType::Pgon, coll, pgons)
    }

    pub fn coll_remove_points(
        &mut self,
        coll: usize,
        points: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.coll_remove(EntType::Point, coll, points)
    }

    pub fn coll_remove_plines(
        &mut self,
        coll: usize,
        plines: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.coll_remove(EntType::Pline, coll, plines)
    }

    pub fn coll_remove_pgons(
        &mut self,
        coll: usize,
        pgons: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopoError> {
        self.coll_remove(EntType::Pgon, coll, pgons)
    }

    /// Moves a collection under `parent`, or to the top level with `None`.
    /// A collection cannot be nested under itself or its descendants.
    pub fn coll_set_parent(&mut self, coll: usize, parent: Option<usize>) -> Result<(), TopoError> {
        self.check_exists(EntType::Coll, coll)?;
        if let Some(parent) = parent {
            self.check_exists(EntType::Coll, parent)?;
            or_err(
                !self.nav().coll_descendants(coll).any(|c| c == parent),
                TopoError::CollCycle { coll, parent },
            )?;
        }

        if let Some(links) = self.store.dn_colls.get_mut(coll) {
            links.parent = parent;
        }
        Ok(())
    }
}
