//! Link consistency checks.
//!
//! Walks every down-link and up-link of an [`EntityStore`] and reports each
//! place where the two halves of a relation disagree.

use crate::*;

/// One broken link found by [`EntityStore::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkViolation {
    #[error("{parent_kind} {parent} lists {child_kind} {child}, which does not link back")]
    MissingUp {
        parent_kind: EntType,
        parent: usize,
        child_kind: EntType,
        child: usize,
    },
    #[error("{child_kind} {child} links up to {parent_kind} {parent}, which does not list it")]
    MissingDown {
        parent_kind: EntType,
        parent: usize,
        child_kind: EntType,
        child: usize,
    },
    #[error("{kind} {id} links to removed {target_kind} {target}")]
    Dangling {
        kind: EntType,
        id: usize,
        target_kind: EntType,
        target: usize,
    },
    #[error("removed {kind} {id} still has links")]
    Stale { kind: EntType, id: usize },
    #[error("wire {wire} breaks after edge {edge}")]
    BrokenChain { wire: usize, edge: usize },
    #[error("wire {wire} belongs to both a face and a polyline")]
    DualOwner { wire: usize },
}

struct Checker<'a> {
    store: &'a EntityStore,
    violations: Vec<LinkViolation>,
}

impl<'a> Checker<'a> {
    fn target(&mut self, kind: EntType, id: usize, target_kind: EntType, target: usize) -> bool {
        let exists = self.store.exists(target_kind, target);
        if !exists {
            self.violations.push(LinkViolation::Dangling {
                kind,
                id,
                target_kind,
                target,
            });
        }
        exists
    }

    /// A down-link `parent -> child` whose up half is checked by `back`.
    fn down(
        &mut self,
        (parent_kind, parent): (EntType, usize),
        (child_kind, child): (EntType, usize),
        back: bool,
    ) {
        if self.target(parent_kind, parent, child_kind, child) && !back {
            self.violations.push(LinkViolation::MissingUp {
                parent_kind,
                parent,
                child_kind,
                child,
            });
        }
    }

    /// An up-link `child -> parent` whose down half is checked by `back`.
    fn up(
        &mut self,
        (child_kind, child): (EntType, usize),
        (parent_kind, parent): (EntType, usize),
        back: bool,
    ) {
        if !self.store.exists(child_kind, child) {
            self.violations.push(LinkViolation::Stale {
                kind: child_kind,
                id: child,
            });
        } else if self.target(child_kind, child, parent_kind, parent) && !back {
            self.violations.push(LinkViolation::MissingDown {
                parent_kind,
                parent,
                child_kind,
                child,
            });
        }
    }

    fn check_down(&mut self) {
        use EntType::*;
        let s = self.store;

        for (vert, &posi) in s.dn_verts_posis.iter() {
            let back = s.up_posis_verts.list(posi).contains(&vert);
            self.down((Vert, vert), (Posi, posi), back);
        }
        for (edge, &[start, end]) in s.dn_edges_verts.iter() {
            let slots = |v| s.up_verts_edges.get(v).copied().unwrap_or_default();
            self.down((Edge, edge), (Vert, start), slots(start).outgoing == Some(edge));
            self.down((Edge, edge), (Vert, end), slots(end).incoming == Some(edge));
        }
        for (wire, edges) in s.dn_wires_edges.iter() {
            for &edge in edges {
                let back = s.up_edges_wires.get(edge) == Some(&wire);
                self.down((Wire, wire), (Edge, edge), back);
            }
            for pair in edges.windows(2) {
                let end = s.dn_edges_verts.get(pair[0]).map(|[_, e]| *e);
                let start = s.dn_edges_verts.get(pair[1]).map(|[s, _]| *s);
                if end != start {
                    self.violations.push(LinkViolation::BrokenChain {
                        wire,
                        edge: pair[0],
                    });
                }
            }
            if s.up_wires_faces.is_occupied(wire) && s.up_wires_plines.is_occupied(wire) {
                self.violations.push(LinkViolation::DualOwner { wire });
            }
        }
        for (tri, verts) in s.dn_tris_verts.iter() {
            for &vert in verts {
                let back = s.up_verts_tris.list(vert).contains(&tri);
                self.down((Tri, tri), (Vert, vert), back);
            }
        }
        for (face, links) in s.dn_faces.iter() {
            for &wire in &links.wires {
                let back = s.up_wires_faces.get(wire) == Some(&face);
                self.down((Face, face), (Wire, wire), back);
            }
            for &tri in &links.tris {
                let back = s.up_tris_faces.get(tri) == Some(&face);
                self.down((Face, face), (Tri, tri), back);
            }
        }
        for (point, &vert) in s.dn_points_verts.iter() {
            let back = s.up_verts_points.get(vert) == Some(&point);
            self.down((Point, point), (Vert, vert), back);
        }
        for (pline, &wire) in s.dn_plines_wires.iter() {
            let back = s.up_wires_plines.get(wire) == Some(&pline);
            self.down((Pline, pline), (Wire, wire), back);
        }
        for (pgon, &face) in s.dn_pgons_faces.iter() {
            let back = s.up_faces_pgons.get(face) == Some(&pgon);
            self.down((Pgon, pgon), (Face, face), back);
        }
        for (coll, links) in s.dn_colls.iter() {
            if let Some(parent) = links.parent {
                self.target(Coll, coll, Coll, parent);
            }
            for kind in [Point, Pline, Pgon] {
                let Some(up) = s.up_colls(kind) else {
                    continue;
                };
                for &obj in links.members(kind) {
                    let back = up.list(obj).contains(&coll);
                    self.down((Coll, coll), (kind, obj), back);
                }
            }
        }
    }

    fn check_up(&mut self) {
        use EntType::*;
        let s = self.store;

        for (posi, verts) in s.up_posis_verts.iter() {
            for &vert in verts {
                let back = s.dn_verts_posis.get(vert) == Some(&posi);
                self.up((Posi, posi), (Vert, vert), back);
            }
        }
        for (vert, slots) in s.up_verts_edges.iter() {
            if let Some(edge) = slots.outgoing {
                let back = s.dn_edges_verts.get(edge).is_some_and(|[st, _]| *st == vert);
                self.up((Vert, vert), (Edge, edge), back);
            }
            if let Some(edge) = slots.incoming {
                let back = s.dn_edges_verts.get(edge).is_some_and(|[_, en]| *en == vert);
                self.up((Vert, vert), (Edge, edge), back);
            }
        }
        for (vert, tris) in s.up_verts_tris.iter() {
            for &tri in tris {
                let back = s.dn_tris_verts.get(tri).is_some_and(|vs| vs.contains(&vert));
                self.up((Vert, vert), (Tri, tri), back);
            }
        }
        for (vert, &point) in s.up_verts_points.iter() {
            let back = s.dn_points_verts.get(point) == Some(&vert);
            self.up((Vert, vert), (Point, point), back);
        }
        for (edge, &wire) in s.up_edges_wires.iter() {
            let back = s.dn_wires_edges.list(wire).contains(&edge);
            self.up((Edge, edge), (Wire, wire), back);
        }
        for (wire, &face) in s.up_wires_faces.iter() {
            let back = s.dn_faces.get(face).is_some_and(|f| f.wires.contains(&wire));
            self.up((Wire, wire), (Face, face), back);
        }
        for (wire, &pline) in s.up_wires_plines.iter() {
            let back = s.dn_plines_wires.get(pline) == Some(&wire);
            self.up((Wire, wire), (Pline, pline), back);
        }
        for (tri, &face) in s.up_tris_faces.iter() {
            let back = s.dn_faces.get(face).is_some_and(|f| f.tris.contains(&tri));
            self.up((Tri, tri), (Face, face), back);
        }
        for (face, &pgon) in s.up_faces_pgons.iter() {
            let back = s.dn_pgons_faces.get(pgon) == Some(&face);
            self.up((Face, face), (Pgon, pgon), back);
        }
        for kind in [Point, Pline, Pgon] {
            let Some(up) = s.up_colls(kind) else {
                continue;
            };
            for (obj, colls) in up.iter() {
                for &coll in colls {
                    let back = s
                        .dn_colls
                        .get(coll)
                        .is_some_and(|c| c.members(kind).contains(&obj));
                    self.up((kind, obj), (Coll, coll), back);
                }
            }
        }
    }
}

impl EntityStore {
    /// Checks that every link has its mirror and names a live entity, and
    /// that every wire is a connected chain of edges.
    pub fn validate(&self) -> Result<(), Vec<LinkViolation>> {
        let mut checker = Checker {
            store: self,
            violations: Vec::new(),
        };
        checker.check_down();
        checker.check_up();

        if checker.violations.is_empty() {
            Ok(())
        } else {
            Err(checker.violations)
        }
    }
}
