use log::{debug, trace};
use paste::paste;
use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Display, Formatter},
};
use thiserror::Error;

mod store;
pub use store::*;

mod entity_iterator;
pub use entity_iterator::*;

mod depth_search_iterator;
pub use depth_search_iterator::*;

mod attribs;
pub use attribs::*;

mod nav;
pub use nav::*;

mod rem;
pub use rem::*;

mod cascade;
pub use cascade::*;

mod make;

mod edit;

mod validate;
pub use validate::*;


macro_rules! ent_types {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        /// The kinds of entity held by an [`EntityStore`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum EntType {
            $($(#[$doc])* $name,)*
        }

        impl EntType {
            pub const ALL: &'static [EntType] = &[$(EntType::$name,)*];

            pub fn type_name(self) -> &'static str {
                match self {
                    $(EntType::$name => stringify!($name),)*
                }
            }
        }
    };
}

ent_types!(
    /// A position in space. Exists independently of any vertex.
    Posi,
    /// The binding of a position into the topology.
    Vert,
    /// A directed segment between two vertices.
    Edge,
    /// An ordered chain of edges, open or closed.
    Wire,
    /// A triangle of a face's tessellation.
    Tri,
    /// A boundary wire, hole wires and triangles.
    Face,
    Point,
    Pline,
    Pgon,
    /// A non-owning, nestable group of objects.
    Coll,
);

impl Display for EntType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopoError {
    #[error("edge {edge} is not part of wire {wire}")]
    EdgeNotInWire { edge: usize, wire: usize },
    #[error("vertex {vert} is not part of wire {wire}")]
    VertNotInWire { vert: usize, wire: usize },
    #[error("wire {wire} is not a hole of a face")]
    NotAHole { wire: usize },
    #[error("wire {wire} is open and cannot be shifted")]
    ShiftOpenWire { wire: usize },
    #[error("{kind} {id} does not exist")]
    Missing { kind: EntType, id: usize },
    #[error("need at least {need} positions, got {got}")]
    TooFewPosis { need: usize, got: usize },
    #[error("triangle index {index} out of range for {len} vertices")]
    TriIndexOutOfRange { index: usize, len: usize },
    #[error("collection {coll} cannot be nested under {parent}")]
    CollCycle { coll: usize, parent: usize },
}

fn or_err<T>(cond: bool, err: T) -> Result<(), T> {
    if cond {
        Ok(())
    } else {
        Err(err)
    }
}

/// Removes duplicates while keeping first occurrences in order.
fn dedup_ids(ids: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|&x| seen.insert(x)).collect()
}

/// A geometry model: the entity store together with the attribute store that
/// has to be kept in step with it.
///
/// Queries go through [`Geom::nav`], low level removal through [`Geom::rem`]
/// and cascading deletion through [`Geom::del`]. The most common cascades are
/// also available directly on `Geom`.
#[derive(Debug, Clone, Default)]
pub struct Geom<A = ()> {
    store: EntityStore,
    attribs: A,
}

impl<A: AttribBinding> Geom<A> {
    pub fn new() -> Self
    where
        A: Default,
    {
        Self::default()
    }

    pub fn with_attribs(attribs: A) -> Self {
        Self {
            store: EntityStore::default(),
            attribs,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn attribs(&self) -> &A {
        &self.attribs
    }

    pub fn attribs_mut(&mut self) -> &mut A {
        &mut self.attribs
    }

    pub fn exists(&self, kind: EntType, id: usize) -> bool {
        self.store.exists(kind, id)
    }

    pub fn nav(&self) -> Nav<'_> {
        self.store.nav()
    }

    pub fn rem(&mut self) -> Remover<'_, A> {
        Remover::new(&mut self.store, &mut self.attribs)
    }

    pub fn del(&mut self) -> Cascader<'_, A> {
        Cascader::new(&mut self.store, &mut self.attribs)
    }

    pub fn delete_unused_posis(&mut self, posis: impl IntoIterator<Item = usize>) -> Vec<usize> {
        self.del().delete_unused_posis(posis)
    }

    pub fn delete_posis(
        &mut self,
        posis: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        self.del().delete_posis(posis)
    }

    pub fn delete_verts(
        &mut self,
        verts: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        self.del().delete_verts(verts)
    }

    pub fn delete_points(&mut self, points: impl IntoIterator<Item = usize>) -> Vec<usize> {
        self.del().delete_points(points)
    }

    pub fn delete_plines(&mut self, plines: impl IntoIterator<Item = usize>) -> Vec<usize> {
        self.del().delete_plines(plines)
    }

    pub fn delete_pgons(&mut self, pgons: impl IntoIterator<Item = usize>) -> Vec<usize> {
        self.del().delete_pgons(pgons)
    }

    pub fn delete_pgon_holes(
        &mut self,
        wires: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<usize>, TopoError> {
        self.del().delete_pgon_holes(wires)
    }

    pub fn delete_colls(&mut self, colls: impl IntoIterator<Item = usize>) {
        self.del().delete_colls(colls)
    }
}
