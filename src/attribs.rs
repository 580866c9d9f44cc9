use crate::*;

/// The part of an attribute store the kernel talks to.
///
/// Every removal calls [`AttribBinding::purge`] for the entity it removed, in
/// the same operation, so no attribute row outlives its entity. The call is
/// treated as infallible.
pub trait AttribBinding {
    fn purge(&mut self, kind: EntType, ids: &[usize]);
}

/// No attribute store.
impl AttribBinding for () {
    fn purge(&mut self, _kind: EntType, _ids: &[usize]) {}
}

impl<T: AttribBinding + ?Sized> AttribBinding for &mut T {
    fn purge(&mut self, kind: EntType, ids: &[usize]) {
        (**self).purge(kind, ids)
    }
}

impl<T: AttribBinding + ?Sized> AttribBinding for Box<T> {
    fn purge(&mut self, kind: EntType, ids: &[usize]) {
        (**self).purge(kind, ids)
    }
}

/// A minimal in-memory attribute store: named tables of values per entity
/// kind, keyed by entity id.
#[derive(Debug, Clone)]
pub struct AttribMap<V> {
    tables: HashMap<(EntType, String), HashMap<usize, V>>,
}

impl<V> Default for AttribMap<V> {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }
}

impl<V> AttribMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: EntType, name: &str, id: usize, value: V) -> Option<V> {
        self.tables
            .entry((kind, name.to_owned()))
            .or_default()
            .insert(id, value)
    }

    pub fn get(&self, kind: EntType, name: &str, id: usize) -> Option<&V> {
        self.tables.get(&(kind, name.to_owned()))?.get(&id)
    }

    /// Whether any table of `kind` holds a value for `id`.
    pub fn has_row(&self, kind: EntType, id: usize) -> bool {
        self.tables
            .iter()
            .any(|((k, _), table)| *k == kind && table.contains_key(&id))
    }
}

impl<V> AttribBinding for AttribMap<V> {
    fn purge(&mut self, kind: EntType, ids: &[usize]) {
        for ((_, name), table) in self.tables.iter_mut().filter(|((k, _), _)| *k == kind) {
            let before = table.len();
            for id in ids {
                table.remove(id);
            }
            trace!(kind:%, name:%, removed = before - table.len(); "Purged attribute rows");
        }
    }
}
