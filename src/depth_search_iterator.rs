use crate::*;

/// Depth first walk over a collection and the collections nested below it.
///
/// Every collection is yielded once, even if the parent links were to form a
/// cycle.
pub struct DepthSearchIterator<'a> {
    nav: Nav<'a>,
    seen: HashSet<usize>,
    stack: Vec<usize>,
}

impl<'a> DepthSearchIterator<'a> {
    pub(crate) fn new(coll: usize, nav: Nav<'a>) -> Self {
        let stack = if nav.exists(EntType::Coll, coll) {
            Vec::from([coll])
        } else {
            Vec::new()
        };

        Self {
            nav,
            seen: HashSet::from([coll]),
            stack,
        }
    }
}

impl<'a> Iterator for DepthSearchIterator<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let coll = self.stack.pop()?;

        for child in self.nav.coll_children(coll).into_iter().rev() {
            if self.seen.insert(child) {
                self.stack.push(child);
            }
        }

        Some(coll)
    }
}
