use super::Criterion;
use crate::model::Model;
use crate::query::Query;
use crate::repo::Repository;
use std::fmt::{Debug, Formatter};

/// Ordered criteria queue plus the flag that bypasses it.
pub struct CriteriaCollection<M: Model> {
    items: Vec<Box<dyn Criterion<M>>>,
    ignored: bool,
}

impl<M: Model> CriteriaCollection<M> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ignored: false,
        }
    }

    pub fn push(&mut self, criterion: Box<dyn Criterion<M>>) {
        self.items.push(criterion);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queued criteria in application order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Criterion<M> + 'static)> {
        self.items.iter().map(|criterion| &**criterion)
    }

    /// Drops every queued criterion. The ignore flag is left as is.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    /// Applies the queue to `query` in insertion order.
    ///
    /// Returns `query` untouched while the collection is ignored.
    pub fn fold(&self, query: Query<M>, repository: &Repository<'_, M>) -> Query<M> {
        if self.ignored {
            return query;
        }
        self.items
            .iter()
            .fold(query, |query, criterion| criterion.apply(query, repository))
    }
}

impl<M: Model> Default for CriteriaCollection<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Debug for CriteriaCollection<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaCollection")
            .field("len", &self.items.len())
            .field("ignored", &self.ignored)
            .finish()
    }
}
