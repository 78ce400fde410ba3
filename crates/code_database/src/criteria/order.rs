//! Ordering and limiting criteria.

use super::Criterion;
use crate::model::Model;
use crate::query::{OrderDirection, Query};
use crate::repo::Repository;

/// `ORDER BY column direction` on any column of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    direction: OrderDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, OrderDirection::Ascending)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, OrderDirection::Descending)
    }
}

impl<M: Model> Criterion<M> for OrderBy {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.order_by(self.column.as_str(), self.direction)
    }
}

/// Newest primary key first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderDescById;

impl<M: Model> Criterion<M> for OrderDescById {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.order_by_desc(M::PRIMARY_KEY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderDescByName;

impl<M: Model> Criterion<M> for OrderDescByName {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.order_by_desc("name")
    }
}

/// Caps the number of returned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub u32);

impl<M: Model> Criterion<M> for Limit {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.limit(self.0)
    }
}
