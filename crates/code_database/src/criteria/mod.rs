//! Composable query criteria.
//!
//! # Responsibility
//! - Define the single-operation `Criterion` contract.
//! - Keep the ordered criteria queue and its ignore flag (`CriteriaCollection`).
//! - Ship the stock filter, sort and limit criteria.
//!
//! # Invariants
//! - A criterion only transforms the handle it is given; it never touches the
//!   connection or the repository's state.
//! - Queue order is application order. Duplicates are kept and applied again.

mod collection;
mod filters;
mod order;

pub use collection::CriteriaCollection;
pub use filters::{FindByDescription, FindByName, FindByNameAndDescription, WhereEquals};
pub use order::{Limit, OrderBy, OrderDescById, OrderDescByName};

use crate::model::Model;
use crate::query::Query;
use crate::repo::Repository;

/// One unit of query transformation: a filter, a sort or a limit.
///
/// `repository` is the repository applying the criterion, so a criterion may
/// branch on it (for instance on `repository.model()`). The stock criteria
/// ignore it.
pub trait Criterion<M: Model> {
    fn apply(&self, query: Query<M>, repository: &Repository<'_, M>) -> Query<M>;
}

impl<M: Model, C: Criterion<M> + ?Sized> Criterion<M> for Box<C> {
    fn apply(&self, query: Query<M>, repository: &Repository<'_, M>) -> Query<M> {
        (**self).apply(query, repository)
    }
}
