//! Query handles over one model's table.
//!
//! # Responsibility
//! - Accumulate equality filters, ordering and paging without touching SQL.
//! - Render and execute a single `SELECT` against a borrowed connection.
//!
//! # Invariants
//! - Builder methods consume and return the handle; execution borrows it.
//! - Every referenced column is checked against `Model::COLUMNS` before any
//!   SQL is prepared. Values are always bound, never interpolated.
//! - Rows are ordered by the requested clauses, then by primary key.

mod builder;

pub use builder::{CompiledQuery, OrderClause, Predicate, Query};

use std::fmt::{Display, Formatter};

/// Direction of an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}
