//! Repositories: CRUD over one model, with a queue of criteria applied
//! before every read.
//!
//! # Responsibility
//! - Keep query-builder details out of application code.
//! - Own the criteria queue and the current query handle per repository.
//!
//! # Invariants
//! - Lookups by primary key report misses as `RepoError::NotFound`.
//! - Listing reads never fail because nothing matched.
//! - A repository is only built on a connection whose schema is ready.

pub mod category_repo;
mod error;
mod repository;

pub use category_repo::CategoryRepository;
pub use error::{RepoError, RepoResult};
pub use repository::Repository;
