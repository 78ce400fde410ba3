//! Repository + criteria data access over SQLite.
//!
//! Application code talks to a [`Repository`] bound to one [`Model`],
//! queues [`Criterion`] values on it, and lets the repository apply them to
//! its query handle before each read. SQL stays inside this crate.

pub mod criteria;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;

pub use criteria::{CriteriaCollection, Criterion};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::category::Category;
pub use model::{Attributes, Columns, Model, ModelId, ModelRow};
pub use query::{OrderDirection, Query};
pub use repo::{CategoryRepository, RepoError, RepoResult, Repository};

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
