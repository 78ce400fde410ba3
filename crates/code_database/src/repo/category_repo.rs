//! Repository bound to the `Category` model.

use super::Repository;
use crate::model::category::Category;

/// `Repository` over the `categories` table.
pub type CategoryRepository<'conn> = Repository<'conn, Category>;
