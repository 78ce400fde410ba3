use code_database::db::open_db_in_memory;
use code_database::model::store;
use code_database::{Attributes, Category, CategoryRepository, Columns, Model, Query, RepoError};
use rusqlite::Connection;

#[test]
fn model_reports_bound_type_name() {
    let conn = seeded_db();
    let repo = CategoryRepository::try_new(&conn).unwrap();

    assert_eq!(repo.model(), std::any::type_name::<Category>());
    assert!(repo.model().ends_with("Category"));
}

#[test]
fn constructor_starts_with_pristine_handle() {
    let conn = seeded_db();
    let repo = CategoryRepository::try_new(&conn).unwrap();

    assert!(repo.query().is_pristine());
    assert!(!repo.is_ignoring_criteria());
    assert!(repo.get_criteria_collection().is_empty());
}

#[test]
fn make_model_resets_a_filtered_handle() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    repo.get_by_criteria(code_database::criteria::FindByName::new("Category 1"));
    assert!(!repo.query().is_pristine());

    assert!(repo.make_model().is_pristine());
    assert!(repo.query().is_pristine());
    assert_eq!(repo.all(&Columns::All).unwrap().len(), 3);
}

#[test]
fn all_lists_every_row_and_honours_projection() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let rows = repo.all(&Columns::All).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].description.as_deref(), Some("Description 1"));
    assert!(rows[0].created_at.is_some());

    let rows = repo.all(&Columns::only(["name"])).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].name.as_deref(), Some("Category 1"));
    assert!(rows[0].description.is_none());
}

#[test]
fn create_persists_fillable_attributes() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let created = repo
        .create(
            &Attributes::new()
                .text("name", "Category 4")
                .text("description", "Description 4"),
        )
        .unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.name.as_deref(), Some("Category 4"));
    assert_eq!(created.description.as_deref(), Some("Description 4"));

    let stored = Query::<Category>::new()
        .find(&conn, 4, &Columns::All)
        .unwrap()
        .unwrap();
    assert_eq!(stored, created);
}

#[test]
fn create_ignores_primary_key_and_unknown_attributes() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let created = repo
        .create(
            &Attributes::new()
                .set("id", 100_i64)
                .text("name", "Category 4")
                .text("description", "Description 4")
                .text("owner", "nobody"),
        )
        .unwrap();
    assert_eq!(created.id, 4);
}

#[test]
fn update_overwrites_attributes() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let updated = repo
        .update(
            &Attributes::new()
                .text("name", "Category Atualizada")
                .text("description", "Description Atualizada"),
            1,
        )
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.name.as_deref(), Some("Category Atualizada"));
    assert_eq!(updated.description.as_deref(), Some("Description Atualizada"));

    let stored = repo.find(1, &Columns::All).unwrap();
    assert_eq!(stored.name.as_deref(), Some("Category Atualizada"));
    assert_eq!(stored.description.as_deref(), Some("Description Atualizada"));
}

#[test]
fn update_refreshes_updated_at() {
    let conn = seeded_db();
    conn.execute("UPDATE categories SET updated_at = 0 WHERE id = 1;", []).unwrap();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let updated = repo
        .update(&Attributes::new().text("name", "Category Z"), 1)
        .unwrap();
    assert!(updated.updated_at.unwrap() > 0);

    let untouched = repo.find(2, &Columns::only(["updated_at"])).unwrap();
    assert!(untouched.updated_at.unwrap() > 0);
    assert!(untouched.name.is_none());
}

#[test]
fn update_without_fillable_attributes_returns_current_row() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let unchanged = repo
        .update(&Attributes::new().text("owner", "nobody"), 2)
        .unwrap();
    assert_eq!(unchanged.name.as_deref(), Some("Category 2"));
}

#[test]
fn update_missing_id_returns_not_found() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let err = repo
        .update(&Attributes::new().text("name", "Category Atualizada"), 10)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 10, .. }));
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    assert!(repo.delete(1).unwrap());
    assert_eq!(Query::<Category>::new().count(&conn).unwrap(), 2);
    assert!(repo.find(1, &Columns::All).unwrap_err().is_not_found());
}

#[test]
fn delete_missing_id_returns_not_found() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let err = repo.delete(10).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(Query::<Category>::new().count(&conn).unwrap(), 3);
}

#[test]
fn find_returns_row_by_primary_key() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let category = repo.find(1, &Columns::All).unwrap();
    assert_eq!(category.id(), 1);
    assert!(category.name.is_some());
    assert!(category.description.is_some());
}

#[test]
fn find_missing_id_returns_not_found() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    match repo.find(10, &Columns::All) {
        Err(RepoError::NotFound { model, id }) => {
            assert_eq!(id, 10);
            assert_eq!(model, std::any::type_name::<Category>());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(found) => panic!("expected not found, got {found:?}"),
    }
}

#[test]
fn find_with_columns_leaves_other_attributes_empty() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let category = repo.find(1, &Columns::only(["name"])).unwrap();
    assert_eq!(category.id, 1);
    assert!(category.name.is_some());
    assert!(category.description.is_none());
}

#[test]
fn find_by_matches_field_and_returns_empty_on_miss() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let found = repo
        .find_by("name", "Category 1".to_string(), &Columns::All)
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.as_deref(), Some("Category 1"));

    let missing = repo
        .find_by("name", "Category 10".to_string(), &Columns::All)
        .unwrap();
    assert!(missing.is_empty());

    let projected = repo
        .find_by("name", "Category 1".to_string(), &Columns::only(["name"]))
        .unwrap();
    assert_eq!(projected.len(), 1);
    assert_eq!(projected[0].name.as_deref(), Some("Category 1"));
    assert!(projected[0].description.is_none());
}

#[test]
fn find_by_unknown_field_is_rejected() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let err = repo
        .find_by("title", "Category 1".to_string(), &Columns::All)
        .unwrap_err();
    assert!(matches!(err, RepoError::UnknownColumn { ref column, .. } if column == "title"));
}

#[test]
fn category_serializes_with_plain_field_names() {
    let conn = seeded_db();
    let mut repo = CategoryRepository::try_new(&conn).unwrap();

    let category = repo.find(2, &Columns::only(["name"])).unwrap();
    let json = serde_json::to_value(&category).unwrap();
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Category 2");
    assert!(json["description"].is_null());
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match CategoryRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_model_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.pragma_update(
        None,
        "user_version",
        code_database::db::migrations::latest_version(),
    )
    .unwrap();

    let result = CategoryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "categories",
            column: "description"
        })
    ));
}

fn seeded_db() -> Connection {
    let conn = open_db_in_memory().unwrap();
    for idx in 1..=3 {
        store::insert::<Category>(
            &conn,
            &Attributes::new()
                .text("name", format!("Category {idx}"))
                .text("description", format!("Description {idx}")),
        )
        .unwrap();
    }
    conn
}
