use rusqlite::Connection;
use std::collections::HashSet;
use std::path::PathBuf;
use tempfile::TempDir;
use todo_core::db::open_db_in_memory;
use todo_core::{
    create_todo, delete_todo, get_todo, init_db, list_todos, update_todo, ErrorKind, NewTodo,
    OwnerScope, RepoError, SqliteTodoRepository, TodoListQuery, TodoPatch, TodoRepository,
    TodoValidationError, WriteOutcome,
};

fn temp_store() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");
    init_db(&path).unwrap();
    (dir, path)
}

#[test]
fn create_and_get_roundtrip() {
    let (_dir, path) = temp_store();

    let id = create_todo(&path, "Test Todo", "This is a test todo item").unwrap();
    let todo = get_todo(&path, id).unwrap().unwrap();

    assert_eq!(todo.id, id);
    assert_eq!(todo.title, "Test Todo");
    assert_eq!(todo.description, "This is a test todo item");
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
    assert_eq!(todo.user_id, None);
}

#[test]
fn description_defaults_to_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let id = repo.create_todo(&NewTodo::new("no description")).unwrap();
    let todo = repo.get_todo(OwnerScope::Any, id).unwrap().unwrap();
    assert_eq!(todo.description, "");
}

#[test]
fn missing_id_reads_as_absent() {
    let (_dir, path) = temp_store();

    assert!(get_todo(&path, 99_999).unwrap().is_none());
    assert_eq!(
        update_todo(&path, 99_999, &TodoPatch::new().title("x")).unwrap(),
        WriteOutcome::NotFound
    );
    assert_eq!(delete_todo(&path, 99_999).unwrap(), WriteOutcome::NotFound);
}

#[test]
fn full_then_partial_update_merges_fields() {
    let (_dir, path) = temp_store();
    let id = create_todo(&path, "Original Title", "Original description").unwrap();

    let full = TodoPatch::new()
        .title("Updated Title")
        .description("Updated description")
        .completed(true);
    assert!(update_todo(&path, id, &full).unwrap().applied());

    let todo = get_todo(&path, id).unwrap().unwrap();
    assert_eq!(todo.title, "Updated Title");
    assert_eq!(todo.description, "Updated description");
    assert!(todo.completed);

    let partial = TodoPatch::new().title("Partially Updated");
    assert!(update_todo(&path, id, &partial).unwrap().applied());

    let todo = get_todo(&path, id).unwrap().unwrap();
    assert_eq!(todo.title, "Partially Updated");
    assert_eq!(todo.description, "Updated description");
    assert!(todo.completed);
}

#[test]
fn update_always_advances_updated_at() {
    let (_dir, path) = temp_store();
    let id = create_todo(&path, "A", "B").unwrap();
    let before = get_todo(&path, id).unwrap().unwrap();

    update_todo(&path, id, &TodoPatch::new().title("C")).unwrap();
    let after_title = get_todo(&path, id).unwrap().unwrap();
    assert_eq!(after_title.title, "C");
    assert_eq!(after_title.description, "B");
    assert!(!after_title.completed);
    assert_eq!(after_title.created_at, before.created_at);
    assert!(after_title.updated_at > before.updated_at);

    // No field changes, still a successful update.
    assert!(update_todo(&path, id, &TodoPatch::new()).unwrap().applied());
    let after_empty = get_todo(&path, id).unwrap().unwrap();
    assert_eq!(after_empty.title, "C");
    assert!(after_empty.updated_at > after_title.updated_at);
}

#[test]
fn empty_description_in_patch_clears_it() {
    let (_dir, path) = temp_store();
    let id = create_todo(&path, "keep title", "drop me").unwrap();

    update_todo(&path, id, &TodoPatch::new().description("")).unwrap();

    let todo = get_todo(&path, id).unwrap().unwrap();
    assert_eq!(todo.title, "keep title");
    assert_eq!(todo.description, "");
}

#[test]
fn empty_title_is_rejected_before_storage() {
    let (_dir, path) = temp_store();

    let err = create_todo(&path, "", "no title").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        RepoError::TodoValidation(TodoValidationError::EmptyTitle)
    ));
    assert!(list_todos(&path, None).unwrap().is_empty());

    let id = create_todo(&path, "titled", "").unwrap();
    let err = update_todo(&path, id, &TodoPatch::new().title("  ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(get_todo(&path, id).unwrap().unwrap().title, "titled");

    // Validation wins even when the location is unusable.
    let err = create_todo("/invalid/path/database.db", "", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn delete_is_final() {
    let (_dir, path) = temp_store();
    let id = create_todo(&path, "To Be Deleted", "This will be deleted").unwrap();

    assert!(delete_todo(&path, id).unwrap().applied());
    assert!(get_todo(&path, id).unwrap().is_none());
    assert!(!delete_todo(&path, id).unwrap().applied());
}

#[test]
fn list_returns_all_in_id_order() {
    let (_dir, path) = temp_store();
    assert!(list_todos(&path, None).unwrap().is_empty());

    let ids = [
        create_todo(&path, "Todo 1", "Description 1").unwrap(),
        create_todo(&path, "Todo 2", "Description 2").unwrap(),
        create_todo(&path, "Todo 3", "Description 3").unwrap(),
    ];

    let listed: Vec<_> = list_todos(&path, None)
        .unwrap()
        .into_iter()
        .map(|todo| todo.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn list_filters_by_completion() {
    let (_dir, path) = temp_store();
    let first = create_todo(&path, "Incomplete Todo 1", "Not done").unwrap();
    let second = create_todo(&path, "Incomplete Todo 2", "Also not done").unwrap();
    let done = create_todo(&path, "Complete Todo", "This will be completed").unwrap();
    update_todo(&path, done, &TodoPatch::new().completed(true)).unwrap();

    let completed = list_todos(&path, Some(true)).unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done);

    let open: HashSet<_> = list_todos(&path, Some(false))
        .unwrap()
        .into_iter()
        .map(|todo| todo.id)
        .collect();
    assert_eq!(open, HashSet::from([first, second]));

    assert_eq!(list_todos(&path, None).unwrap().len(), 3);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_table_missing_owner_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            completed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        PRAGMA user_version = {};",
        todo_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todos",
            column: "owner_id"
        })
    ));
}

#[test]
fn corrupt_completed_value_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO todos (title, description, completed, created_at, updated_at)
         VALUES ('bad', '', 7, 1, 1);",
    )
    .unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.list_todos(&TodoListQuery::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn todo_serializes_with_stable_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let id = repo
        .create_todo(&NewTodo::new("serialize me").with_description("body"))
        .unwrap();
    let todo = repo.get_todo(OwnerScope::Any, id).unwrap().unwrap();

    let value = serde_json::to_value(&todo).unwrap();
    let object = value.as_object().unwrap();
    let keys: HashSet<_> = object.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        HashSet::from([
            "id",
            "title",
            "description",
            "completed",
            "created_at",
            "updated_at",
            "user_id",
        ])
    );
    assert_eq!(object["completed"], serde_json::Value::Bool(false));
    assert_eq!(object["user_id"], serde_json::Value::Null);
}
