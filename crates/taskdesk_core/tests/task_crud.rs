use rusqlite::Connection;
use taskdesk_core::db::migrations::latest_version;
use taskdesk_core::db::open_db_in_memory;
use taskdesk_core::{
    NewTask, Priority, RepoError, SqliteTaskRepository, TaskRepository, TaskService,
    TaskServiceError, TaskValidationError,
};

fn new_task(title: &str, priority: Priority, scheduled_time: &str) -> NewTask {
    NewTask::new(title, priority, scheduled_time)
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("Buy milk", Priority::High, "2025-03-01 09:00"))
        .unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "Buy milk");
    assert_eq!(loaded.priority, Priority::High);
    assert_eq!(loaded.scheduled_time, "2025-03-01 09:00");
    assert!(!loaded.done);
}

#[test]
fn create_with_missing_input_fails_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let no_title = repo
        .create_task(&new_task("", Priority::Low, "2025-03-01 09:00"))
        .unwrap_err();
    assert!(matches!(
        no_title,
        RepoError::Validation(TaskValidationError::EmptyTitle)
    ));

    let no_time = repo
        .create_task(&new_task("Water plants", Priority::Low, "   "))
        .unwrap_err();
    assert!(matches!(
        no_time,
        RepoError::Validation(TaskValidationError::EmptyScheduledTime)
    ));

    assert!(repo.list_tasks().unwrap().is_empty());
}

#[test]
fn create_assigns_strictly_increasing_ids_with_done_false() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut previous = 0;
    for n in 1..=4 {
        let id = repo
            .create_task(&new_task(
                &format!("task {n}"),
                Priority::Medium,
                "2025-06-01 12:00",
            ))
            .unwrap();
        assert!(id > previous, "id {id} should exceed {previous}");
        previous = id;
        assert!(!repo.get_task(id).unwrap().unwrap().done);
    }
}

#[test]
fn list_returns_remaining_rows_in_ascending_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut ids = Vec::new();
    for n in 1..=5 {
        ids.push(
            repo.create_task(&new_task(
                &format!("task {n}"),
                Priority::Low,
                "2025-06-01 12:00",
            ))
            .unwrap(),
        );
    }
    repo.delete_task(ids[1]).unwrap();
    repo.delete_task(ids[3]).unwrap();

    let listed: Vec<_> = repo.list_tasks().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(listed, vec![ids[0], ids[2], ids[4]]);
}

#[test]
fn mark_done_sets_flag_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("Dentist", Priority::High, "2025-04-10 15:30"))
        .unwrap();

    repo.mark_done(id).unwrap();
    assert!(repo.get_task(id).unwrap().unwrap().done);

    // Second call is a no-op, not an error.
    repo.mark_done(id).unwrap();
    assert!(repo.get_task(id).unwrap().unwrap().done);
}

#[test]
fn mark_done_without_matching_task_fails_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("Dentist", Priority::High, "2025-04-10 15:30"))
        .unwrap();

    let err = repo.mark_done(id + 100).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id + 100));
    assert!(!repo.get_task(id).unwrap().unwrap().done);
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let keep = repo
        .create_task(&new_task("keep", Priority::Low, "2025-06-01 12:00"))
        .unwrap();
    let remove = repo
        .create_task(&new_task("remove", Priority::Low, "2025-06-01 12:00"))
        .unwrap();

    repo.delete_task(remove).unwrap();

    let remaining = repo.list_tasks().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);
    assert!(repo.get_task(remove).unwrap().is_none());
}

#[test]
fn delete_without_matching_task_fails_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("keep", Priority::Low, "2025-06-01 12:00"))
        .unwrap();

    let err = repo.delete_task(id + 7).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(repo.list_tasks().unwrap().len(), 1);
}

#[test]
fn service_surfaces_missing_targets_as_no_selection() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let done_err = service.mark_done(42).unwrap_err();
    assert!(matches!(done_err, TaskServiceError::NoSelection(42)));

    let delete_err = service.delete_task(42).unwrap_err();
    assert!(matches!(delete_err, TaskServiceError::NoSelection(42)));
}

#[test]
fn full_scenario_create_list_done_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let outcome = service
        .create_task(&new_task("Buy milk", Priority::High, "2025-03-01 09:00"))
        .unwrap();
    assert_eq!(outcome.id, 1);
    assert!(outcome.sync_warning.is_none());

    let listed = service.list_tasks().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].title, "Buy milk");
    assert_eq!(listed[0].priority, Priority::High);
    assert_eq!(listed[0].scheduled_time, "2025-03-01 09:00");
    assert!(!listed[0].done);

    service.mark_done(1).unwrap();
    assert!(service.list_tasks().unwrap()[0].done);

    service.delete_task(1).unwrap();
    assert!(service.list_tasks().unwrap().is_empty());
}

#[test]
fn store_accepts_unparseable_scheduled_time() {
    // The store does not cross-validate scheduled_time; only the sync
    // adapter parses it.
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("Vague plan", Priority::Low, "whenever"))
        .unwrap();
    assert_eq!(
        repo.get_task(id).unwrap().unwrap().scheduled_time,
        "whenever"
    );
}

#[test]
fn invalid_persisted_priority_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (title, priority, scheduled_time, done)
         VALUES ('bad row', 'urgent', '2025-06-01 12:00', 0);",
        [],
    )
    .unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo.list_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("urgent")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tasks_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_tasks_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            priority TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "tasks",
            column: "scheduled_time"
        })
    ));
}
