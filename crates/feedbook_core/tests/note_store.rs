use feedbook_core::db::{open_db, open_db_in_memory};
use feedbook_core::{
    Note, NoteDraft, NoteRepository, NoteService, NoteServiceError, NoteValidationError,
    NoteView, RepoError, SqliteNoteRepository, ALL_CATEGORIES,
};
use rusqlite::params;
use std::sync::atomic::{AtomicI64, Ordering};

#[test]
fn load_all_on_fresh_storage_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn appended_note_survives_save_and_reload() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let existing = Note::from_draft("a1".into(), &NoteDraft::new("First", "one", ""), 100);
    repo.save_all(&[existing.clone()]).unwrap();

    let added = Note::from_draft("b2".into(), &NoteDraft::new("Second", "two", "work"), 200);
    let mut notes = repo.load_all().unwrap();
    notes.push(added.clone());
    repo.save_all(&notes).unwrap();

    let reloaded = repo.load_all().unwrap();
    assert_eq!(reloaded, vec![existing, added]);
}

#[test]
fn save_all_overwrites_whole_collection() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let a = Note::from_draft("a".into(), &NoteDraft::new("A", "a", ""), 1);
    let b = Note::from_draft("b".into(), &NoteDraft::new("B", "b", ""), 2);

    repo.save_all(&[a, b.clone()]).unwrap();
    repo.save_all(&[b.clone()]).unwrap();

    assert_eq!(repo.load_all().unwrap(), vec![b]);
}

#[test]
fn save_all_rejects_invalid_notes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let mut invalid = Note::from_draft("x".into(), &NoteDraft::new("T", "c", ""), 10);
    invalid.title = "  ".to_string();

    let err = repo.save_all(&[invalid]).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::EmptyTitle)
    ));
    assert!(repo.load_all().unwrap().is_empty());
}

#[test]
fn corrupt_storage_is_an_error_for_repo_and_empty_for_service() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES ('notes', ?1);",
        params!["{not json"],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    assert!(matches!(repo.load_all(), Err(RepoError::InvalidData(_))));

    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    assert!(service.load_notes().is_empty());
    assert!(service.try_load_notes().is_err());
}

#[test]
fn notes_persist_across_file_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
        service
            .create_note(&NoteDraft::new("Persisted", "body", "home"))
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    assert_eq!(service.get_note(&created.id).unwrap(), Some(created));
}

#[test]
fn create_note_with_empty_title_never_reaches_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service
        .create_note(&NoteDraft::new("   ", "content", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyTitle)
    ));

    let stored: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, 0);
}

static FAKE_NOW: AtomicI64 = AtomicI64::new(1_000);

fn fake_clock() -> i64 {
    FAKE_NOW.fetch_add(1_000, Ordering::SeqCst)
}

#[test]
fn update_keeps_identity_and_created_at_but_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let service =
        NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap()).with_clock(fake_clock);

    let created = service
        .create_note(&NoteDraft::new("Draft", "first", ""))
        .unwrap();
    let updated = service
        .update_note(&created.id, &NoteDraft::new(" Final ", "second", "work"))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.title, "Final");
    assert_eq!(service.get_note(&created.id).unwrap(), Some(updated));
}

#[test]
fn update_and_delete_unknown_note_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let update_err = service
        .update_note("missing", &NoteDraft::new("t", "c", ""))
        .unwrap_err();
    assert!(matches!(update_err, NoteServiceError::NoteNotFound(id) if id == "missing"));

    let delete_err = service.delete_note("missing").unwrap_err();
    assert!(matches!(delete_err, NoteServiceError::NoteNotFound(_)));
}

#[test]
fn delete_removes_note_and_its_category() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let keep = service
        .create_note(&NoteDraft::new("Keep", "k", "home"))
        .unwrap();
    let gone = service
        .create_note(&NoteDraft::new("Gone", "g", "work"))
        .unwrap();

    service.delete_note(&gone.id).unwrap();

    assert_eq!(service.load_notes(), vec![keep]);
    assert_eq!(
        service.categories().into_iter().collect::<Vec<_>>(),
        vec!["home".to_string()]
    );
}

#[test]
fn list_notes_applies_view_over_newest_first_collection() {
    let conn = open_db_in_memory().unwrap();
    let service =
        NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap()).with_clock(fake_clock);
    let older = service
        .create_note(&NoteDraft::new("Sprint plan", "tasks", "work"))
        .unwrap();
    let newer = service
        .create_note(&NoteDraft::new("Sprint retro", "notes", "work"))
        .unwrap();
    service
        .create_note(&NoteDraft::new("Groceries", "sprint drink", ""))
        .unwrap();

    let all = service.list_notes(&NoteView::default());
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|pair| pair[0].updated_at >= pair[1].updated_at));

    let work_sprint = service.list_notes(&NoteView {
        search: "sprint".to_string(),
        category: "work".to_string(),
    });
    assert_eq!(work_sprint, vec![newer, older]);

    let everything_sprint = service.list_notes(&NoteView {
        search: "SPRINT".to_string(),
        category: ALL_CATEGORIES.to_string(),
    });
    assert_eq!(everything_sprint.len(), 3);
}
