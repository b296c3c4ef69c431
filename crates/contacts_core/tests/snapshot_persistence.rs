use contacts_core::db::migrations::latest_version;
use contacts_core::db::{open_db, open_db_in_memory, DbError};
use contacts_core::{
    AddressBook, Record, RepoError, SnapshotRepository, SqliteSnapshotRepository, StoreError,
};
use std::fs;

fn sample_records() -> Vec<Record> {
    let mut ann = Record::new("ann", Some("29.02.2000")).unwrap();
    ann.add_phone("1111111111").unwrap();
    ann.add_phone("2222222222").unwrap();
    ann.add_phone("1111111111").unwrap();

    let bob = Record::new("bob", None).unwrap();

    let mut cat = Record::new("cat", None).unwrap();
    cat.add_phone("3333333333").unwrap();

    vec![ann, bob, cat]
}

#[test]
fn save_then_load_reproduces_the_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let mut book = AddressBook::new(Some(path.clone()));
    for record in sample_records() {
        book.add_record(record);
    }
    book.save().unwrap();

    let loaded = AddressBook::open(&path).unwrap();
    assert_eq!(loaded.records(), book.records());
    assert_eq!(loaded.file(), Some(path.as_path()));
}

#[test]
fn save_overwrites_previous_snapshot_completely() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let mut book = AddressBook::new(Some(path.clone()));
    for record in sample_records() {
        book.add_record(record);
    }
    book.save().unwrap();

    book.delete("ann");
    book.delete("cat");
    book.save().unwrap();

    let loaded = book.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name(), "bob");
}

#[test]
fn save_leaves_no_staging_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let mut book = AddressBook::new(Some(path.clone()));
    book.add_record(Record::new("ann", None).unwrap());
    book.save().unwrap();
    book.save().unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("contacts.db")]);
}

#[test]
fn load_of_missing_file_returns_empty_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let book = AddressBook::open(&path).unwrap();
    assert!(book.is_empty());
    assert!(!path.exists(), "load must not create the snapshot");
}

#[test]
fn load_of_corrupt_file_fails_instead_of_returning_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    fs::write(&path, "this is not an address book snapshot\n".repeat(64)).unwrap();

    let err = AddressBook::open(&path).unwrap_err();
    assert!(
        matches!(err, StoreError::Deserialization { .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn load_of_newer_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = AddressBook::open(&path).unwrap_err();
    assert!(err.to_string().contains("newer than supported"), "{err}");
    assert!(matches!(
        err,
        StoreError::Deserialization {
            source: RepoError::Db(DbError::SchemaMismatch { found: 999, .. }),
            ..
        }
    ));
}

#[test]
fn load_refuses_foreign_database_and_leaves_it_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL);
         INSERT INTO notes (body) VALUES ('keep me');",
    )
    .unwrap();
    drop(conn);
    let before = fs::read(&path).unwrap();

    let err = AddressBook::open(&path).unwrap_err();
    match &err {
        StoreError::Deserialization {
            source: RepoError::Db(DbError::ForeignDatabase { table }),
            ..
        } => assert_eq!(table, "notes"),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(fs::read(&path).unwrap(), before, "load must not write");
    let conn = rusqlite::Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    let body: String = conn
        .query_row("SELECT body FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, 0);
    assert_eq!(body, "keep me");
}

#[test]
fn load_of_empty_database_file_returns_empty_book() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    fs::write(&path, b"").unwrap();

    let book = AddressBook::open(&path).unwrap();
    assert!(book.is_empty());
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn load_rejects_invalid_persisted_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    let conn = open_db(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO records (position, name, birthday) VALUES (0, 'ann', NULL);
         INSERT INTO phones (record_position, position, value) VALUES (0, 0, 'not-a-phone');",
    )
    .unwrap();
    drop(conn);

    let err = AddressBook::open(&path).unwrap_err();
    match err {
        StoreError::Deserialization {
            source: RepoError::Validation(_),
            ..
        } => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_round_trip_preserves_order_in_memory() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::new(&conn);

    let records = sample_records();
    repo.replace_all(&records).unwrap();
    assert_eq!(repo.load_all().unwrap(), records);

    repo.replace_all(&records[1..]).unwrap();
    assert_eq!(repo.load_all().unwrap(), records[1..].to_vec());
}

#[test]
fn snapshot_files_carry_the_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");
    let book = AddressBook::new(Some(path.clone()));
    book.save().unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}
