//! Integration tests for the tablemap-sqlite crate.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use tablemap_core::{
    BindingKind, Entity, FieldSource, MappingError, Row, RowError, TableDescriptor, Value,
    metadata, row,
};
use tablemap_sqlite::{ConnectionConfig, ConnectionFactory, Repository, StoreError};
use tempfile::TempDir;

// =============================================================================
// Mapped types
// =============================================================================

/// Key-only id, one column: the id is never written or read back.
#[derive(Debug, Clone, PartialEq)]
struct User {
    id: Option<i64>,
    name: String,
}

impl FieldSource for User {
    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

impl Entity for User {
    fn descriptor() -> &'static TableDescriptor {
        static DESCRIPTOR: OnceLock<TableDescriptor> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TableDescriptor::new("User")
                .with_table("public", "users")
                .key("id", "id")
                .column("name", "name")
        })
    }

    fn from_row(r: Row) -> Result<Self, RowError> {
        let [name] = r.into_array()?;
        Ok(User {
            id: None,
            name: row::convert("name", name)?,
        })
    }
}

/// Key that is also a column, plus assorted value kinds.
#[derive(Debug, Clone, PartialEq)]
struct Member {
    id: i64,
    name: String,
    score: f64,
    active: bool,
    joined: NaiveDateTime,
    nickname: Option<String>,
}

impl FieldSource for Member {
    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "score" => Some(self.score.into()),
            "active" => Some(self.active.into()),
            "joined" => Some(self.joined.into()),
            "nickname" => Some(self.nickname.clone().into()),
            _ => None,
        }
    }
}

impl Entity for Member {
    fn descriptor() -> &'static TableDescriptor {
        static DESCRIPTOR: OnceLock<TableDescriptor> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TableDescriptor::new("Member")
                .with_table("public", "members")
                .keyed_column("id", "member_id", "member_id")
                .column("name", "name")
                .column("score", "score")
                .column("active", "active")
                .column("joined", "joined_at")
                .column("nickname", "nickname")
        })
    }

    fn from_row(r: Row) -> Result<Self, RowError> {
        Ok(Member {
            id: r.get(0)?,
            name: r.get(1)?,
            score: r.get(2)?,
            active: r.get(3)?,
            joined: r.get(4)?,
            nickname: r.get(5)?,
        })
    }
}

/// Three columns, but only two- and four-value conversions.
#[derive(Debug)]
struct Point {
    x: i64,
    y: i64,
    z: i64,
}

impl FieldSource for Point {
    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "x" => Some(self.x.into()),
            "y" => Some(self.y.into()),
            "z" => Some(self.z.into()),
            _ => None,
        }
    }
}

impl Point {
    fn from_pair(values: [Value; 2]) -> Result<Self, RowError> {
        let [x, y] = values;
        Ok(Point {
            x: row::convert("x", x)?,
            y: row::convert("y", y)?,
            z: 0,
        })
    }

    fn from_quad(values: [Value; 4]) -> Result<Self, RowError> {
        let [x, y, z, _w] = values;
        Ok(Point {
            x: row::convert("x", x)?,
            y: row::convert("y", y)?,
            z: row::convert("z", z)?,
        })
    }
}

impl Entity for Point {
    fn descriptor() -> &'static TableDescriptor {
        static DESCRIPTOR: OnceLock<TableDescriptor> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TableDescriptor::new("Point")
                .with_table("main", "points")
                .keyed_column("x", "x", "x")
                .column("y", "y")
                .column("z", "z")
        })
    }

    fn from_row(r: Row) -> Result<Self, RowError> {
        match r.len() {
            2 => Point::from_pair(r.into_array()?),
            _ => Point::from_quad(r.into_array()?),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Creates a repository over a temp main database with `public` attached.
fn setup() -> (TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let config = ConnectionConfig::new(dir.path().join("main.db"))
        .with_scheme("public", dir.path().join("public.db"));
    let factory = ConnectionFactory::new(config).unwrap();

    factory
        .acquire()
        .unwrap()
        .execute_batch(
            "CREATE TABLE public.users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             CREATE TABLE public.members (
                 member_id INTEGER PRIMARY KEY,
                 nickname TEXT,
                 name TEXT NOT NULL,
                 score REAL,
                 active INTEGER,
                 joined_at TEXT
             );
             CREATE TABLE main.points (x INTEGER, y INTEGER, z INTEGER);",
        )
        .unwrap();

    (dir, Repository::new(factory))
}

fn member(id: i64, name: &str) -> Member {
    Member {
        id,
        name: name.to_string(),
        score: 7.5,
        active: true,
        joined: NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
        nickname: None,
    }
}

fn count(repo: &Repository, table: &str) -> i64 {
    repo.factory()
        .acquire()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

// =============================================================================
// User in public.users: key-only id
// =============================================================================

#[test]
fn test_user_insert_writes_only_column_fields() {
    let (_dir, repo) = setup();

    let alice = User {
        id: Some(1),
        name: "Alice".to_string(),
    };
    assert!(repo.insert(&alice).unwrap());

    let users: Vec<User> = repo.select_all().unwrap();
    assert_eq!(
        users,
        vec![User {
            id: None,
            name: "Alice".to_string()
        }]
    );
}

#[test]
fn test_user_delete_by_id() {
    let (_dir, repo) = setup();
    repo.insert(&User {
        id: None,
        name: "Alice".to_string(),
    })
    .unwrap();

    assert!(repo.delete_by_id::<User>(&1).unwrap());
    assert!(!repo.delete_by_id::<User>(&1).unwrap());
    assert_eq!(count(&repo, "public.users"), 0);
}

#[test]
fn test_user_select_by_id_needs_key_column() {
    let (_dir, repo) = setup();
    let err = repo.select_by_id::<User>(&1).unwrap_err();
    assert!(matches!(
        err,
        StoreError::MappingError(MappingError::KeyWithoutColumn { .. })
    ));
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_insert_then_select_by_id_round_trips_literals() {
    let (_dir, repo) = setup();
    let mut original = member(10, "Grace");
    original.nickname = Some("amazing".to_string());

    assert!(repo.insert(&original).unwrap());
    let loaded: Member = repo.select_by_id(&10).unwrap().unwrap();

    assert_eq!(loaded, original);
    let descriptor = Member::descriptor();
    assert_eq!(
        metadata::literal_values(descriptor, &loaded, BindingKind::Column).unwrap(),
        metadata::literal_values(descriptor, &original, BindingKind::Column).unwrap()
    );
}

#[test]
fn test_select_by_id_absent_is_none() {
    let (_dir, repo) = setup();
    let loaded: Option<Member> = repo.select_by_id(&404).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_select_all_reads_columns_in_descriptor_order() {
    // Table column order differs from field order (nickname comes second).
    let (_dir, repo) = setup();
    repo.insert(&member(1, "Ada")).unwrap();
    repo.insert(&member(2, "Linus")).unwrap();

    let mut members: Vec<Member> = repo.select_all().unwrap();
    members.sort_by_key(|m| m.id);
    assert_eq!(members, vec![member(1, "Ada"), member(2, "Linus")]);
}

#[test]
fn test_select_all_empty_table() {
    let (_dir, repo) = setup();
    let members: Vec<Member> = repo.select_all().unwrap();
    assert!(members.is_empty());
}

// =============================================================================
// Writes
// =============================================================================

#[test]
fn test_update_by_key() {
    let (_dir, repo) = setup();
    repo.insert(&member(1, "Ada")).unwrap();
    repo.insert(&member(2, "Linus")).unwrap();

    let mut changed = member(1, "Ada Lovelace");
    changed.score = 9.0;
    assert!(repo.update(&changed).unwrap());

    let loaded: Member = repo.select_by_id(&1).unwrap().unwrap();
    assert_eq!(loaded, changed);
    let untouched: Member = repo.select_by_id(&2).unwrap().unwrap();
    assert_eq!(untouched, member(2, "Linus"));
}

#[test]
fn test_update_missing_row_reports_false() {
    let (_dir, repo) = setup();
    assert!(!repo.update(&member(99, "Nobody")).unwrap());
}

#[test]
fn test_delete_requires_every_column_to_match() {
    let (_dir, repo) = setup();
    repo.insert(&Point { x: 1, y: 2, z: 3 }).unwrap();

    assert!(!repo.delete(&Point { x: 1, y: 2, z: 4 }).unwrap());
    assert_eq!(count(&repo, "main.points"), 1);

    assert!(repo.delete(&Point { x: 1, y: 2, z: 3 }).unwrap());
    assert_eq!(count(&repo, "main.points"), 0);
}

#[test]
fn test_delete_removes_all_identical_rows() {
    let (_dir, repo) = setup();
    for _ in 0..3 {
        repo.insert(&Point { x: 5, y: 5, z: 5 }).unwrap();
    }
    assert!(repo.delete(&Point { x: 5, y: 5, z: 5 }).unwrap());
    assert_eq!(count(&repo, "main.points"), 0);
}

#[test]
fn test_delete_matches_null_fields() {
    let (_dir, repo) = setup();
    let ada = member(1, "Ada");
    assert_eq!(ada.nickname, None);
    repo.insert(&ada).unwrap();

    assert!(repo.delete(&ada).unwrap());
    assert_eq!(count(&repo, "public.members"), 0);
}

#[test]
fn test_update_clears_field_to_null() {
    let (_dir, repo) = setup();
    let mut ada = member(1, "Ada");
    ada.nickname = Some("countess".to_string());
    repo.insert(&ada).unwrap();

    ada.nickname = None;
    assert!(repo.update(&ada).unwrap());
    let loaded: Member = repo.select_by_id(&1).unwrap().unwrap();
    assert_eq!(loaded.nickname, None);
}

#[test]
fn test_delete_by_id_with_duplicate_keys_reports_false() {
    let (_dir, repo) = setup();
    repo.insert(&Point { x: 1, y: 1, z: 1 }).unwrap();
    repo.insert(&Point { x: 1, y: 2, z: 2 }).unwrap();

    // Both rows are deleted, but success means exactly one.
    assert!(!repo.delete_by_id::<Point>(&1).unwrap());
    assert_eq!(count(&repo, "main.points"), 0);
}

#[test]
fn test_unescaped_quote_surfaces_as_database_error() {
    let (_dir, repo) = setup();
    let err = repo
        .insert(&User {
            id: None,
            name: "O'Brien".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::DatabaseError(_)));
}

#[test]
fn test_constraint_violation_is_database_error() {
    let (_dir, repo) = setup();
    repo.insert(&member(1, "Ada")).unwrap();
    let err = repo.insert(&member(1, "Ada again")).unwrap_err();
    assert!(matches!(err, StoreError::DatabaseError(_)));
}

#[test]
fn test_missing_table_is_database_error() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ConnectionFactory::new(
        ConnectionConfig::new(dir.path().join("main.db"))
            .with_scheme("public", dir.path().join("public.db")),
    )
    .unwrap();
    let repo = Repository::new(factory);

    let err = repo.select_all::<User>().unwrap_err();
    assert!(matches!(err, StoreError::DatabaseError(_)));
}

#[test]
fn test_unopenable_database_is_database_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConnectionConfig::new(dir.path().join("missing").join("main.db"));
    let repo = Repository::new(ConnectionFactory::new(config).unwrap());
    assert_eq!(
        repo.factory().config().database,
        dir.path().join("missing").join("main.db")
    );

    let err = repo.insert(&Point { x: 1, y: 1, z: 1 }).unwrap_err();
    assert!(matches!(err, StoreError::DatabaseError(_)));
    let err = repo.select_all::<Point>().unwrap_err();
    assert!(matches!(err, StoreError::DatabaseError(_)));
}

// =============================================================================
// Materialization
// =============================================================================

#[test]
fn test_arity_mismatch_fails_materialization() {
    let (_dir, repo) = setup();
    repo.insert(&Point { x: 1, y: 2, z: 3 }).unwrap();

    let err = repo.select_all::<Point>().unwrap_err();
    assert!(matches!(
        err,
        StoreError::RowError(RowError::ArityMismatch {
            expected: 4,
            found: 3
        })
    ));

    let err = repo.select_by_id::<Point>(&1).unwrap_err();
    assert!(matches!(err, StoreError::RowError(_)));
}

#[test]
fn test_type_mismatch_fails_materialization() {
    let (_dir, repo) = setup();
    repo.factory()
        .acquire()
        .unwrap()
        .execute_batch(
            "INSERT INTO public.members (member_id, name, score, active, joined_at) \
             VALUES (1, 'Ada', 1.0, 1, 'not a timestamp')",
        )
        .unwrap();

    let err = repo.select_by_id::<Member>(&1).unwrap_err();
    assert!(matches!(
        err,
        StoreError::RowError(RowError::TypeMismatch { ref column, .. }) if column == "joined_at"
    ));
}

// =============================================================================
// Descriptor-level operations
// =============================================================================

fn tag_descriptor() -> TableDescriptor {
    TableDescriptor::new("Tag")
        .with_table("main", "tags")
        .keyed_column("id", "id", "id")
        .column("label", "label")
}

fn tag(id: i64, label: &str) -> BTreeMap<String, Value> {
    let mut values = BTreeMap::new();
    values.insert("id".to_string(), Value::from(id));
    values.insert("label".to_string(), Value::from(label));
    values
}

#[test]
fn test_record_operations() {
    let (_dir, repo) = setup();
    repo.factory()
        .acquire()
        .unwrap()
        .execute_batch("CREATE TABLE tags (id INTEGER PRIMARY KEY, label TEXT)")
        .unwrap();
    let d = tag_descriptor();

    assert!(repo.insert_record(&d, &tag(1, "red")).unwrap());
    assert!(repo.insert_record(&d, &tag(2, "blue")).unwrap());
    assert!(repo.update_record(&d, &tag(2, "green")).unwrap());

    let row = repo.select_by_id_row(&d, &2).unwrap().unwrap();
    assert_eq!(row.get_by_name::<String>("label").unwrap(), "green");

    assert!(repo.delete_record(&d, &tag(1, "red")).unwrap());
    assert!(repo.delete_by_id_in(&d, &2).unwrap());
    assert!(repo.select_all_rows(&d).unwrap().is_empty());
}

#[test]
fn test_record_missing_field_is_mapping_error() {
    let (_dir, repo) = setup();
    let mut incomplete = BTreeMap::new();
    incomplete.insert("id".to_string(), Value::from(1));

    let err = repo.insert_record(&tag_descriptor(), &incomplete).unwrap_err();
    assert!(matches!(
        err,
        StoreError::MappingError(MappingError::UnreadableField { ref field, .. }) if field == "label"
    ));
}
