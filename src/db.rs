use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::error::PortalError;
use crate::listview::ListRecord;
use crate::mock;
use crate::records::{
    Announcement, AnnouncementCategory, Attachment, Grade, GradeCategory, Resource,
    ResourceCategory, ResourceType,
};
use crate::store::RecordStore;

pub const DB_FILE: &str = "portal.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(db_path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn ensure_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS workspace_meta(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS announcements(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            author TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            pinned INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS resources(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            kind TEXT NOT NULL,
            date TEXT NOT NULL,
            files_json TEXT NOT NULL DEFAULT '[]'
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_resources_category ON resources(category)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS grades(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            score REAL NOT NULL,
            max_score REAL NOT NULL,
            percentage REAL NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Loads the mock seed into a workspace the first time it is opened. Returns
/// whether anything was written.
pub fn seed_once(conn: &Connection) -> anyhow::Result<bool> {
    let seeded: Option<String> = conn
        .query_row(
            "SELECT value FROM workspace_meta WHERE key = 'seeded_at'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    if seeded.is_some() {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    for a in mock::announcements() {
        insert_row(&tx, &a)?;
    }
    for r in mock::resources() {
        insert_row(&tx, &r)?;
    }
    for g in mock::grades() {
        insert_row(&tx, &g)?;
    }
    tx.execute(
        "INSERT INTO workspace_meta(key, value) VALUES('seeded_at', ?)",
        [chrono::Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;
    Ok(true)
}

/// Column mapping for a record table. `COLUMNS[0]` is the id column and
/// `to_values` yields values in `COLUMNS` order.
pub trait SqlRecord: ListRecord + Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn to_values(&self) -> Vec<Value>;
}

fn label_col<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown label '{raw}'").into(),
        )
    })
}

impl SqlRecord for Announcement {
    const TABLE: &'static str = "announcements";
    const COLUMNS: &'static [&'static str] =
        &["id", "title", "content", "author", "category", "date", "pinned"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            author: row.get(3)?,
            category: label_col(row, 4, AnnouncementCategory::parse)?,
            date: row.get(5)?,
            pinned: row.get::<_, i64>(6)? != 0,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.id.clone()),
            Value::Text(self.title.clone()),
            Value::Text(self.content.clone()),
            Value::Text(self.author.clone()),
            Value::Text(self.category.as_str().to_string()),
            Value::Text(self.date.clone()),
            Value::Integer(self.pinned as i64),
        ]
    }
}

impl SqlRecord for Resource {
    const TABLE: &'static str = "resources";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "category",
        "kind",
        "date",
        "files_json",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let files_json: String = row.get(6)?;
        let files: Vec<Attachment> = serde_json::from_str(&files_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: label_col(row, 3, ResourceCategory::parse)?,
            kind: label_col(row, 4, ResourceType::parse)?,
            date: row.get(5)?,
            files,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        let files_json = serde_json::to_string(&self.files).unwrap_or_else(|_| "[]".to_string());
        vec![
            Value::Text(self.id.clone()),
            Value::Text(self.title.clone()),
            Value::Text(self.description.clone()),
            Value::Text(self.category.as_str().to_string()),
            Value::Text(self.kind.as_str().to_string()),
            Value::Text(self.date.clone()),
            Value::Text(files_json),
        ]
    }
}

impl SqlRecord for Grade {
    const TABLE: &'static str = "grades";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "category",
        "score",
        "max_score",
        "percentage",
        "date",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            category: label_col(row, 2, GradeCategory::parse)?,
            score: row.get(3)?,
            max_score: row.get(4)?,
            percentage: row.get(5)?,
            date: row.get(6)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.id.clone()),
            Value::Text(self.title.clone()),
            Value::Text(self.category.as_str().to_string()),
            Value::Real(self.score),
            Value::Real(self.max_score),
            Value::Real(self.percentage),
            Value::Text(self.date.clone()),
        ]
    }
}

fn insert_row<R: SqlRecord>(conn: &Connection, record: &R) -> rusqlite::Result<usize> {
    let placeholders = vec!["?"; R::COLUMNS.len()].join(", ");
    let sql = format!(
        "INSERT INTO {}({}) VALUES({})",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders
    );
    conn.execute(&sql, params_from_iter(record.to_values()))
}

fn select_one<R: SqlRecord>(conn: &Connection, id: &str) -> rusqlite::Result<Option<R>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?",
        R::COLUMNS.join(", "),
        R::TABLE
    );
    conn.query_row(&sql, [id], |row| R::from_row(row)).optional()
}

/// Record store over a workspace database. Rows are listed in insertion
/// order (rowid).
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl<R: SqlRecord> RecordStore<R> for SqliteStore<'_> {
    fn list(&self) -> Result<Vec<R>, PortalError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            R::COLUMNS.join(", "),
            R::TABLE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| R::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn create(&mut self, record: R) -> Result<R, PortalError> {
        match insert_row(self.conn, &record) {
            Ok(_) => Ok(record),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(PortalError::validation("id", "already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update(&mut self, id: &str, patch: R::Patch) -> Result<R, PortalError> {
        let Some(mut record) = select_one::<R>(self.conn, id)? else {
            return Err(PortalError::not_found(R::KIND, id));
        };
        record.apply_patch(patch)?;

        let assignments = R::COLUMNS[1..]
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE id = ?", R::TABLE, assignments);
        let mut values = record.to_values();
        let id_value = values.remove(0);
        values.push(id_value);
        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(record)
    }

    fn delete(&mut self, id: &str) -> Result<(), PortalError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let changed = self.conn.execute(&sql, [id])?;
        if changed == 0 {
            return Err(PortalError::not_found(R::KIND, id));
        }
        Ok(())
    }
}
