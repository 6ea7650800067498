// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod categories;
mod items;

pub use categories::CategoryRegistry;
pub use items::ItemRepository;

use anyhow::{Context, Result, anyhow, bail};
use cubby_app::{CategoryDraft, ItemDraft};
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "cubby";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[("blobs", &["key", "value", "updated_at"])];

const DEMO_CATEGORIES: [&str; 5] = ["Electronics", "Kitchen", "Outdoor", "Tools", "Books"];

const DEMO_ITEMS: [(&str, &str, &str); 8] = [
    ("Headphones", "Electronics", "2"),
    ("HDMI cable", "Electronics", "6"),
    ("Cast iron pan", "Kitchen", "1"),
    ("Mason jars", "Kitchen", "12"),
    ("Tent", "Outdoor", "1"),
    ("Headlamp", "Outdoor", "3"),
    ("Cordless drill", "Tools", "1"),
    ("Field guide", "Books", "4"),
];

/// Failure talking to the blob table. Attached as context so callers can
/// tell storage trouble apart from bad input with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    ReadFailed { key: String },
    WriteFailed { key: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { key } => write!(f, "read stored `{key}` data"),
            Self::WriteFailed { key } => write!(f, "write stored `{key}` data"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Named text blobs: the whole persistence contract the repositories need.
pub trait BlobStore {
    fn get_blob(&self, key: &str) -> Result<Option<String>>;
    fn put_blob(&self, key: &str, value: &str) -> Result<()>;
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    pub fn items(&self) -> ItemRepository<'_, Self> {
        ItemRepository::new(self)
    }

    pub fn categories(&self) -> CategoryRegistry<'_, Self> {
        CategoryRegistry::new(self)
    }

    pub fn seed_demo_data(&self) -> Result<()> {
        let categories = self.categories();
        for name in DEMO_CATEGORIES {
            categories.add(&CategoryDraft {
                name: name.to_owned(),
            })?;
        }

        let items = self.items();
        for (name, category, quantity) in DEMO_ITEMS {
            items.create(&ItemDraft {
                name: name.to_owned(),
                category: category.to_owned(),
                quantity: quantity.to_owned(),
                image: None,
            })?;
        }
        Ok(())
    }
}

impl BlobStore for Store {
    fn get_blob(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| StorageError::ReadFailed {
                key: key.to_owned(),
            })
    }

    fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO blobs (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| StorageError::WriteFailed {
                key: key.to_owned(),
            })?;
        tracing::debug!(key, bytes = value.len(), "blob written");
        Ok(())
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CUBBY_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CUBBY_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("cubby.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

/// Decode a stored collection, treating unreadable JSON as empty.
fn decode_or_empty<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(error) => {
            tracing::warn!(key, %error, "stored data is not valid JSON; treating it as empty");
            Vec::new()
        }
    }
}

/// Decode a stored collection ahead of a rewrite. Unreadable JSON is an
/// error here so a mutation never replaces data it could not read.
fn decode_for_write<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Result<Vec<T>> {
    match raw {
        Some(raw) => serde_json::from_str(&raw).with_context(|| {
            format!("stored `{key}` data is not valid JSON; refusing to overwrite it")
        }),
        None => Ok(Vec::new()),
    }
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing table `{table}` -- point [storage].db_path at a cubby database"
            );
        }

        let present = table_columns(conn, table)?;
        let missing = required
            .iter()
            .filter(|column| !present.contains(**column))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}",
                missing.join(", ")
            );
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?",
        params![table],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .with_context(|| format!("check table {table}"))
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("prepare table info for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query table info for {table}"))?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
