//! Curator Storage Layer
//!
//! Implements the RuleStore trait using SQLite.
//!
//! # Architecture
//!
//! - `rule_entries`: rule tables, one row per search token, ordered by position
//! - `dimensions`: the authoritative dimension lookup, dynamically typed
//! - [`import`]: TOML/JSON documents for bulk loading
//!
//! # Examples
//!
//! ```no_run
//! use curator_store::SqliteRuleStore;
//!
//! let store = SqliteRuleStore::new(":memory:").unwrap();
//! // Store is now ready for rule operations
//! ```

#![warn(missing_docs)]

pub mod import;

use curator_domain::rule_table::{normalize_domain, normalize_token};
use curator_domain::traits::RuleStore;
use curator_domain::{DimensionEntry, DimensionLookup, FieldValue, RuleBook, RuleEntry, RuleTable};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Import document could not be parsed
    #[error("Import error: {0}")]
    Import(String),
}

/// Counts from a rule import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Tables touched
    pub tables: usize,

    /// Entries written
    pub inserted: usize,

    /// Entries skipped as duplicates
    pub skipped: usize,
}

/// Size of one stored rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    /// Domain name
    pub domain: String,

    /// Number of entries
    pub entries: usize,

    /// Entries with a blank standard value (deletions or awaiting curation)
    pub blank: usize,
}

/// SQLite-based implementation of RuleStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Workers share a loaded
/// [`curator_domain::CatalogSnapshot`] instead of the store.
pub struct SqliteRuleStore {
    conn: Connection,
}

impl SqliteRuleStore {
    /// Create a new SqliteRuleStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use curator_store::SqliteRuleStore;
    ///
    /// let store = SqliteRuleStore::new("curator.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Append with the next free position; `false` on duplicate or blank token
    fn append_on(conn: &Connection, domain: &str, entry: &RuleEntry) -> Result<bool, StoreError> {
        let domain = normalize_domain(domain);
        let key = normalize_token(&entry.search_token);
        if domain.is_empty() || key.is_empty() {
            return Ok(false);
        }

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO rule_entries (domain, position, search_token, search_key, standard_value)
             SELECT ?1, COALESCE(MAX(position) + 1, 0), ?2, ?3, ?4
             FROM rule_entries WHERE domain = ?1",
            params![&domain, entry.search_token.trim(), &key, &entry.standard_value],
        )?;
        Ok(inserted == 1)
    }

    /// Import every table of a rule book in one transaction
    ///
    /// With `replace`, each imported domain is cleared first; otherwise
    /// entries are appended after the existing ones and duplicates skipped.
    pub fn import_rules(&mut self, book: &RuleBook, replace: bool) -> Result<ImportSummary, StoreError> {
        let tx = self.conn.transaction()?;
        let mut summary = ImportSummary::default();

        for table in book.tables() {
            if replace {
                tx.execute("DELETE FROM rule_entries WHERE domain = ?1", params![table.domain()])?;
            }
            for entry in table.entries() {
                if Self::append_on(&tx, table.domain(), entry)? {
                    summary.inserted += 1;
                } else {
                    summary.skipped += 1;
                }
            }
            summary.tables += 1;
        }

        tx.commit()?;
        info!(
            tables = summary.tables,
            inserted = summary.inserted,
            skipped = summary.skipped,
            replace,
            "Rules imported"
        );
        Ok(summary)
    }

    /// Insert or replace dimension rows
    pub fn import_dimensions(&mut self, lookup: &DimensionLookup) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO dimensions (key, length, width, depth) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (key, entry) in lookup.iter() {
                stmt.execute(params![
                    key,
                    to_sql(entry.length.as_ref()),
                    to_sql(entry.width.as_ref()),
                    to_sql(entry.depth.as_ref()),
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        info!(rows = count, "Dimensions imported");
        Ok(count)
    }

    /// Entry counts per domain
    pub fn table_stats(&self) -> Result<Vec<TableStats>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT domain, COUNT(*), SUM(CASE WHEN TRIM(standard_value) = '' THEN 1 ELSE 0 END)
             FROM rule_entries GROUP BY domain ORDER BY domain",
        )?;
        let stats = stmt
            .query_map([], |row| {
                Ok(TableStats {
                    domain: row.get(0)?,
                    entries: row.get::<_, i64>(1)? as usize,
                    blank: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    /// Set the standard value of an existing entry
    ///
    /// This is the curation step that follows promotion. Returns `false`
    /// when the token is not in the table.
    pub fn curate(&mut self, domain: &str, token: &str, standard_value: &str) -> Result<bool, StoreError> {
        let updated = self.conn.execute(
            "UPDATE rule_entries SET standard_value = ?3 WHERE domain = ?1 AND search_key = ?2",
            params![normalize_domain(domain), normalize_token(token), standard_value.trim()],
        )?;
        Ok(updated == 1)
    }

    /// Number of dimension rows
    pub fn dimension_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dimensions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Convert a field value for an untyped column
fn to_sql(value: Option<&FieldValue>) -> Value {
    match value {
        None | Some(FieldValue::Empty) => Value::Null,
        Some(FieldValue::Number(n)) => Value::Real(*n),
        Some(FieldValue::Bool(b)) => Value::Integer(i64::from(*b)),
        Some(FieldValue::Text(s)) => Value::Text(s.clone()),
    }
}

/// Read an untyped column back as a field value
fn from_sql(value: ValueRef<'_>) -> Result<Option<FieldValue>, StoreError> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(FieldValue::Number(i as f64))),
        ValueRef::Real(f) => Ok(Some(FieldValue::Number(f))),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Some(FieldValue::text(s)))
            .map_err(|e| StoreError::InvalidData(format!("dimension text is not UTF-8: {}", e))),
        ValueRef::Blob(_) => Err(StoreError::InvalidData("dimension stored as blob".to_string())),
    }
}

impl RuleStore for SqliteRuleStore {
    type Error = StoreError;

    fn domains(&self) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT domain FROM rule_entries ORDER BY domain")?;
        let domains = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(domains)
    }

    fn load_table(&self, domain: &str) -> Result<Option<RuleTable>, Self::Error> {
        let domain = normalize_domain(domain);
        let mut stmt = self.conn.prepare(
            "SELECT search_token, standard_value FROM rule_entries
             WHERE domain = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![&domain], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            debug!(domain = %domain, "No rule table");
            return Ok(None);
        }

        let mut table = RuleTable::new(&domain);
        for (token, standard) in rows {
            table.push(RuleEntry::new(&token, standard));
        }
        Ok(Some(table))
    }

    fn append_rule(&mut self, domain: &str, entry: RuleEntry) -> Result<bool, Self::Error> {
        let appended = Self::append_on(&self.conn, domain, &entry)?;
        if appended {
            debug!(domain = %domain, token = %entry.search_token, "Rule appended");
        }
        Ok(appended)
    }

    fn load_dimensions(&self) -> Result<DimensionLookup, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, length, width, depth FROM dimensions ORDER BY key")?;
        let mut rows = stmt.query([])?;

        let mut lookup = DimensionLookup::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let entry = DimensionEntry {
                length: from_sql(row.get_ref(1)?)?,
                width: from_sql(row.get_ref(2)?)?,
                depth: from_sql(row.get_ref(3)?)?,
            };
            lookup.insert(key, entry);
        }
        Ok(lookup)
    }
}

impl SqliteRuleStore {
    /// Look up the stored standard value for a token, if the token exists
    pub fn standard_value(&self, domain: &str, token: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT standard_value FROM rule_entries WHERE domain = ?1 AND search_key = ?2",
                params![normalize_domain(domain), normalize_token(token)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}
