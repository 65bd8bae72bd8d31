//! CSV-backed tables held in an in-memory DuckDB database.
//!
//! A [`Table`] is one read-modify-write cycle over a single CSV file: the
//! whole file is loaded with `read_csv`, mutated with SQL, and written back
//! with `COPY` into a temp file in the same directory that then atomically
//! replaces the original. A failure at any point leaves the existing file
//! untouched.
//!
//! Every column is stored as `VARCHAR`; typed parsing happens in the stores.

use chrono::NaiveDateTime;
use duckdb::Connection as DuckDbConnection;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::config;
use crate::error::{Result, ScrapeError};

/// A table column: SQL name and the header written to the CSV file.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub header: &'static str,
}

/// One row as read from a table, in column order. `None` is an empty cell.
pub type Row = Vec<Option<String>>;

pub struct Table {
    conn: DuckDbConnection,
    name: &'static str,
    columns: &'static [Column],
    path: PathBuf,
}

impl Table {
    /// Load `path` into a fresh table. A missing or empty file yields an
    /// empty table.
    pub fn load(path: &Path, name: &'static str, columns: &'static [Column]) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory().map_err(|e| ScrapeError::storage(path, e))?;
        let table = Self {
            conn,
            name,
            columns,
            path: path.to_path_buf(),
        };

        let col_defs = columns
            .iter()
            .map(|c| format!("\"{}\" VARCHAR", c.name))
            .collect::<Vec<_>>()
            .join(", ");
        table
            .conn
            .execute_batch(&format!("CREATE TABLE {} ({})", name, col_defs))
            .map_err(|e| table.err(e))?;

        let has_data = match fs::metadata(path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(table.err(e)),
        };

        if has_data {
            let col_types = columns
                .iter()
                .map(|c| format!("'{}': 'VARCHAR'", c.name))
                .collect::<Vec<_>>()
                .join(", ");
            table
                .conn
                .execute_batch(&format!(
                    "INSERT INTO {} SELECT * FROM read_csv('{}', header = true, \
                     auto_detect = false, delim = ',', quote = '\"', escape = '\"', \
                     columns = {{{}}})",
                    name,
                    sql_path(path),
                    col_types
                ))
                .map_err(|e| table.err(format!("unreadable table file: {}", e)))?;
            debug!("Loaded {} rows from {}", table.len()?, path.display());
        }

        Ok(table)
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.name), [], |row| {
                row.get(0)
            })
            .map_err(|e| self.err(e))?;
        Ok(count as usize)
    }

    /// Append a row. `values` must follow column order.
    pub fn insert(&self, values: &[Option<String>]) -> Result<()> {
        self.check_arity(values)?;
        let placeholders = vec!["?"; values.len()].join(", ");
        self.conn
            .execute(
                &format!("INSERT INTO {} VALUES ({})", self.name, placeholders),
                duckdb::params_from_iter(values.iter()),
            )
            .map_err(|e| self.err(e))?;
        Ok(())
    }

    /// Overwrite every column of the rows whose `key_col` equals `key`, in place.
    /// Returns the number of rows updated.
    pub fn update_where(&self, key_col: &str, key: &str, values: &[Option<String>]) -> Result<usize> {
        self.check_arity(values)?;
        let assignments = self
            .columns
            .iter()
            .map(|c| format!("\"{}\" = ?", c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut params: Vec<Option<String>> = values.to_vec();
        params.push(Some(key.to_string()));
        self.conn
            .execute(
                &format!(
                    "UPDATE {} SET {} WHERE \"{}\" = ?",
                    self.name, assignments, key_col
                ),
                duckdb::params_from_iter(params.iter()),
            )
            .map_err(|e| self.err(e))
    }

    /// All rows, every column, sorted by `order_by` (an SQL ORDER BY list).
    pub fn rows(&self, order_by: &str) -> Result<Vec<Row>> {
        let cols = self.quoted_columns();
        self.query(
            &format!("SELECT {} FROM {} ORDER BY {}", cols, self.name, order_by),
            self.columns.len(),
        )
    }

    /// Values of a single column in insertion order.
    pub fn column_values(&self, column: &str) -> Result<Vec<Option<String>>> {
        let rows = self.query(
            &format!("SELECT \"{}\" FROM {} ORDER BY rowid", column, self.name),
            1,
        )?;
        Ok(rows.into_iter().map(|mut r| r.remove(0)).collect())
    }

    /// Write the table back to its file, replacing it atomically.
    pub fn save(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| self.err(e))?;

        // Removed on drop unless persisted.
        let tmp = tempfile::Builder::new()
            .prefix(".pricescrape-")
            .suffix(".csv.tmp")
            .tempfile_in(parent)
            .map_err(|e| self.err(e))?;

        let select = self
            .columns
            .iter()
            .map(|c| format!("\"{}\" AS \"{}\"", c.name, c.header))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn
            .execute_batch(&format!(
                "COPY (SELECT {} FROM {} ORDER BY rowid) TO '{}' (FORMAT CSV, HEADER, DELIMITER ',')",
                select,
                self.name,
                sql_path(tmp.path())
            ))
            .map_err(|e| self.err(e))?;

        tmp.as_file().sync_all().map_err(|e| self.err(e))?;
        tmp.persist(&self.path).map_err(|e| self.err(e.error))?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }

    fn query(&self, sql: &str, width: usize) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql).map_err(|e| self.err(e))?;
        let mut rows = stmt.query([]).map_err(|e| self.err(e))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| self.err(e))? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value: Option<String> = row.get(i).map_err(|e| self.err(e))?;
                values.push(value);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn quoted_columns(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("\"{}\"", c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn check_arity(&self, values: &[Option<String>]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(self.err(format!(
                "expected {} values, got {}",
                self.columns.len(),
                values.len()
            )));
        }
        Ok(())
    }

    fn err(&self, cause: impl std::fmt::Display) -> ScrapeError {
        ScrapeError::storage(&self.path, cause)
    }
}

/// Path literal for embedding in DuckDB SQL.
fn sql_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace('\'', "''")
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

pub(crate) fn decimal_cell(path: &Path, column: &str, cell: Option<&str>) -> Result<Decimal> {
    let text = cell
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ScrapeError::storage(path, format!("missing value in column '{}'", column)))?;
    Decimal::from_str(text.trim()).map_err(|e| {
        ScrapeError::storage(path, format!("bad {} value '{}': {}", column, text, e))
    })
}

pub(crate) fn optional_decimal_cell(
    path: &Path,
    column: &str,
    cell: Option<&str>,
) -> Result<Option<Decimal>> {
    match cell {
        Some(text) if !text.trim().is_empty() => decimal_cell(path, column, Some(text)).map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn timestamp_cell(path: &Path, column: &str, cell: Option<&str>) -> Result<NaiveDateTime> {
    let text = cell
        .ok_or_else(|| ScrapeError::storage(path, format!("missing value in column '{}'", column)))?;
    NaiveDateTime::parse_from_str(text.trim(), config::TIMESTAMP_FORMAT).map_err(|e| {
        ScrapeError::storage(path, format!("bad {} value '{}': {}", column, text, e))
    })
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(config::TIMESTAMP_FORMAT).to_string()
}
