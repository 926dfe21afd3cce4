use rusqlite::{Connection, Row};

use crate::core::query;
use crate::core::types::{ColumnInfo, TableDetails};
use crate::error::{AppError, AppResult};

/// Fixed sample size for table previews.
pub const SAMPLE_ROWS: usize = 5;

/// Lists user-defined table names in catalog order. SQLite's own bookkeeping
/// tables (`sqlite_sequence` etc.) are excluded.
pub fn list_tables(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")?;
    let rows = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Column schema plus up to [`SAMPLE_ROWS`] unordered sample rows for `table`.
///
/// Neither `PRAGMA table_info` nor a FROM clause can take the table name as a
/// bound parameter, so the caller-supplied name is checked against the
/// catalog before it is interpolated into SQL text.
pub fn table_info(conn: &Connection, table: &str) -> AppResult<TableDetails> {
    let known = list_tables(conn)?;
    if !known.iter().any(|t| t == table) {
        return Err(AppError::UnknownTable(table.to_string()));
    }

    let columns = table_columns(conn, table)?;
    let sample_data = query::fetch_rows(conn, &format!("SELECT * FROM {table} LIMIT {SAMPLE_ROWS}"))?;
    Ok(TableDetails {
        columns,
        sample_data,
    })
}

fn table_columns(conn: &Connection, table: &str) -> AppResult<Vec<ColumnInfo>> {
    let sql = format!("PRAGMA table_info({table})");
    let mut stmt = conn.prepare(&sql)?;
    let cols = stmt
        .query_map([], |row: &Row<'_>| {
            let name: String = row.get("name")?;
            let decl_type: String = row.get("type")?;
            Ok(ColumnInfo { name, decl_type })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cols)
}
