use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rusqlite::{types::ValueRef, Connection, Row};

use crate::core::{
    connection,
    types::{DbRow, SqlOutcome},
};
use crate::error::AppResult;

/// Statement prefixes that commit and report a change count instead of
/// fetching rows. Anything else (SELECT, but also DDL like CREATE/DROP)
/// goes down the query path and attempts a fetch.
const MUTATION_KEYWORDS: [&str; 3] = ["INSERT", "UPDATE", "DELETE"];

/// Runs one SQL statement against the database at `db_path` and shapes the
/// outcome. Infallible by contract: engine faults (including a failed open)
/// come back as the `{"error"}` mapping, never as an Err.
pub fn execute(db_path: &Path, sql: &str) -> SqlOutcome {
    match run_statement(db_path, sql) {
        Ok(outcome) => outcome,
        Err(e) => SqlOutcome::error(e.to_string()),
    }
}

fn run_statement(db_path: &Path, sql: &str) -> AppResult<SqlOutcome> {
    // Connection is request-scoped; dropping it on any exit path below
    // (including `?`) closes it.
    let conn = connection::open(db_path)?;

    if is_mutation(sql) {
        let changes = conn.execute(sql, [])?;
        Ok(SqlOutcome::Message {
            message: format!("Query executed successfully. Rows affected: {changes}"),
        })
    } else {
        Ok(SqlOutcome::Rows(fetch_rows(&conn, sql)?))
    }
}

/// Leading-keyword classification, case-insensitive after trimming. A pure
/// prefix check: one statement per call with auto-commit semantics, so no
/// real DML/DQL distinction is needed beyond commit-and-count vs fetch.
fn is_mutation(sql: &str) -> bool {
    let head = sql.trim_start().as_bytes();
    MUTATION_KEYWORDS
        .iter()
        .any(|kw| head.len() >= kw.len() && head[..kw.len()].eq_ignore_ascii_case(kw.as_bytes()))
}

/// Fetches all rows for `sql`, preserving column order and row order as the
/// engine returns them. Statements that produce no rows (or DDL stepped
/// through this path) yield an empty vec.
pub fn fetch_rows(conn: &Connection, sql: &str) -> AppResult<Vec<DbRow>> {
    let mut stmt = conn.prepare(sql)?;
    let col_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    let mut r = stmt.query([])?;
    while let Some(row) = r.next()? {
        rows.push(row_to_json_object(row, &col_names)?);
    }
    Ok(rows)
}

fn row_to_json_object(row: &Row<'_>, col_names: &[String]) -> AppResult<DbRow> {
    let mut out = DbRow::new();
    for (i, name) in col_names.iter().enumerate() {
        let v = match row.get_ref(i)? {
            ValueRef::Null => serde_json::Value::Null,
            ValueRef::Integer(x) => serde_json::Value::from(x),
            ValueRef::Real(x) => serde_json::Value::from(x),
            ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).to_string()),
            ValueRef::Blob(b) => serde_json::json!({
                "$type": "blob",
                "base64": BASE64.encode(b),
                "size": b.len()
            }),
        };
        out.insert(name.clone(), v);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn seeded_db(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER, name TEXT);
             INSERT INTO users VALUES (1, 'a'), (2, 'b');",
        )
        .unwrap();
        path
    }

    #[test]
    fn select_returns_all_rows_as_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "SELECT * FROM users");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": 1, "name": "a"},
                {"id": 2, "name": "b"}
            ])
        );
    }

    #[test]
    fn select_preserves_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "SELECT name, id FROM users");
        let SqlOutcome::Rows(rows) = out else {
            panic!("expected rows, got {out:?}");
        };
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["name", "id"]);
    }

    #[test]
    fn select_with_no_matches_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "SELECT * FROM users WHERE id = 99");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[test]
    fn insert_commits_and_reports_rows_affected() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "INSERT INTO users VALUES (3, 'c')");
        let SqlOutcome::Message { message } = out else {
            panic!("expected message, got {out:?}");
        };
        assert_eq!(message, "Query executed successfully. Rows affected: 1");

        // The change is durably visible to a fresh connection.
        let out = execute(&db, "SELECT COUNT(*) AS n FROM users");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!([{"n": 3}]));
    }

    #[test]
    fn update_reports_actual_change_count() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "UPDATE users SET name = 'x'");
        let SqlOutcome::Message { message } = out else {
            panic!("expected message, got {out:?}");
        };
        assert_eq!(message, "Query executed successfully. Rows affected: 2");
    }

    #[test]
    fn classification_ignores_case_and_leading_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "  \n\tdelete from users where id = 1");
        let SqlOutcome::Message { message } = out else {
            panic!("expected message, got {out:?}");
        };
        assert_eq!(message, "Query executed successfully. Rows affected: 1");
    }

    #[test]
    fn ddl_falls_through_to_query_path() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        // CREATE is not a mutation prefix; the fetch attempt still executes
        // the statement and yields zero rows.
        let out = execute(&db, "CREATE TABLE extra (x INTEGER)");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!([]));

        let out = execute(&db, "SELECT * FROM extra");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[test]
    fn malformed_sql_returns_error_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "SELEC * FROM users");
        let SqlOutcome::Error { error } = out else {
            panic!("expected error, got {out:?}");
        };
        assert!(!error.is_empty());
    }

    #[test]
    fn missing_table_error_mentions_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_db(&dir);

        let out = execute(&db, "SELECT * FROM nope");
        let SqlOutcome::Error { error } = out else {
            panic!("expected error, got {out:?}");
        };
        assert!(error.contains("nope"), "unexpected message: {error}");
    }

    #[test]
    fn value_types_map_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("vals.db");
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE vals (i INTEGER, f REAL, t TEXT, n TEXT, b BLOB);
             INSERT INTO vals VALUES (7, 1.5, 'hi', NULL, X'0102');",
        )
        .unwrap();
        drop(conn);

        let out = execute(&db, "SELECT * FROM vals");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "i": 7,
                "f": 1.5,
                "t": "hi",
                "n": null,
                "b": {"$type": "blob", "base64": "AQI=", "size": 2}
            }])
        );
    }
}
