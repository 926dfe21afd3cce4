use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::core::{connection, query, schema};
use crate::core::types::{SqlOutcome, TableInfoOutcome, TablesOutcome};
use crate::error::AppResult;

use super::protocol::QueryModel;
use super::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({"status": "ok", "service": "SQL Runner API"}))
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Executes one SQL statement. Engine faults come back as a 200 with an
/// `{"error"}` body; the error mapping is a normal return value here.
pub async fn run_sql(State(state): State<AppState>, Json(req): Json<QueryModel>) -> Json<SqlOutcome> {
    let db = state.db_path.clone();
    match tokio::task::spawn_blocking(move || query::execute(&db, &req.query)).await {
        Ok(outcome) => Json(outcome),
        Err(e) => Json(SqlOutcome::error(format!("sql worker join error: {e}"))),
    }
}

pub async fn list_tables(State(state): State<AppState>) -> Json<TablesOutcome> {
    let db = state.db_path.clone();
    let res: Result<AppResult<Vec<String>>, _> =
        tokio::task::spawn_blocking(move || schema::list_tables(&connection::open(&db)?)).await;
    match res {
        Ok(Ok(names)) => Json(TablesOutcome::Names(names)),
        Ok(Err(e)) => Json(TablesOutcome::Error { error: e.to_string() }),
        Err(e) => Json(TablesOutcome::Error {
            error: format!("sql worker join error: {e}"),
        }),
    }
}

pub async fn table_info(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Json<TableInfoOutcome> {
    let db = state.db_path.clone();
    let table = table_name.clone();
    let res =
        tokio::task::spawn_blocking(move || schema::table_info(&connection::open(&db)?, &table))
            .await;
    match res {
        Ok(Ok(details)) => Json(TableInfoOutcome::Info(details)),
        Ok(Err(e)) => {
            tracing::debug!(table = %table_name, error = %e, "table info lookup failed");
            Json(TableInfoOutcome::Error {
                error: format!("Error fetching info for table {table_name}: {e}"),
            })
        }
        Err(e) => Json(TableInfoOutcome::Error {
            error: format!("sql worker join error: {e}"),
        }),
    }
}
