use serde::Deserialize;

/// Body of `POST /api/v1/sql/run`. One field, one statement.
#[derive(Debug, Deserialize)]
pub struct QueryModel {
    pub query: String,
}
