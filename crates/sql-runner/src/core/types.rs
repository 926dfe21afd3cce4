use serde::Serialize;

/// One result row: column name -> value, in select-list order.
///
/// `serde_json::Map` is insertion-ordered here (`preserve_order` feature),
/// which keeps row objects in the column order the engine reported.
pub type DbRow = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub decl_type: String,
}

#[derive(Debug, Serialize)]
pub struct TableDetails {
    pub columns: Vec<ColumnInfo>,
    pub sample_data: Vec<DbRow>,
}

/// Result of running one SQL statement. Serializes as a bare row array,
/// a `{"message"}` mapping, or an `{"error"}` mapping.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SqlOutcome {
    Rows(Vec<DbRow>),
    Message { message: String },
    Error { error: String },
}

impl SqlOutcome {
    pub fn error(msg: impl Into<String>) -> Self {
        SqlOutcome::Error { error: msg.into() }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TablesOutcome {
    Names(Vec<String>),
    Error { error: String },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TableInfoOutcome {
    Info(TableDetails),
    Error { error: String },
}
