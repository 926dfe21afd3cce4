use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "sql-runner")]
pub struct Args {
    /// SQLite database file to serve. Created on first write if missing.
    #[arg(long, default_value = "sql_runner.db")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Logging level (stderr). Also supports RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Allowed CORS origin (repeatable). With none given, any origin is allowed.
    #[arg(long)]
    pub cors_origin: Vec<String>,
}
