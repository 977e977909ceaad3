pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use tracing::info;
use util::config;

/// Connects using `DATABASE_PATH`. A full DSN is passed through untouched;
/// a bare path is treated as a SQLite file and its parent directory is
/// created if missing.
pub async fn connect() -> DatabaseConnection {
    let url = database_url(&config::database_path());
    info!(url = %url, "connecting to database");
    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}

fn database_url(path_or_dsn: &str) -> String {
    let is_dsn = ["sqlite:", "postgres://", "mysql://"]
        .iter()
        .any(|scheme| path_or_dsn.starts_with(scheme));
    if is_dsn {
        return path_or_dsn.to_owned();
    }

    if let Some(parent) = Path::new(path_or_dsn).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    format!("sqlite://{path_or_dsn}?mode=rwc")
}
