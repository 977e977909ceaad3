//! Shared test harness: a fresh in-memory SQLite database with the full
//! schema applied. Each call yields an isolated database.

use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should connect");
    Migrator::up(&db, None)
        .await
        .expect("schema migrations should apply");
    db
}
