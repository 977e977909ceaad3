use async_trait::async_trait;
use colored::Colorize;
use sea_orm::{DatabaseConnection, DbErr};

#[async_trait]
pub trait Seeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr>;
}

pub async fn run_seeder(seeder: &(dyn Seeder + Send + Sync), name: &str, db: &DatabaseConnection) {
    println!("{} {name}", "Seeding".cyan());
    match seeder.seed(db).await {
        Ok(()) => println!("{} {name}", "Seeded".green()),
        Err(e) => {
            eprintln!("{} {name}: {e}", "Failed to seed".red());
            std::process::exit(1);
        }
    }
}
