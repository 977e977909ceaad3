use async_trait::async_trait;
use db::models::user::{Model as User, Role};
use fake::Fake;
use fake::faker::name::en::Name;
use sea_orm::{DatabaseConnection, DbErr};

use crate::seed::Seeder;

pub struct UserSeeder;

#[async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        User::create(db, "admin", "admin@rollcall.local", "not-a-real-hash", Role::Admin).await?;
        User::create(
            db,
            "teacher",
            "teacher@rollcall.local",
            "not-a-real-hash",
            Role::Teacher,
        )
        .await?;

        for i in 1..=10 {
            let display: String = Name().fake();
            let username = format!(
                "{}{i}",
                display.to_lowercase().replace([' ', '.', '\''], "")
            );
            let email = format!("{username}@rollcall.local");
            User::create(db, &username, &email, "not-a-real-hash", Role::Student).await?;
        }

        Ok(())
    }
}
