use async_trait::async_trait;
use db::models::{class::Model as Class, user::Model as User};
use sea_orm::{DatabaseConnection, DbErr};

use crate::seed::Seeder;

pub struct ClassSeeder;

#[async_trait]
impl Seeder for ClassSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let teacher = User::find_by_username(db, "teacher")
            .await?
            .ok_or_else(|| DbErr::Custom("teacher user not seeded".to_owned()))?;

        Class::create(
            db,
            "Introduction to Programming",
            "cos132",
            "Computer Science",
            Some("First-year programming fundamentals"),
            teacher.id,
        )
        .await?;

        Class::create(
            db,
            "Data Structures",
            "cos212",
            "Computer Science",
            None,
            teacher.id,
        )
        .await?;

        Ok(())
    }
}
