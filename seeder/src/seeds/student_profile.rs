use async_trait::async_trait;
use db::models::{
    class,
    student_profile::Model as StudentProfile,
    user::{self, Role},
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::seed::Seeder;

/// Gives every seeded student a profile (with a fresh scan code) and enrolls
/// them all into the first class. Scan codes are printed so a demo QR capture
/// can be driven straight from the seeder output.
pub struct StudentProfileSeeder;

#[async_trait]
impl Seeder for StudentProfileSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let students = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Student))
            .all(db)
            .await?;

        let first_class = class::Entity::find()
            .one(db)
            .await?
            .ok_or_else(|| DbErr::Custom("no class seeded".to_owned()))?;

        for (i, student) in students.iter().enumerate() {
            let student_number = format!("STU{:04}", i + 1);
            let profile = StudentProfile::create(db, student.id, &student_number).await?;
            class::Model::enroll_student(db, first_class.id, profile.id).await?;
            println!(
                "  {} ({}) scan code: {}",
                student.username, student_number, profile.scan_code
            );
        }

        Ok(())
    }
}
