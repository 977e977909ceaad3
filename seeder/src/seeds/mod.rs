pub mod class;
pub mod student_profile;
pub mod user;
