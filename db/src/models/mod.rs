pub mod attendance_record;
pub mod attendance_session;
pub mod class;
pub mod class_student;
pub mod student_profile;
pub mod user;
