pub mod m202601120001_create_users;
pub mod m202601120002_create_classes;
pub mod m202601120003_create_student_profiles;
pub mod m202601120004_create_class_students;
pub mod m202601120005_create_attendance;
