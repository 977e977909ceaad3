use db::models::user::Role;

/// The resolved caller of a service operation: who they are and what they
/// may do. Built by the api layer from verified JWT claims; services never
/// look at tokens or headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[inline]
    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    #[inline]
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}
