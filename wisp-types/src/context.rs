use serde::{Deserialize, Serialize};

use crate::models::User;

/// Authenticated session handed to the application at construction.
///
/// Controllers never read ambient storage for the token or the current user;
/// everything they need about "who is logged in" flows through this object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub token: String,
    pub user: User,
}

impl SessionContext {
    pub fn new(token: String, user: User) -> Self {
        Self { token, user }
    }

    pub fn user_id(&self) -> i64 {
        self.user.user_id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin || self.user.role == crate::enums::UserRole::Admin
    }

    pub fn is_banned(&self) -> bool {
        self.user.is_banned
    }

    /// Whether the session user authored the given entity.
    /// Gates the edit/delete affordances on comments.
    pub fn owns(&self, author_id: i64) -> bool {
        self.user.user_id == author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::UserRole;

    fn test_user(id: i64, admin: bool) -> User {
        User {
            user_id: id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            full_name: None,
            bio: None,
            role: if admin { UserRole::Admin } else { UserRole::User },
            is_admin: admin,
            is_banned: false,
        }
    }

    #[test]
    fn test_owns_checks_author_id() {
        let ctx = SessionContext::new("token-abc".to_string(), test_user(7, false));

        assert!(ctx.owns(7));
        assert!(!ctx.owns(8));
    }

    #[test]
    fn test_admin_via_role_or_flag() {
        let admin = SessionContext::new("t".to_string(), test_user(1, true));
        let regular = SessionContext::new("t".to_string(), test_user(2, false));

        assert!(admin.is_admin());
        assert!(!regular.is_admin());

        let mut role_only = test_user(3, false);
        role_only.role = UserRole::Admin;
        assert!(SessionContext::new("t".to_string(), role_only).is_admin());
    }
}
