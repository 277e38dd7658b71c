//! Well-known role name constants.
//!
//! Roles arrive as opaque strings inside the caller's access token. Only the
//! three below get a dedicated navigation table; anything else is treated as
//! an unknown role and sees the shared items only.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_STUDENT: &str = "student";

/// Roles with a dedicated navigation menu.
pub const KNOWN_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT];

/// Suffix appended to a role to form its menu location key.
const NAVIGATION_LOCATION_SUFFIX: &str = "_navigation";

/// Returns `true` if the role has a dedicated navigation menu.
pub fn is_known_role(role: &str) -> bool {
    KNOWN_ROLES.contains(&role)
}

/// Menu location key for a role, e.g. `"admin"` -> `"admin_navigation"`.
pub fn navigation_location(role: &str) -> String {
    format!("{role}{NAVIGATION_LOCATION_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_location() {
        assert_eq!(navigation_location(ROLE_ADMIN), "admin_navigation");
        assert_eq!(navigation_location(ROLE_INSTRUCTOR), "instructor_navigation");
        assert_eq!(navigation_location(ROLE_STUDENT), "student_navigation");
    }

    #[test]
    fn test_known_roles() {
        assert!(is_known_role("admin"));
        assert!(is_known_role("student"));
        assert!(!is_known_role("guest"));
        assert!(!is_known_role(""));
        assert!(!is_known_role("Admin"));
    }
}
