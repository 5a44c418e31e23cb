//! Well-known role name constants.
//!
//! These must match the `ck_users_role` constraint in
//! `20260301000002_create_users_table.sql`.

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_PARENT: &str = "parent";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_PARENT, ROLE_TEACHER, ROLE_ADMIN];

/// Roles a user may pick for themselves at registration.
pub const SELF_REGISTRATION_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_PARENT, ROLE_TEACHER];

/// Roles allowed to oversee linked students.
pub const GUARDIAN_ROLES: &[&str] = &[ROLE_PARENT, ROLE_TEACHER];

/// Validate a role supplied at self-registration.
pub fn validate_registration_role(role: &str) -> Result<(), String> {
    if SELF_REGISTRATION_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            SELF_REGISTRATION_ROLES.join(", ")
        ))
    }
}

/// Whether the role may hold oversight links to students.
pub fn is_guardian_role(role: &str) -> bool {
    GUARDIAN_ROLES.contains(&role)
}
