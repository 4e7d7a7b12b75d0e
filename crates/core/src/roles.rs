//! Role names carried in the identity provider's role claim.

/// Tenant administrators: may run onboarding and company offboarding.
pub const ROLE_ADMIN: &str = "admin";

/// Regular tenant members.
pub const ROLE_EMPLOYEE: &str = "employee";

/// Check whether a role list grants administrator access.
pub fn is_admin(roles: &[String]) -> bool {
    roles.iter().any(|r| r.eq_ignore_ascii_case(ROLE_ADMIN))
}
