//! Role guards for handlers.

use learnhub_core::error::AppError;
use learnhub_entity::user::UserRole;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    require_role(auth, UserRole::Admin)
}

/// Checks that the authenticated user's role is at least `minimum`.
pub fn require_role(auth: &AuthUser, minimum: UserRole) -> Result<(), AppError> {
    if !auth.role.has_at_least(&minimum) {
        return Err(AppError::authorization(format!(
            "{} access required",
            minimum.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use learnhub_core::error::ErrorKind;
    use learnhub_service::context::RequestContext;

    use super::*;

    fn user(role: UserRole) -> AuthUser {
        AuthUser(RequestContext::new("auth0|x", role, "X"))
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(UserRole::Admin)).is_ok());
        let err = require_admin(&user(UserRole::Instructor)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_require_role_hierarchy() {
        assert!(require_role(&user(UserRole::Admin), UserRole::Instructor).is_ok());
        assert!(require_role(&user(UserRole::Instructor), UserRole::Instructor).is_ok());
        assert!(require_role(&user(UserRole::Student), UserRole::Instructor).is_err());
    }
}
