//! The authenticated caller as seen by authorization checks.

use uuid::Uuid;

use gangazon_entity::user::Role;

use crate::jwt::AccessClaims;
use crate::permissions::PermissionSet;

/// Identity and scope extracted from a verified access token.
///
/// Everything authorization needs is carried here so the access
/// engine never has to re-read the user row mid-request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub franchise_id: Option<Uuid>,
    /// The application scope the token was issued for, if any.
    pub application_id: Option<Uuid>,
    pub permissions: PermissionSet,
}

impl Principal {
    /// Whether the caller holds the universal permission grant.
    pub fn is_super_admin(&self) -> bool {
        self.permissions.is_super_admin()
    }

    /// Whether the caller holds a permission code.
    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.has(code)
    }
}

impl From<AccessClaims> for Principal {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            organization_id: claims.organization_id,
            franchise_id: claims.franchise_id,
            application_id: claims.application_id,
            permissions: PermissionSet::from_codes(claims.permissions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::TokenType;
    use chrono::Utc;

    fn claims(role: Role, permissions: Vec<String>) -> AccessClaims {
        AccessClaims {
            sub: Uuid::new_v4(),
            email: "someone@gangazon.example".into(),
            role,
            organization_id: Some(Uuid::new_v4()),
            franchise_id: None,
            application_id: None,
            permissions,
            iss: "gangazon-auth-service".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
            token_type: TokenType::Access,
        }
    }

    #[test]
    fn super_admin_claim_becomes_universal_grant() {
        let principal = Principal::from(claims(Role::Admin, vec!["super_admin".into()]));
        assert!(principal.is_super_admin());
        assert!(principal.has_permission("any.code"));
    }

    #[test]
    fn ordinary_claims_keep_their_codes() {
        let principal = Principal::from(claims(Role::Employee, vec!["checkins.create".into()]));
        assert!(!principal.is_super_admin());
        assert!(principal.has_permission("checkins.create"));
        assert!(!principal.has_permission("users.delete"));
    }
}
