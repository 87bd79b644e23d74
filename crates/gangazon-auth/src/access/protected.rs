//! System-resource protection.
//!
//! A handful of seed rows anchor the platform: the head-office
//! franchise, the admin panel application, and the universal
//! permission. No caller may mutate or delete them, the universal
//! grant included.

use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;
use gangazon_entity::application::Application;
use gangazon_entity::franchise::Franchise;
use gangazon_entity::permission::Permission;

/// Rejects mutation of the head-office franchise.
pub fn ensure_franchise_mutable(franchise: &Franchise) -> AppResult<()> {
    if franchise.is_system() {
        return Err(AppError::protected_resource(format!(
            "Franchise '{}' is a protected system resource and cannot be modified",
            franchise.code
        )));
    }
    Ok(())
}

/// Rejects mutation of the admin panel application.
pub fn ensure_application_mutable(application: &Application) -> AppResult<()> {
    if application.is_system() {
        return Err(AppError::protected_resource(format!(
            "Application '{}' is a protected system resource and cannot be modified",
            application.code
        )));
    }
    Ok(())
}

/// Rejects mutation of the universal permission.
pub fn ensure_permission_mutable(permission: &Permission) -> AppResult<()> {
    if permission.is_system() {
        return Err(AppError::protected_resource(format!(
            "Permission '{}' is a protected system resource and cannot be modified",
            permission.code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gangazon_core::error::ErrorKind;
    use gangazon_entity::application::SYSTEM_APPLICATION_CODE;
    use gangazon_entity::franchise::{FranchiseStatus, SYSTEM_FRANCHISE_CODE};
    use uuid::Uuid;

    fn franchise(code: &str) -> Franchise {
        Franchise {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            code: code.to_string(),
            name: "Test".into(),
            status: FranchiseStatus::Active,
            max_locations: 10,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn head_office_is_immutable() {
        let err = ensure_franchise_mutable(&franchise(SYSTEM_FRANCHISE_CODE)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectedResource);
    }

    #[test]
    fn ordinary_franchises_are_mutable() {
        assert!(ensure_franchise_mutable(&franchise("NORTH_01")).is_ok());
    }

    #[test]
    fn admin_panel_is_immutable() {
        let app = Application {
            id: Uuid::new_v4(),
            code: SYSTEM_APPLICATION_CODE.to_string(),
            name: "Admin Panel".into(),
            description: None,
            api_key: "ganz_test".into(),
            redirect_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = ensure_application_mutable(&app).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectedResource);
    }
}
