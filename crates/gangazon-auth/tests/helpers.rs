//! In-memory store doubles for engine and token lifecycle tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gangazon_auth::Principal;
use gangazon_auth::permissions::PermissionSet;
use gangazon_core::config::auth::AuthConfig;
use gangazon_core::result::AppResult;
use gangazon_core::traits::hierarchy::{HierarchyStore, StoredPosition};
use gangazon_core::traits::identity::{IdentityStore, UserSnapshot};
use gangazon_core::traits::token_store::{RefreshTokenStore, StoredRefreshToken};
use gangazon_entity::user::Role;

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        access_secret: "test-access-secret".into(),
        refresh_secret: "test-refresh-secret".into(),
        access_ttl_minutes: 30,
        refresh_ttl_days: 7,
        issuer: "gangazon-auth-service".into(),
    }
}

pub fn principal(role: Role, organization_id: Option<Uuid>) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        email: format!("{}@gangazon.example", role.as_str()),
        role,
        organization_id,
        franchise_id: None,
        application_id: None,
        permissions: PermissionSet::from_codes(Vec::<String>::new()),
    }
}

pub fn super_admin(organization_id: Option<Uuid>) -> Principal {
    let mut p = principal(Role::Admin, organization_id);
    p.permissions = PermissionSet::from_codes(["super_admin"]);
    p
}

pub fn snapshot(role: &str, organization_id: Option<Uuid>) -> UserSnapshot {
    UserSnapshot {
        id: Uuid::new_v4(),
        email: format!("{role}@gangazon.example"),
        role: role.to_string(),
        organization_id,
        franchise_id: None,
        is_active: true,
    }
}

/// A small in-memory organization → franchise → location hierarchy.
#[derive(Default)]
pub struct FakeHierarchy {
    /// franchise id -> owning organization.
    pub franchises: HashMap<Uuid, Uuid>,
    /// location id -> owning franchise.
    pub locations: HashMap<Uuid, Uuid>,
    /// (user, location) -> active role_at_location code.
    pub assignments: HashMap<(Uuid, Uuid), String>,
    /// location id -> stored GPS position.
    pub positions: HashMap<Uuid, StoredPosition>,
}

impl FakeHierarchy {
    pub fn add_franchise(&mut self, organization_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.franchises.insert(id, organization_id);
        id
    }

    pub fn add_location(&mut self, franchise_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.locations.insert(id, franchise_id);
        self.positions.insert(id, StoredPosition::Unconfigured);
        id
    }

    pub fn assign(&mut self, user_id: Uuid, location_id: Uuid, role: &str) {
        self.assignments
            .insert((user_id, location_id), role.to_string());
    }

    pub fn place(&mut self, location_id: Uuid, latitude: f64, longitude: f64) {
        self.positions.insert(
            location_id,
            StoredPosition::At {
                latitude,
                longitude,
            },
        );
    }
}

#[async_trait]
impl HierarchyStore for FakeHierarchy {
    async fn franchise_organization(&self, franchise_id: Uuid) -> AppResult<Option<Uuid>> {
        Ok(self.franchises.get(&franchise_id).copied())
    }

    async fn franchise_ids_by_organization(&self, organization_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .franchises
            .iter()
            .filter(|(_, org)| **org == organization_id)
            .map(|(id, _)| *id)
            .collect())
    }

    async fn location_franchise(&self, location_id: Uuid) -> AppResult<Option<Uuid>> {
        Ok(self.locations.get(&location_id).copied())
    }

    async fn location_ids_by_franchises(&self, franchise_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        Ok(self
            .locations
            .iter()
            .filter(|(_, fr)| franchise_ids.contains(fr))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn assigned_location_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .assignments
            .keys()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, location)| *location)
            .collect())
    }

    async fn franchise_ids_by_locations(&self, location_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        Ok(self
            .locations
            .iter()
            .filter(|(id, _)| location_ids.contains(id))
            .map(|(_, fr)| *fr)
            .collect())
    }

    async fn active_assignment_role(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<Option<String>> {
        Ok(self.assignments.get(&(user_id, location_id)).cloned())
    }

    async fn location_position(&self, location_id: Uuid) -> AppResult<Option<StoredPosition>> {
        Ok(self.positions.get(&location_id).copied())
    }
}

/// In-memory users and permission grants.
#[derive(Default)]
pub struct FakeIdentities {
    pub users: Mutex<HashMap<Uuid, UserSnapshot>>,
    /// (user, application scope) -> permission codes.
    pub grants: Mutex<HashMap<(Uuid, Option<Uuid>), Vec<String>>>,
}

impl FakeIdentities {
    pub fn add_user(&self, user: UserSnapshot) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn grant(&self, user_id: Uuid, application_id: Option<Uuid>, codes: &[&str]) {
        self.grants.lock().unwrap().insert(
            (user_id, application_id),
            codes.iter().map(|c| c.to_string()).collect(),
        );
    }

    pub fn deactivate(&self, user_id: Uuid) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.is_active = false;
        }
    }

    pub fn revoke_all(&self, user_id: Uuid) {
        self.grants
            .lock()
            .unwrap()
            .retain(|(user, _), _| *user != user_id);
    }
}

#[async_trait]
impl IdentityStore for FakeIdentities {
    async fn user_by_id(&self, user_id: Uuid) -> AppResult<Option<UserSnapshot>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<UserSnapshot>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn permission_codes(
        &self,
        user_id: Uuid,
        application_id: Option<Uuid>,
    ) -> AppResult<Vec<String>> {
        Ok(self
            .grants
            .lock()
            .unwrap()
            .get(&(user_id, application_id))
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory refresh token rows keyed by the raw token string.
#[derive(Default)]
pub struct FakeRefreshTokens {
    pub rows: Mutex<HashMap<String, StoredRefreshToken>>,
}

impl FakeRefreshTokens {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Backdates a stored row so it reads as expired.
    pub fn force_expire(&self, token: &str) {
        if let Some(row) = self.rows.lock().unwrap().get_mut(token) {
            row.expires_at = Utc::now() - chrono::Duration::hours(1);
        }
    }
}

#[async_trait]
impl RefreshTokenStore for FakeRefreshTokens {
    async fn store(
        &self,
        user_id: Uuid,
        application_id: Option<Uuid>,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.rows.lock().unwrap().insert(
            token.to_string(),
            StoredRefreshToken {
                id: Uuid::new_v4(),
                user_id,
                application_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<StoredRefreshToken>> {
        Ok(self.rows.lock().unwrap().get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(token).is_some())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.expires_at > now);
        Ok((before - rows.len()) as u64)
    }
}
