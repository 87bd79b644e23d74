//! Role and hierarchy driven access decisions.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use gangazon_core::result::AppResult;
use gangazon_core::traits::hierarchy::HierarchyStore;
use gangazon_core::traits::identity::UserSnapshot;
use gangazon_entity::assignment::LocationRole;
use gangazon_entity::user::Role;

use crate::principal::Principal;

use super::decision::{AccessDecision, ScopeFilter};

/// Computes access decisions over the organizational hierarchy.
///
/// The engine reads through a [`HierarchyStore`] and never mutates
/// anything. A `super_admin` principal is allowed through every check
/// here; the protected-resource layer is enforced separately.
#[derive(Clone)]
pub struct AccessControlEngine {
    store: Arc<dyn HierarchyStore>,
}

impl AccessControlEngine {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    /// Whether the principal may read a franchise.
    ///
    /// Admins see franchises of their own organization; franchisees see
    /// the franchises under their organization; assignment-holder roles
    /// never see franchises directly.
    pub async fn can_access_franchise(
        &self,
        principal: &Principal,
        franchise_id: Uuid,
    ) -> AppResult<AccessDecision> {
        if principal.is_super_admin() {
            return Ok(AccessDecision::Allow);
        }

        match principal.role {
            Role::Admin => {
                let Some(owner) = self.store.franchise_organization(franchise_id).await? else {
                    return Ok(AccessDecision::deny("Franchise not found"));
                };
                if Some(owner) != principal.organization_id {
                    return Ok(AccessDecision::deny(
                        "Franchise does not belong to your organization",
                    ));
                }
                Ok(AccessDecision::Allow)
            }
            Role::Franchisee => {
                let franchise_ids = self.organization_franchise_ids(principal).await?;
                if franchise_ids.contains(&franchise_id) {
                    Ok(AccessDecision::Allow)
                } else {
                    Ok(AccessDecision::deny("You do not have access to this franchise"))
                }
            }
            _ => Ok(AccessDecision::deny(
                "Your role does not grant access to franchises",
            )),
        }
    }

    /// Whether the principal may read a location.
    ///
    /// Organization-scoped roles see locations under their franchises;
    /// assignment-holder roles need an active assignment at the
    /// location.
    pub async fn can_access_location(
        &self,
        principal: &Principal,
        location_id: Uuid,
    ) -> AppResult<AccessDecision> {
        if principal.is_super_admin() {
            return Ok(AccessDecision::Allow);
        }

        if principal.role.is_organization_scoped() {
            let franchise_ids = self.organization_franchise_ids(principal).await?;
            let Some(owner) = self.store.location_franchise(location_id).await? else {
                return Ok(AccessDecision::deny("Location not found"));
            };
            if franchise_ids.contains(&owner) {
                Ok(AccessDecision::Allow)
            } else {
                Ok(AccessDecision::deny(
                    "Location does not belong to your organization",
                ))
            }
        } else {
            let assigned = self.store.assigned_location_ids(principal.user_id).await?;
            if assigned.contains(&location_id) {
                Ok(AccessDecision::Allow)
            } else {
                Ok(AccessDecision::deny("You are not assigned to this location"))
            }
        }
    }

    /// Whether the principal may modify a location.
    ///
    /// Admins and franchisees may modify what they can access. Managers
    /// need an active `manager` assignment at the location. Everyone
    /// else is denied.
    pub async fn can_modify_location(
        &self,
        principal: &Principal,
        location_id: Uuid,
    ) -> AppResult<AccessDecision> {
        if principal.is_super_admin() {
            return Ok(AccessDecision::Allow);
        }

        match principal.role {
            Role::Admin | Role::Franchisee => {
                self.can_access_location(principal, location_id).await
            }
            Role::Manager => {
                let role = self
                    .store
                    .active_assignment_role(principal.user_id, location_id)
                    .await?;
                match role.as_deref() {
                    Some(code) if code == LocationRole::Manager.as_str() => {
                        Ok(AccessDecision::Allow)
                    }
                    _ => Ok(AccessDecision::deny("You are not a manager of this location")),
                }
            }
            _ => Ok(AccessDecision::deny(
                "Your role does not grant permission to modify locations",
            )),
        }
    }

    /// Whether the principal may manage (create, update, deactivate)
    /// another user.
    ///
    /// Admins manage anyone in their organization except other admins.
    /// Franchisees manage anyone in their organization below the
    /// franchisee level. Other roles manage no one.
    pub fn can_manage_user(&self, principal: &Principal, target: &UserSnapshot) -> AccessDecision {
        if principal.is_super_admin() {
            return AccessDecision::Allow;
        }

        let target_role = Role::rank_of(&target.role);

        match principal.role {
            Role::Admin => {
                if target_role == Role::Admin.rank() {
                    return AccessDecision::deny("You cannot manage other administrators");
                }
                if target.organization_id != principal.organization_id {
                    return AccessDecision::deny("User does not belong to your organization");
                }
                AccessDecision::Allow
            }
            Role::Franchisee => {
                if target_role <= Role::Franchisee.rank() {
                    return AccessDecision::deny(
                        "You cannot manage administrators or franchisees",
                    );
                }
                if target.organization_id != principal.organization_id {
                    return AccessDecision::deny("User does not belong to your organization");
                }
                AccessDecision::Allow
            }
            _ => AccessDecision::deny("Your role does not grant permission to manage users"),
        }
    }

    /// Whether the principal may read another user's profile.
    ///
    /// Self-access is always allowed; otherwise the manage rule applies.
    pub fn can_access_user(&self, principal: &Principal, target: &UserSnapshot) -> AccessDecision {
        if principal.user_id == target.id {
            return AccessDecision::Allow;
        }
        self.can_manage_user(principal, target)
    }

    /// Whether a user may be placed at a location at all.
    ///
    /// The location's franchise must belong to the user's organization.
    /// This is an invariant of the data, not a caller privilege, so no
    /// principal bypasses it.
    pub async fn can_assign_user(
        &self,
        target: &UserSnapshot,
        location_id: Uuid,
    ) -> AppResult<AccessDecision> {
        let Some(franchise_id) = self.store.location_franchise(location_id).await? else {
            return Ok(AccessDecision::deny("Location not found"));
        };
        let Some(owner) = self.store.franchise_organization(franchise_id).await? else {
            return Ok(AccessDecision::deny("Franchise not found"));
        };
        if target.organization_id != Some(owner) {
            return Ok(AccessDecision::deny(
                "User does not belong to the franchise's organization",
            ));
        }
        Ok(AccessDecision::Allow)
    }

    /// The location ids visible to the principal for list operations.
    pub async fn location_scope(&self, principal: &Principal) -> AppResult<ScopeFilter> {
        if principal.is_super_admin() {
            return Ok(ScopeFilter::Unrestricted);
        }

        let ids = if principal.role.is_organization_scoped() {
            let franchise_ids = self.organization_franchise_ids(principal).await?;
            self.store.location_ids_by_franchises(&franchise_ids).await?
        } else if principal.role.is_assignment_holder() {
            self.store.assigned_location_ids(principal.user_id).await?
        } else {
            Vec::new()
        };

        Ok(ScopeFilter::Ids(ids))
    }

    /// The franchise ids visible to the principal for list operations.
    ///
    /// Assignment-holder roles see the franchises owning their assigned
    /// locations, de-duplicated.
    pub async fn franchise_scope(&self, principal: &Principal) -> AppResult<ScopeFilter> {
        if principal.is_super_admin() {
            return Ok(ScopeFilter::Unrestricted);
        }

        let ids = if principal.role.is_organization_scoped() {
            self.organization_franchise_ids(principal).await?
        } else if principal.role.is_assignment_holder() {
            let location_ids = self.store.assigned_location_ids(principal.user_id).await?;
            if location_ids.is_empty() {
                Vec::new()
            } else {
                let franchise_ids = self.store.franchise_ids_by_locations(&location_ids).await?;
                let mut seen = HashSet::new();
                franchise_ids
                    .into_iter()
                    .filter(|id| seen.insert(*id))
                    .collect()
            }
        } else {
            Vec::new()
        };

        Ok(ScopeFilter::Ids(ids))
    }

    async fn organization_franchise_ids(&self, principal: &Principal) -> AppResult<Vec<Uuid>> {
        match principal.organization_id {
            Some(organization_id) => {
                self.store.franchise_ids_by_organization(organization_id).await
            }
            None => Ok(Vec::new()),
        }
    }
}

impl std::fmt::Debug for AccessControlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControlEngine").finish()
    }
}
