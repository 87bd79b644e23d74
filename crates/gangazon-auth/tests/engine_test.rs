//! Access-control engine decisions over an in-memory hierarchy.

mod helpers;

use std::sync::Arc;

use uuid::Uuid;

use gangazon_auth::access::{AccessControlEngine, ScopeFilter};
use gangazon_entity::user::Role;
use helpers::{FakeHierarchy, principal, snapshot, super_admin};

fn engine(hierarchy: FakeHierarchy) -> AccessControlEngine {
    AccessControlEngine::new(Arc::new(hierarchy))
}

#[tokio::test]
async fn admin_sees_franchises_of_own_organization_only() {
    let org = Uuid::new_v4();
    let other_org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let mine = hierarchy.add_franchise(org);
    let theirs = hierarchy.add_franchise(other_org);
    let engine = engine(hierarchy);

    let admin = principal(Role::Admin, Some(org));

    assert!(engine
        .can_access_franchise(&admin, mine)
        .await
        .unwrap()
        .is_allowed());
    assert!(!engine
        .can_access_franchise(&admin, theirs)
        .await
        .unwrap()
        .is_allowed());
    assert!(!engine
        .can_access_franchise(&admin, Uuid::new_v4())
        .await
        .unwrap()
        .is_allowed());
}

#[tokio::test]
async fn assignment_roles_cannot_read_franchises_directly() {
    let org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(org);
    let engine = engine(hierarchy);

    for role in [Role::Manager, Role::Supervisor, Role::Employee, Role::Viewer] {
        let p = principal(role, Some(org));
        assert!(
            !engine
                .can_access_franchise(&p, franchise)
                .await
                .unwrap()
                .is_allowed(),
            "{role} should not read franchises"
        );
    }
}

#[tokio::test]
async fn employee_needs_active_assignment_at_the_location() {
    let org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(org);
    let assigned = hierarchy.add_location(franchise);
    let unassigned = hierarchy.add_location(franchise);

    let employee = principal(Role::Employee, Some(org));
    hierarchy.assign(employee.user_id, assigned, "employee");
    let engine = engine(hierarchy);

    assert!(engine
        .can_access_location(&employee, assigned)
        .await
        .unwrap()
        .is_allowed());
    assert!(!engine
        .can_access_location(&employee, unassigned)
        .await
        .unwrap()
        .is_allowed());
}

#[tokio::test]
async fn manager_modifies_only_where_assigned_as_manager() {
    let org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(org);
    let managed = hierarchy.add_location(franchise);
    let worked = hierarchy.add_location(franchise);

    let manager = principal(Role::Manager, Some(org));
    hierarchy.assign(manager.user_id, managed, "manager");
    hierarchy.assign(manager.user_id, worked, "employee");
    let engine = engine(hierarchy);

    assert!(engine
        .can_modify_location(&manager, managed)
        .await
        .unwrap()
        .is_allowed());
    // Assigned, but not as manager.
    assert!(!engine
        .can_modify_location(&manager, worked)
        .await
        .unwrap()
        .is_allowed());
}

#[tokio::test]
async fn franchisee_modifies_locations_under_own_franchises() {
    let org = Uuid::new_v4();
    let other_org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(org);
    let foreign = hierarchy.add_franchise(other_org);
    let location = hierarchy.add_location(franchise);
    let foreign_location = hierarchy.add_location(foreign);
    let engine = engine(hierarchy);

    let franchisee = principal(Role::Franchisee, Some(org));

    assert!(engine
        .can_modify_location(&franchisee, location)
        .await
        .unwrap()
        .is_allowed());
    assert!(!engine
        .can_modify_location(&franchisee, foreign_location)
        .await
        .unwrap()
        .is_allowed());
}

#[tokio::test]
async fn super_admin_bypasses_hierarchy_checks() {
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(Uuid::new_v4());
    let location = hierarchy.add_location(franchise);
    let engine = engine(hierarchy);

    // No organization at all, still allowed everywhere.
    let root = super_admin(None);

    assert!(engine
        .can_access_franchise(&root, franchise)
        .await
        .unwrap()
        .is_allowed());
    assert!(engine
        .can_modify_location(&root, location)
        .await
        .unwrap()
        .is_allowed());
    assert_eq!(
        engine.location_scope(&root).await.unwrap(),
        ScopeFilter::Unrestricted
    );
}

#[test]
fn admin_cannot_manage_other_admins() {
    let org = Uuid::new_v4();
    let engine = engine(FakeHierarchy::default());
    let admin = principal(Role::Admin, Some(org));

    let peer = snapshot("admin", Some(org));
    assert!(!engine.can_manage_user(&admin, &peer).is_allowed());

    let employee = snapshot("employee", Some(org));
    assert!(engine.can_manage_user(&admin, &employee).is_allowed());

    let outsider = snapshot("employee", Some(Uuid::new_v4()));
    assert!(!engine.can_manage_user(&admin, &outsider).is_allowed());
}

#[test]
fn franchisee_cannot_manage_upward() {
    let org = Uuid::new_v4();
    let engine = engine(FakeHierarchy::default());
    let franchisee = principal(Role::Franchisee, Some(org));

    assert!(!engine
        .can_manage_user(&franchisee, &snapshot("admin", Some(org)))
        .is_allowed());
    assert!(!engine
        .can_manage_user(&franchisee, &snapshot("franchisee", Some(org)))
        .is_allowed());
    assert!(engine
        .can_manage_user(&franchisee, &snapshot("manager", Some(org)))
        .is_allowed());
}

#[test]
fn unknown_role_codes_are_treated_as_least_privilege() {
    let org = Uuid::new_v4();
    let engine = engine(FakeHierarchy::default());
    let admin = principal(Role::Admin, Some(org));

    // An unrecognized persisted code ranks below everyone, so an admin
    // may still manage the account, and it is never mistaken for admin.
    let odd = snapshot("intern", Some(org));
    assert!(engine.can_manage_user(&admin, &odd).is_allowed());
}

#[test]
fn self_access_is_always_allowed() {
    let org = Uuid::new_v4();
    let engine = engine(FakeHierarchy::default());
    let employee = principal(Role::Employee, Some(org));

    let mut own = snapshot("employee", Some(org));
    own.id = employee.user_id;

    assert!(engine.can_access_user(&employee, &own).is_allowed());
    assert!(!engine
        .can_access_user(&employee, &snapshot("employee", Some(org)))
        .is_allowed());
}

#[tokio::test]
async fn users_are_only_assignable_under_their_own_organization() {
    let org = Uuid::new_v4();
    let other_org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(org);
    let location = hierarchy.add_location(franchise);
    let engine = engine(hierarchy);

    let local = snapshot("employee", Some(org));
    assert!(engine
        .can_assign_user(&local, location)
        .await
        .unwrap()
        .is_allowed());

    let outsider = snapshot("employee", Some(other_org));
    assert!(!engine
        .can_assign_user(&outsider, location)
        .await
        .unwrap()
        .is_allowed());

    // No organization at all also fails the invariant.
    let unaffiliated = snapshot("employee", None);
    assert!(!engine
        .can_assign_user(&unaffiliated, location)
        .await
        .unwrap()
        .is_allowed());

    assert!(!engine
        .can_assign_user(&local, Uuid::new_v4())
        .await
        .unwrap()
        .is_allowed());
}

#[tokio::test]
async fn employee_franchise_scope_is_derived_from_assignments() {
    let org = Uuid::new_v4();
    let mut hierarchy = FakeHierarchy::default();
    let franchise_a = hierarchy.add_franchise(org);
    let franchise_b = hierarchy.add_franchise(org);
    let loc_a1 = hierarchy.add_location(franchise_a);
    let loc_a2 = hierarchy.add_location(franchise_a);
    let _loc_b = hierarchy.add_location(franchise_b);

    let employee = principal(Role::Employee, Some(org));
    hierarchy.assign(employee.user_id, loc_a1, "employee");
    hierarchy.assign(employee.user_id, loc_a2, "employee");
    let engine = engine(hierarchy);

    // Two assignments in the same franchise collapse to one id.
    match engine.franchise_scope(&employee).await.unwrap() {
        ScopeFilter::Ids(ids) => assert_eq!(ids, vec![franchise_a]),
        other => panic!("unexpected scope {other:?}"),
    }
}

#[tokio::test]
async fn unassigned_employee_scope_is_empty_not_an_error() {
    let mut hierarchy = FakeHierarchy::default();
    let franchise = hierarchy.add_franchise(Uuid::new_v4());
    hierarchy.add_location(franchise);
    let engine = engine(hierarchy);

    let employee = principal(Role::Employee, None);
    assert!(engine.location_scope(&employee).await.unwrap().is_empty());
    assert!(engine.franchise_scope(&employee).await.unwrap().is_empty());
}
