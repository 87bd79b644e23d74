//! Read-side queries over the organization → franchise → location →
//! assignment hierarchy, as consumed by the access-control engine.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// The stored GPS position of a location, when the location exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredPosition {
    /// The location has no configured coordinates.
    Unconfigured,
    /// The location's configured coordinate (latitude, longitude).
    At { latitude: f64, longitude: f64 },
}

/// Scoping and membership queries over the organizational hierarchy.
///
/// All methods are reads; infrastructure failures surface as errors,
/// absent rows as `None`/empty vectors. Role codes are returned as raw
/// strings exactly as persisted; callers parse them into the closed
/// role enums and treat unknown codes as a denial.
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    /// The organization a franchise belongs to, if the franchise exists.
    async fn franchise_organization(&self, franchise_id: Uuid) -> AppResult<Option<Uuid>>;

    /// All franchise ids under an organization.
    async fn franchise_ids_by_organization(&self, organization_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// The franchise a location belongs to, if the location exists.
    async fn location_franchise(&self, location_id: Uuid) -> AppResult<Option<Uuid>>;

    /// All location ids under the given franchises.
    async fn location_ids_by_franchises(&self, franchise_ids: &[Uuid]) -> AppResult<Vec<Uuid>>;

    /// Location ids where the user holds an active assignment.
    async fn assigned_location_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// The distinct franchise ids owning the given locations.
    async fn franchise_ids_by_locations(&self, location_ids: &[Uuid]) -> AppResult<Vec<Uuid>>;

    /// The `role_at_location` code of the user's active assignment at a
    /// location, if one exists.
    async fn active_assignment_role(
        &self,
        user_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<Option<String>>;

    /// The stored GPS position of a location. `None` when the location
    /// itself does not exist.
    async fn location_position(&self, location_id: Uuid) -> AppResult<Option<StoredPosition>>;
}
