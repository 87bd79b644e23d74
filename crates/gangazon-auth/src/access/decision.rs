//! Outcomes of access-control checks.

use uuid::Uuid;

use gangazon_core::error::AppError;
use gangazon_core::result::AppResult;

/// The outcome of a single access check.
///
/// Denials carry a human-readable reason. They are ordinary values,
/// not errors: only infrastructure failures travel as `AppError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(String),
}

impl AccessDecision {
    /// Builds a denial with the given reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny(reason.into())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts a denial into an authorization error.
    pub fn require(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(AppError::authorization(reason)),
        }
    }
}

/// The set of resource ids a principal may see in list operations.
///
/// Callers intersect client-supplied filters with this scope before
/// querying, so a caller can never widen their own visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    /// No restriction. Only the universal permission grant produces this.
    Unrestricted,
    /// Visibility limited to these ids. May be empty.
    Ids(Vec<Uuid>),
}

impl ScopeFilter {
    /// Whether an id falls inside this scope.
    pub fn contains(&self, id: Uuid) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Ids(ids) => ids.contains(&id),
        }
    }

    /// Intersects a client-requested id set with this scope.
    ///
    /// `None` means the client asked for everything, which resolves to
    /// the scope itself.
    pub fn intersect(&self, requested: Option<&[Uuid]>) -> ScopeFilter {
        match (self, requested) {
            (Self::Unrestricted, None) => Self::Unrestricted,
            (Self::Unrestricted, Some(ids)) => Self::Ids(ids.to_vec()),
            (Self::Ids(scope), None) => Self::Ids(scope.clone()),
            (Self::Ids(scope), Some(ids)) => {
                Self::Ids(ids.iter().copied().filter(|id| scope.contains(id)).collect())
            }
        }
    }

    /// Whether the scope admits nothing at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Ids(ids) if ids.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_maps_denials_to_authorization_errors() {
        assert!(AccessDecision::Allow.require().is_ok());
        let err = AccessDecision::deny("not yours").require().unwrap_err();
        assert!(err.is_denial());
    }

    #[test]
    fn intersect_never_widens() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let outside = Uuid::new_v4();
        let scope = ScopeFilter::Ids(vec![a, b]);

        assert_eq!(scope.intersect(None), ScopeFilter::Ids(vec![a, b]));
        assert_eq!(
            scope.intersect(Some(&[a, outside])),
            ScopeFilter::Ids(vec![a])
        );
        assert!(scope.intersect(Some(&[outside])).is_empty());
    }

    #[test]
    fn unrestricted_defers_to_the_request() {
        let a = Uuid::new_v4();
        assert_eq!(
            ScopeFilter::Unrestricted.intersect(Some(&[a])),
            ScopeFilter::Ids(vec![a])
        );
        assert_eq!(
            ScopeFilter::Unrestricted.intersect(None),
            ScopeFilter::Unrestricted
        );
    }
}
