//! Scope narrowing for list operations.

use uuid::Uuid;

use gangazon_auth::access::ScopeFilter;

/// How a list query should run after intersecting the caller's
/// requested filter with their accessible scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Query without an id restriction.
    All,
    /// Query restricted to these ids.
    Ids(Vec<Uuid>),
    /// Nothing is visible; respond with an empty page without querying,
    /// so an out-of-scope filter leaks nothing.
    Empty,
}

/// Intersects a caller-requested id filter with their accessible scope.
///
/// `None` for `requested` means the caller asked for everything they
/// can see.
pub fn resolve_list_scope(scope: &ScopeFilter, requested: Option<&[Uuid]>) -> ListScope {
    match scope.intersect(requested) {
        ScopeFilter::Unrestricted => ListScope::All,
        ScopeFilter::Ids(ids) if ids.is_empty() => ListScope::Empty,
        ScopeFilter::Ids(ids) => ListScope::Ids(ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_intersection_yields_no_query() {
        let scope = ScopeFilter::Ids(vec![Uuid::new_v4()]);
        assert_eq!(
            resolve_list_scope(&scope, Some(&[Uuid::new_v4()])),
            ListScope::Empty
        );
    }

    #[test]
    fn unrestricted_with_no_filter_queries_everything() {
        assert_eq!(
            resolve_list_scope(&ScopeFilter::Unrestricted, None),
            ListScope::All
        );
    }

    #[test]
    fn filter_is_narrowed_to_scope() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let scope = ScopeFilter::Ids(vec![a, b]);
        assert_eq!(
            resolve_list_scope(&scope, Some(&[b])),
            ListScope::Ids(vec![b])
        );
        assert_eq!(
            resolve_list_scope(&scope, None),
            ListScope::Ids(vec![a, b])
        );
    }
}
