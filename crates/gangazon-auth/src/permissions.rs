//! Effective permission sets resolved at token issuance.

use std::collections::HashSet;

use gangazon_entity::permission::SUPER_ADMIN_CODE;

/// The permissions a user holds within one application scope.
///
/// Holding the `super_admin` permission collapses the set to [`All`]:
/// every permission check passes without consulting individual codes.
///
/// [`All`]: PermissionSet::All
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSet {
    /// Universal grant. Produced by the `super_admin` permission code.
    All,
    /// An explicit set of permission codes.
    Codes(HashSet<String>),
}

impl PermissionSet {
    /// Builds a set from raw permission codes, collapsing to [`All`](Self::All)
    /// when `super_admin` is present.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = HashSet::new();
        for code in codes {
            let code = code.into();
            if code == SUPER_ADMIN_CODE {
                return Self::All;
            }
            set.insert(code);
        }
        Self::Codes(set)
    }

    /// Whether this set satisfies a required permission code.
    pub fn has(&self, code: &str) -> bool {
        match self {
            Self::All => true,
            Self::Codes(codes) => codes.contains(code),
        }
    }

    /// Whether this set satisfies at least one of the required codes.
    pub fn has_any<'a, I>(&self, codes: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            Self::All => true,
            Self::Codes(held) => codes.into_iter().any(|c| held.contains(c)),
        }
    }

    /// Whether this is the universal grant.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The codes to embed in an access token. The universal grant is
    /// carried as the sentinel code itself.
    pub fn to_claim_codes(&self) -> Vec<String> {
        match self {
            Self::All => vec![SUPER_ADMIN_CODE.to_string()],
            Self::Codes(codes) => {
                let mut out: Vec<String> = codes.iter().cloned().collect();
                out.sort();
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_collapses_to_all() {
        let set = PermissionSet::from_codes(["users.read", "super_admin"]);
        assert!(set.is_super_admin());
        assert!(set.has("anything.at.all"));
    }

    #[test]
    fn explicit_codes_match_exactly() {
        let set = PermissionSet::from_codes(["checkins.create", "checkins.read"]);
        assert!(set.has("checkins.create"));
        assert!(!set.has("users.delete"));
        assert!(!set.is_super_admin());
    }

    #[test]
    fn has_any_needs_one_match() {
        let set = PermissionSet::from_codes(["locations.read"]);
        assert!(set.has_any(["locations.write", "locations.read"]));
        assert!(!set.has_any(["users.read", "users.write"]));
    }

    #[test]
    fn claim_codes_are_sorted_and_stable() {
        let set = PermissionSet::from_codes(["b.second", "a.first"]);
        assert_eq!(set.to_claim_codes(), vec!["a.first", "b.second"]);
        assert_eq!(
            PermissionSet::from_codes(["super_admin"]).to_claim_codes(),
            vec!["super_admin"]
        );
    }
}
