//! OAuth scope reconciliation.
//!
//! # Purpose
//! Compares the scopes a merchant session has granted against the scopes the
//! app declares as required, and produces a stable report for the admin UI.
//!
//! # Notes
//! Pure and request-scoped: no I/O, no shared state, identical inputs yield
//! structurally identical reports. Ordering of the `required` declaration is
//! preserved in both subsets so the UI renders deterministically.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

/// Result of diffing granted scopes against the required declaration.
///
/// Invariants: `granted` and `missing` partition `required` (as a set, no
/// element appears in both), and `granted_count == granted.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScopeReport {
    /// Required scopes present in the session grant, in declaration order.
    pub granted: Vec<String>,
    /// Required scopes absent from the session grant, in declaration order.
    pub missing: Vec<String>,
    pub granted_count: usize,
    pub total_required: usize,
}

impl ScopeReport {
    /// True when every required scope has been granted.
    ///
    /// Consumers must disable dependent actions (e.g. connecting to a
    /// downstream service) while this is false.
    pub fn complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Diff the granted scope set against the ordered required declaration.
///
/// Each occurrence in `required` is evaluated independently against
/// membership, so duplicate declarations are counted twice rather than
/// de-duplicated. An empty `required` is the valid vacuous state: both
/// subsets empty and `total_required == 0`.
pub fn reconcile(granted: &[String], required: &[String]) -> ScopeReport {
    let grant_set: HashSet<&str> = granted.iter().map(String::as_str).collect();
    let mut present = Vec::new();
    let mut missing = Vec::new();
    for scope in required {
        if grant_set.contains(scope.as_str()) {
            present.push(scope.clone());
        } else {
            missing.push(scope.clone());
        }
    }
    ScopeReport {
        granted_count: present.len(),
        total_required: required.len(),
        granted: present,
        missing,
    }
}

/// Split a session's comma-separated scope grant into a scope list.
///
/// The platform stores the grant as a single comma-joined string on the
/// session record; an absent or empty grant yields no scopes.
pub fn split_scope_grant(grant: Option<&str>) -> Vec<String> {
    grant
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|scope| !scope.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn partitions_required_preserving_order() {
        let granted = scopes(&["read_products", "read_orders"]);
        let required = scopes(&[
            "read_all_orders",
            "read_products",
            "read_customers",
            "read_orders",
            "read_inventory",
        ]);
        let report = reconcile(&granted, &required);
        assert_eq!(report.granted, scopes(&["read_products", "read_orders"]));
        assert_eq!(
            report.missing,
            scopes(&["read_all_orders", "read_customers", "read_inventory"])
        );
        assert_eq!(report.granted_count, 2);
        assert_eq!(report.total_required, 5);
        assert!(!report.complete());
    }

    #[test]
    fn granted_and_missing_cover_required_disjointly() {
        let granted = scopes(&["a", "c"]);
        let required = scopes(&["a", "b", "c", "d"]);
        let report = reconcile(&granted, &required);
        let mut union: Vec<String> = report.granted.clone();
        union.extend(report.missing.clone());
        let union: HashSet<_> = union.into_iter().collect();
        let required_set: HashSet<_> = required.iter().cloned().collect();
        assert_eq!(union, required_set);
        for scope in &report.granted {
            assert!(!report.missing.contains(scope));
        }
    }

    #[test]
    fn nothing_granted_means_everything_missing() {
        let required = scopes(&["read_products", "write_products"]);
        let report = reconcile(&[], &required);
        assert_eq!(report.missing, required);
        assert_eq!(report.granted_count, 0);
        assert!(!report.complete());
    }

    #[test]
    fn empty_required_is_complete_by_vacuity() {
        let report = reconcile(&scopes(&["read_products"]), &[]);
        assert!(report.granted.is_empty());
        assert!(report.missing.is_empty());
        assert_eq!(report.granted_count, 0);
        assert_eq!(report.total_required, 0);
        assert!(report.complete());
    }

    #[test]
    fn duplicate_required_entries_count_independently() {
        let granted = scopes(&["read_products"]);
        let required = scopes(&["read_products", "read_products", "read_orders"]);
        let report = reconcile(&granted, &required);
        assert_eq!(report.granted_count, 2);
        assert_eq!(report.total_required, 3);
        assert_eq!(report.missing, scopes(&["read_orders"]));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let granted = scopes(&["read_orders", "read_products"]);
        let required = scopes(&["read_products", "read_customers"]);
        let first = reconcile(&granted, &required);
        let second = reconcile(&granted, &required);
        assert_eq!(first, second);
    }

    #[test]
    fn fully_granted_reports_complete() {
        let granted = scopes(&["read_products", "read_orders", "extra_scope"]);
        let required = scopes(&["read_products", "read_orders"]);
        let report = reconcile(&granted, &required);
        assert!(report.complete());
        assert_eq!(report.granted, required);
    }

    #[test]
    fn split_scope_grant_handles_absent_and_messy_input() {
        assert!(split_scope_grant(None).is_empty());
        assert!(split_scope_grant(Some("")).is_empty());
        assert_eq!(
            split_scope_grant(Some("read_products, read_orders,,")),
            scopes(&["read_products", "read_orders"])
        );
    }
}
