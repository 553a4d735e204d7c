//! Testing utilities for smart-actions
//!
//! Shared grant fixtures and a capturing check observer.

#![allow(missing_docs)]

use parking_lot::Mutex;
use smart_actions::{CheckObserver, CheckRecord, PermissionGrant, PermissionRegistry};
use std::sync::Arc;

/// Grants for a typical HR tenant
pub fn hr_grants() -> Vec<PermissionGrant> {
    vec![
        PermissionGrant::new("Employee Master", "Add, Edit, Search"),
        PermissionGrant::new("Manage Company", "Add, Edit, Delete, Manage Columns"),
        PermissionGrant::new("Leave Register", "Search, advance-search"),
    ]
}

/// Wire body equivalent to [`hr_grants`] plus two malformed rows
pub const HR_GRANTS_JSON: &str = r#"[
    {"FormNameWithExt": "Employee Master", "Action": "Add, Edit, Search"},
    {"FormNameWithExt": "Manage Company", "Action": "Add, Edit, Delete, Manage Columns"},
    {"FormNameWithExt": "Leave Register", "Action": "Search, advance-search"},
    {"FormNameWithExt": "", "Action": "Add"},
    {"FormNameWithExt": "Payroll", "Action": null}
]"#;

/// Registry already loaded with [`hr_grants`]
pub fn loaded_registry() -> PermissionRegistry {
    let registry = PermissionRegistry::new();
    registry.load(&hr_grants());
    registry
}

/// One captured check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCheck {
    pub form: String,
    pub action: String,
    pub allowed: bool,
    pub generation: u64,
}

/// Observer that records every check for later assertions
#[derive(Debug, Clone, Default)]
pub struct CapturingObserver {
    checks: Arc<Mutex<Vec<CapturedCheck>>>,
}

impl CapturingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks seen so far, oldest first
    pub fn checks(&self) -> Vec<CapturedCheck> {
        self.checks.lock().clone()
    }
}

impl CheckObserver for CapturingObserver {
    fn on_check(&self, check: &CheckRecord<'_>) {
        self.checks.lock().push(CapturedCheck {
            form: check.form.to_string(),
            action: check.action.to_string(),
            allowed: check.allowed,
            generation: check.generation,
        });
    }
}
