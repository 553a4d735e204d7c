//! Permission registry
//!
//! Provides [`PermissionRegistry`], the cache that answers "may the user
//! perform action A on form F" from the most recently loaded grant set.
//!
//! # Semantics
//! - `load` replaces the whole map; nothing is merged across calls.
//! - `can` normalizes both arguments with [`crate::normalize()`] and fails
//!   closed: an empty registry or an unknown pair reads as `false`.
//! - Readers that need a consistent view across several checks hold a
//!   [`PermissionSnapshot`]; its generation identifies which `load` it
//!   came from.

use crate::action::StandardAction;
use crate::config::RegistryConfig;
use crate::error::GrantError;
use crate::grant::PermissionGrant;
use crate::normalize::{ActionKey, FormKey};
use crate::observer::{CheckObserver, CheckRecord, NoopObserver};
use crate::source::GrantSource;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Immutable view of one loaded grant set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSnapshot {
    generation: u64,
    permissions: HashMap<FormKey, HashSet<ActionKey>>,
}

impl PermissionSnapshot {
    /// Empty snapshot at generation 0
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from grant rows
    ///
    /// Rows without a form name or an action list are skipped. A form that
    /// appears twice keeps the later row's actions.
    #[must_use]
    pub fn from_grants<'a, I>(grants: I) -> Self
    where
        I: IntoIterator<Item = &'a PermissionGrant>,
    {
        Self::build(grants).0
    }

    fn build<'a, I>(grants: I) -> (Self, usize)
    where
        I: IntoIterator<Item = &'a PermissionGrant>,
    {
        let mut permissions = HashMap::new();
        let mut skipped = 0;

        for grant in grants {
            let Some(form) = grant.form_key().filter(|_| grant.has_action_list()) else {
                skipped += 1;
                continue;
            };
            let actions: HashSet<ActionKey> = grant.action_keys().into_iter().collect();
            permissions.insert(form, actions);
        }

        (
            Self {
                generation: 0,
                permissions,
            },
            skipped,
        )
    }

    /// Generation of the `load` that produced this snapshot
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check a normalized form/action pair
    #[inline]
    #[must_use]
    pub fn contains(&self, form: &FormKey, action: &ActionKey) -> bool {
        self.permissions
            .get(form)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Check a raw form/action pair, normalizing both
    #[inline]
    #[must_use]
    pub fn can(&self, form: &str, action: &str) -> bool {
        self.contains(&FormKey::new(form), &ActionKey::new(action))
    }

    /// Action set granted on a form
    #[inline]
    #[must_use]
    pub fn actions(&self, form: &FormKey) -> Option<&HashSet<ActionKey>> {
        self.permissions.get(form)
    }

    /// Iterate over every form and its action set
    pub fn iter(&self) -> impl Iterator<Item = (&FormKey, &HashSet<ActionKey>)> {
        self.permissions.iter()
    }

    /// Number of forms with grants
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// True before any grant has been loaded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Form/action permission cache
///
/// Owned by a session (see [`crate::PermissionSessions`]) rather than shared
/// process-wide, so one screen's `load` cannot leak into another's checks.
/// Thread-safe: reads clone an `Arc` under a short read lock, and `load`
/// builds the new map before swapping it in.
pub struct PermissionRegistry {
    state: RwLock<Arc<PermissionSnapshot>>,
    observer: Arc<dyn CheckObserver>,
}

impl PermissionRegistry {
    /// Create empty registry with no check diagnostics
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_shared_observer(Arc::new(NoopObserver))
    }

    /// Create empty registry reporting checks to `observer`
    #[inline]
    #[must_use]
    pub fn with_observer(observer: impl CheckObserver + 'static) -> Self {
        Self::with_shared_observer(Arc::new(observer))
    }

    /// Create empty registry sharing an existing observer
    #[inline]
    #[must_use]
    pub fn with_shared_observer(observer: Arc<dyn CheckObserver>) -> Self {
        Self {
            state: RwLock::new(Arc::new(PermissionSnapshot::empty())),
            observer,
        }
    }

    /// Create empty registry configured by `config`
    #[inline]
    #[must_use]
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self::with_shared_observer(config.observer())
    }

    /// Replace all permissions with `grants`
    ///
    /// Rows with a missing or empty `FormNameWithExt` or `Action` are
    /// skipped silently. Forms absent from `grants` are dropped.
    ///
    /// Stricter than a plain split: blank or whitespace-only fields count as
    /// missing, and empty tokens in the action list (`"Add,,Edit"`) are
    /// dropped, so no row can grant the empty action.
    pub fn load<'a, I>(&self, grants: I)
    where
        I: IntoIterator<Item = &'a PermissionGrant>,
    {
        let (mut snapshot, skipped) = PermissionSnapshot::build(grants);
        let forms = snapshot.len();

        let mut state = self.state.write();
        snapshot.generation = state.generation + 1;
        let generation = snapshot.generation;
        *state = Arc::new(snapshot);
        drop(state);

        tracing::debug!(forms, skipped, generation, "loaded permission grants");
    }

    /// Fetch grants from `source` and load them
    ///
    /// # Errors
    /// Returns the source's error; the current permissions are left in place
    pub async fn refresh(&self, source: &dyn GrantSource) -> Result<(), GrantError> {
        match source.fetch_grants().await {
            Ok(grants) => {
                self.load(&grants);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Permission refresh failed, keeping generation {}: {}",
                    self.generation(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Drop every permission
    pub fn clear(&self) {
        self.load(std::iter::empty());
    }

    /// Check whether `action` is permitted on `form`
    ///
    /// Both arguments are normalized. Returns `false` if nothing is loaded
    /// or the pair is unknown.
    #[must_use]
    pub fn can(&self, form: &str, action: &str) -> bool {
        self.check(&FormKey::new(form), &ActionKey::new(action))
    }

    fn check(&self, form: &FormKey, action: &ActionKey) -> bool {
        let snapshot = self.snapshot();
        let allowed = snapshot.contains(form, action);
        self.observer.on_check(&CheckRecord {
            form,
            action,
            allowed,
            generation: snapshot.generation(),
        });
        allowed
    }

    /// Check a standard action on `form`
    #[inline]
    #[must_use]
    pub fn can_standard(&self, form: &str, action: StandardAction) -> bool {
        self.check(&FormKey::new(form), &action.key())
    }

    /// `can(form, "add")`
    #[inline]
    #[must_use]
    pub fn can_add(&self, form: &str) -> bool {
        self.can_standard(form, StandardAction::Add)
    }

    /// `can(form, "edit")`
    #[inline]
    #[must_use]
    pub fn can_edit(&self, form: &str) -> bool {
        self.can_standard(form, StandardAction::Edit)
    }

    /// `can(form, "delete")`
    #[inline]
    #[must_use]
    pub fn can_delete(&self, form: &str) -> bool {
        self.can_standard(form, StandardAction::Delete)
    }

    /// `can(form, "search")`
    #[inline]
    #[must_use]
    pub fn can_search(&self, form: &str) -> bool {
        self.can_standard(form, StandardAction::Search)
    }

    /// `can(form, "manage-columns")`
    #[inline]
    #[must_use]
    pub fn can_manage_columns(&self, form: &str) -> bool {
        self.can_standard(form, StandardAction::ManageColumns)
    }

    /// `can(form, "advance-search")`
    #[inline]
    #[must_use]
    pub fn can_advanced_search(&self, form: &str) -> bool {
        self.can_standard(form, StandardAction::AdvanceSearch)
    }

    /// Per-form view for gating several controls on one screen
    #[inline]
    #[must_use]
    pub fn form(&self, form: &str) -> FormPermissions<'_> {
        FormPermissions {
            registry: self,
            form: FormKey::new(form),
        }
    }

    /// Sorted actions granted on `form`
    #[must_use]
    pub fn allowed_actions(&self, form: &str) -> Vec<ActionKey> {
        let snapshot = self.snapshot();
        let mut actions: Vec<_> = snapshot
            .actions(&FormKey::new(form))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        actions.sort();
        actions
    }

    /// Sorted forms with grants
    #[must_use]
    pub fn forms(&self) -> Vec<FormKey> {
        let snapshot = self.snapshot();
        let mut forms: Vec<_> = snapshot.iter().map(|(form, _)| form.clone()).collect();
        forms.sort();
        forms
    }

    /// Current grant set
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<PermissionSnapshot> {
        Arc::clone(&*self.state.read())
    }

    /// Generation of the current grant set (0 before the first `load`)
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.read().generation()
    }

    /// Number of forms with grants
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// True when no form has grants
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PermissionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PermissionRegistry")
            .field("generation", &state.generation())
            .field("forms", &state.len())
            .finish_non_exhaustive()
    }
}

/// Permissions of a single form
///
/// Borrowed from a [`PermissionRegistry`]; every check reads the registry's
/// current state.
#[derive(Debug, Clone)]
pub struct FormPermissions<'a> {
    registry: &'a PermissionRegistry,
    form: FormKey,
}

impl FormPermissions<'_> {
    /// Normalized form key
    #[inline]
    #[must_use]
    pub fn form(&self) -> &FormKey {
        &self.form
    }

    /// Check an arbitrary action token
    #[inline]
    #[must_use]
    pub fn can(&self, action: &str) -> bool {
        self.registry.check(&self.form, &ActionKey::new(action))
    }

    /// Check a standard action
    #[inline]
    #[must_use]
    pub fn can_standard(&self, action: StandardAction) -> bool {
        self.registry.check(&self.form, &action.key())
    }

    /// Add permitted
    #[inline]
    #[must_use]
    pub fn can_add(&self) -> bool {
        self.can_standard(StandardAction::Add)
    }

    /// Edit permitted
    #[inline]
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.can_standard(StandardAction::Edit)
    }

    /// Delete permitted
    #[inline]
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.can_standard(StandardAction::Delete)
    }

    /// Search permitted
    #[inline]
    #[must_use]
    pub fn can_search(&self) -> bool {
        self.can_standard(StandardAction::Search)
    }

    /// Column management permitted
    #[inline]
    #[must_use]
    pub fn can_manage_columns(&self) -> bool {
        self.can_standard(StandardAction::ManageColumns)
    }

    /// Advanced search permitted (token `advance-search`)
    #[inline]
    #[must_use]
    pub fn can_advanced_search(&self) -> bool {
        self.can_standard(StandardAction::AdvanceSearch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    fn employee_master() -> Vec<PermissionGrant> {
        vec![PermissionGrant::new("Employee Master", "Add, Edit, Search")]
    }

    #[test]
    fn registry_new_denies_everything() {
        let registry = PermissionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.generation(), 0);
        assert!(!registry.can("anything", "add"));
        assert!(!registry.can("", ""));
    }

    #[test]
    fn load_then_can() {
        let registry = PermissionRegistry::new();
        registry.load(&employee_master());

        assert!(registry.can("employee-master", "add"));
        assert!(registry.can("Employee Master", "EDIT"));
        assert!(registry.can("  employee   master ", " search "));
        assert!(!registry.can("employee-master", "delete"));
    }

    #[test]
    fn convenience_predicates() {
        let registry = PermissionRegistry::new();
        registry.load(&employee_master());

        assert!(registry.can_add("employee-master"));
        assert!(registry.can_edit("Employee Master"));
        assert!(registry.can_search("Employee Master"));
        assert!(!registry.can_delete("employee-master"));
        assert!(!registry.can_manage_columns("employee-master"));
        assert!(!registry.can_advanced_search("employee-master"));
    }

    #[test]
    fn advance_search_token_is_literal() {
        let registry = PermissionRegistry::new();
        registry.load(&[PermissionGrant::new("X", "advance-search")]);
        assert!(registry.can_advanced_search("X"));

        registry.load(&[PermissionGrant::new("X", "advanced-search")]);
        assert!(!registry.can_advanced_search("X"));
    }

    #[test]
    fn load_skips_malformed_rows() {
        let registry = PermissionRegistry::new();
        registry.load(&[
            PermissionGrant::new("", "Add"),
            PermissionGrant::new("   ", "Add"),
            PermissionGrant::new("Company", ""),
            PermissionGrant {
                form_name: None,
                action: Some("Edit".into()),
            },
            PermissionGrant {
                form_name: Some("Branch".into()),
                action: None,
            },
        ]);

        assert!(registry.is_empty());
        assert!(!registry.can("", "add"));
        assert!(!registry.can("company", ""));
        assert!(!registry.can("branch", "edit"));
    }

    #[test]
    fn load_skips_whitespace_only_action_list() {
        let registry = PermissionRegistry::new();
        registry.load(&[PermissionGrant::new("Company", "  \t ")]);

        assert!(registry.is_empty());
        assert!(!registry.can("company", ""));
        assert!(!registry.can("company", "add"));
    }

    #[test]
    fn separator_only_action_list_grants_nothing() {
        let registry = PermissionRegistry::new();
        registry.load(&[PermissionGrant::new("X", ","), PermissionGrant::new("Y", " , ,")]);

        assert_eq!(registry.len(), 2);
        assert!(registry.allowed_actions("x").is_empty());
        assert!(!registry.can("x", ""));
        assert!(!registry.can("y", ","));
        for action in StandardAction::ALL {
            assert!(!registry.can_standard("x", action));
            assert!(!registry.can_standard("y", action));
        }
    }

    #[test]
    fn empty_tokens_never_grant_empty_action() {
        let registry = PermissionRegistry::new();
        registry.load(&[PermissionGrant::new("X", "Add,,Edit,")]);

        assert!(registry.can_add("x"));
        assert!(registry.can_edit("x"));
        assert!(!registry.can("x", ""));
        assert_eq!(registry.allowed_actions("x").len(), 2);
    }

    #[test]
    fn load_replaces_previous_state() {
        let registry = PermissionRegistry::new();
        registry.load(&[
            PermissionGrant::new("Employee Master", "Add"),
            PermissionGrant::new("Company", "Edit"),
        ]);
        registry.load(&[PermissionGrant::new("Employee Master", "Delete")]);

        assert!(!registry.can_add("employee-master"));
        assert!(registry.can_delete("employee-master"));
        assert!(!registry.can_edit("company"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn repeated_form_in_one_load_keeps_last_row() {
        let registry = PermissionRegistry::new();
        registry.load(&[
            PermissionGrant::new("Company", "Add, Edit"),
            PermissionGrant::new("company", "Delete"),
        ]);

        assert!(!registry.can_add("company"));
        assert!(registry.can_delete("company"));
    }

    #[test]
    fn clear_drops_everything() {
        let registry = PermissionRegistry::new();
        registry.load(&employee_master());
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.can_add("employee-master"));
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn allowed_actions_and_forms_are_sorted() {
        let registry = PermissionRegistry::new();
        registry.load(&[
            PermissionGrant::new("Employee Master", "Search, Add, Edit"),
            PermissionGrant::new("Company", "Add"),
        ]);

        let actions: Vec<_> = registry
            .allowed_actions("EMPLOYEE MASTER")
            .into_iter()
            .map(ActionKey::into_string)
            .collect();
        assert_eq!(actions, vec!["add", "edit", "search"]);

        let forms: Vec<_> = registry.forms().into_iter().map(FormKey::into_string).collect();
        assert_eq!(forms, vec!["company", "employee-master"]);
        assert!(registry.allowed_actions("unknown").is_empty());
    }

    #[test]
    fn form_view_checks_current_state() {
        let registry = PermissionRegistry::new();
        registry.load(&[PermissionGrant::new("Employee Master", "Add, Manage Columns")]);

        let view = registry.form("Employee Master");
        assert_eq!(view.form().as_str(), "employee-master");
        assert!(view.can_add());
        assert!(view.can_manage_columns());
        assert!(view.can("manage-columns"));
        assert!(!view.can_edit());
        assert!(!view.can_delete());
        assert!(!view.can_search());
        assert!(!view.can_advanced_search());
    }

    #[test]
    fn snapshot_is_stable_across_load() {
        let registry = PermissionRegistry::new();
        registry.load(&employee_master());
        let before = registry.snapshot();

        registry.load(&[PermissionGrant::new("Company", "Add")]);

        assert_eq!(before.generation(), 1);
        assert!(before.can("Employee Master", "add"));
        assert!(!registry.can("Employee Master", "add"));
        assert_eq!(registry.snapshot().generation(), 2);
    }

    #[test]
    fn snapshot_from_grants_matches_load() {
        let grants = employee_master();
        let snapshot = PermissionSnapshot::from_grants(&grants);
        assert_eq!(snapshot.generation(), 0);
        assert!(snapshot.can("employee master", "edit"));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn observer_sees_every_check() {
        let seen: Arc<Mutex<Vec<(String, String, bool, u64)>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let registry = PermissionRegistry::with_observer(move |check: &CheckRecord<'_>| {
            sink.lock().push((
                check.form.to_string(),
                check.action.to_string(),
                check.allowed,
                check.generation,
            ));
        });

        let _ = registry.can("Employee Master", "Add");
        registry.load(&employee_master());
        let _ = registry.can_add("Employee Master");
        let _ = registry.form("Employee Master").can_delete();

        assert_eq!(
            *seen.lock(),
            vec![
                ("employee-master".to_string(), "add".to_string(), false, 0),
                ("employee-master".to_string(), "add".to_string(), true, 1),
                ("employee-master".to_string(), "delete".to_string(), false, 1),
            ]
        );
    }

    #[test]
    fn with_config_builds_empty_registry() {
        let config = RegistryConfig::new().with_trace_checks(true);
        let registry = PermissionRegistry::with_config(&config);
        assert!(registry.is_empty());
        assert!(!registry.can_add("x"));
    }

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PermissionRegistry>();
    }
}
