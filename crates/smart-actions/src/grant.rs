//! Permission grant wire records
//!
//! A grant pairs one form with a comma-separated list of action tokens, as
//! returned by the permission-lookup call:
//!
//! ```json
//! [{ "FormNameWithExt": "Employee Master", "Action": "Add, Edit, Search" }]
//! ```

use crate::error::GrantError;
use crate::normalize::{ActionKey, FormKey};
use serde::{Deserialize, Serialize};

/// One server-issued grant row
///
/// Both fields are optional on the wire. Rows missing either one are
/// skipped by [`crate::PermissionRegistry::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Raw form name
    #[serde(rename = "FormNameWithExt", default)]
    pub form_name: Option<String>,

    /// Raw comma-separated action list
    #[serde(rename = "Action", default)]
    pub action: Option<String>,
}

impl PermissionGrant {
    /// Create a grant from a form name and action list
    #[inline]
    #[must_use]
    pub fn new(form_name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            form_name: Some(form_name.into()),
            action: Some(action.into()),
        }
    }

    /// Normalized form key, if the row names a form
    #[must_use]
    pub fn form_key(&self) -> Option<FormKey> {
        self.form_name
            .as_deref()
            .map(FormKey::new)
            .filter(|key| !key.is_empty())
    }

    /// Normalized action tokens, skipping empty ones
    #[must_use]
    pub fn action_keys(&self) -> Vec<ActionKey> {
        self.action
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(ActionKey::new)
                    .filter(|key| !key.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when the action list is present and not blank
    ///
    /// A list made only of separators (`","`) counts as present; it yields
    /// no action keys.
    #[must_use]
    pub fn has_action_list(&self) -> bool {
        self.action.as_deref().is_some_and(|a| !a.trim().is_empty())
    }

    /// True when both the form name and the action list carry content
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.form_key().is_some() && self.has_action_list()
    }
}

/// Decode a permission-lookup response body
///
/// # Errors
/// Returns [`GrantError::Json`] if the body is not an array of grant objects
pub fn grants_from_json(body: &str) -> Result<Vec<PermissionGrant>, GrantError> {
    Ok(serde_json::from_str(body)?)
}

/// Decode a permission-lookup response from raw bytes
///
/// # Errors
/// Returns [`GrantError::Json`] if the body is not an array of grant objects
pub fn grants_from_slice(body: &[u8]) -> Result<Vec<PermissionGrant>, GrantError> {
    Ok(serde_json::from_slice(body)?)
}
