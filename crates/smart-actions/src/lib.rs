//! Smart Actions
//!
//! Form/action permission gate for server-driven admin screens.
//!
//! # Overview
//!
//! The server issues grants such as
//! `{ "FormNameWithExt": "Employee Master", "Action": "Add, Edit, Search" }`.
//! A [`PermissionRegistry`] normalizes them (trim, lowercase, whitespace
//! runs to `-`) and answers checks synchronously:
//! - **PermissionRegistry**: replace-all `load`, fail-closed `can`
//! - **StandardAction**: the fixed toolbar vocabulary (`add` … `advance-search`)
//! - **PermissionSessions**: one registry per session instead of a global
//! - **CheckObserver**: optional diagnostics for every check
//!
//! # Example
//!
//! ```rust
//! use smart_actions::{PermissionGrant, PermissionRegistry};
//!
//! let registry = PermissionRegistry::new();
//! registry.load(&[PermissionGrant::new("Employee Master", "Add, Edit, Search")]);
//!
//! assert!(registry.can_add("employee-master"));
//! assert!(registry.can_search("Employee Master"));
//! assert!(!registry.can_delete("employee-master"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod action;
pub mod config;
pub mod error;
pub mod grant;
pub mod normalize;
pub mod observer;
pub mod registry;
pub mod session;
pub mod source;

// Re-exports
pub use action::StandardAction;
pub use config::RegistryConfig;
pub use error::{ConfigError, Error, GrantError, Result, SessionError, UnknownAction};
pub use grant::{grants_from_json, grants_from_slice, PermissionGrant};
pub use normalize::{normalize, ActionKey, FormKey};
pub use observer::{CheckObserver, CheckRecord, NoopObserver, TracingObserver};
pub use registry::{FormPermissions, PermissionRegistry, PermissionSnapshot};
pub use session::{PermissionSessions, SessionId};
pub use source::{GrantSource, JsonFileGrantSource, StaticGrantSource};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for permission checks
    pub use crate::{
        ActionKey, FormKey, FormPermissions, PermissionGrant, PermissionRegistry,
        PermissionSessions, RegistryConfig, StandardAction,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
