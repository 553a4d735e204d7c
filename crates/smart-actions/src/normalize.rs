//! Key normalization for form names and action tokens
//!
//! Provides [`FormKey`] and [`ActionKey`], the normalized identifiers the
//! registry stores and compares. Both are produced by [`normalize`], so a
//! value formatted by the server and a value typed by a caller meet on the
//! same key regardless of case or spacing.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Normalize a raw form name or action token
///
/// Trims surrounding whitespace, lowercases, and collapses every internal
/// whitespace run into a single `-`.
///
/// # Examples
/// - `"  Manage   Company "` → `"manage-company"`
/// - `"ADD"` → `"add"`
/// - `"manage-columns"` → `"manage-columns"`
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_gap = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            out.push('-');
            pending_gap = false;
        }
        out.extend(ch.to_lowercase());
    }

    out
}

macro_rules! normalized_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Normalize `raw` into a key
            #[inline]
            #[must_use]
            pub fn new(raw: &str) -> Self {
                Self(normalize(raw))
            }

            /// Normalized string form
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when normalization left nothing behind
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the key, returning the normalized string
            #[inline]
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::new(&raw)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::new(&raw))
            }
        }
    };
}

normalized_key! {
    /// Normalized form identifier
    ///
    /// Forms are the unit of permission granting: one administrative screen
    /// such as `"Employee Master"` (stored as `"employee-master"`).
    FormKey
}

normalized_key! {
    /// Normalized action token
    ///
    /// One permitted operation on a form, e.g. `"add"` or `"manage-columns"`.
    ActionKey
}
