//! Fixed action vocabulary
//!
//! Provides [`StandardAction`], the six action tokens every grid screen gates
//! its toolbar on.

use crate::error::UnknownAction;
use crate::normalize::{normalize, ActionKey};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Standard action tokens shared by every form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardAction {
    /// Create a record
    Add,

    /// Modify a record
    Edit,

    /// Remove a record
    Delete,

    /// Run the basic search
    Search,

    /// Show/hide/reorder grid columns
    ManageColumns,

    /// Run the advanced search panel
    ///
    /// The wire token is `advance-search`, without the trailing `d`. The
    /// server-configured vocabulary uses that spelling, so it must stay as is.
    AdvanceSearch,
}

impl StandardAction {
    /// Every standard action, in toolbar order
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::Edit,
        Self::Delete,
        Self::Search,
        Self::ManageColumns,
        Self::AdvanceSearch,
    ];

    /// Normalized wire token
    #[inline]
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Search => "search",
            Self::ManageColumns => "manage-columns",
            Self::AdvanceSearch => "advance-search",
        }
    }

    /// Token as an [`ActionKey`]
    #[inline]
    #[must_use]
    pub fn key(self) -> ActionKey {
        ActionKey::new(self.token())
    }
}

impl Display for StandardAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl From<StandardAction> for ActionKey {
    fn from(action: StandardAction) -> Self {
        action.key()
    }
}

impl FromStr for StandardAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize(s);
        Self::ALL
            .into_iter()
            .find(|action| action.token() == token)
            .ok_or(UnknownAction(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_exact() {
        let tokens: Vec<_> = StandardAction::ALL.iter().map(|a| a.token()).collect();
        assert_eq!(
            tokens,
            vec!["add", "edit", "delete", "search", "manage-columns", "advance-search"]
        );
    }

    #[test]
    fn tokens_are_already_normalized() {
        for action in StandardAction::ALL {
            assert_eq!(normalize(action.token()), action.token());
        }
    }

    #[test]
    fn parse_accepts_any_formatting() {
        assert_eq!("ADD".parse::<StandardAction>(), Ok(StandardAction::Add));
        assert_eq!(
            " Manage  Columns ".parse::<StandardAction>(),
            Ok(StandardAction::ManageColumns)
        );
        assert_eq!(
            "Advance Search".parse::<StandardAction>(),
            Ok(StandardAction::AdvanceSearch)
        );
    }

    #[test]
    fn parse_rejects_advanced_spelling() {
        let err = "advanced-search".parse::<StandardAction>().unwrap_err();
        assert_eq!(err, UnknownAction("advanced-search".to_string()));
    }

    #[test]
    fn key_conversion() {
        let key: ActionKey = StandardAction::ManageColumns.into();
        assert_eq!(key.as_str(), "manage-columns");
        assert_eq!(StandardAction::Delete.to_string(), "delete");
    }
}
