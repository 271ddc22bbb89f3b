use std::collections::BTreeSet;
use std::collections::btree_set;

use serde::Serialize;

use super::registry::AssignmentRegistry;
use crate::error::Result;
use crate::store::Store;

/// Courses a staff identity may act on right now.
///
/// Derived per request and dropped with it. An empty scope authorizes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorizedScope(BTreeSet<String>);

impl AuthorizedScope {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(course: impl Into<String>) -> Self {
        Self(BTreeSet::from([course.into()]))
    }

    #[must_use]
    pub fn contains(&self, course: &str) -> bool {
        self.0.contains(course)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Course codes in sorted order.
    #[must_use]
    pub fn courses(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for AuthorizedScope {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a AuthorizedScope {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Derives authorized scopes from the assignment registry.
pub struct ScopeResolver<'a> {
    registry: AssignmentRegistry<'a>,
}

impl<'a> ScopeResolver<'a> {
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            registry: AssignmentRegistry::new(store),
        }
    }

    /// Distinct courses across the staff member's active assignments,
    /// homeroom and subject alike.
    pub fn resolve(&self, staff_id: &str) -> Result<AuthorizedScope> {
        let scope: AuthorizedScope = self
            .registry
            .list_by_staff(staff_id)?
            .into_iter()
            .filter(|a| a.active)
            .map(|a| a.course)
            .collect();

        tracing::debug!(staff_id, courses = scope.len(), "resolved course scope");
        Ok(scope)
    }
}
