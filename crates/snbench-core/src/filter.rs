//! Content-type filters for selecting purge candidates

use crate::model::{ContentType, Item};

/// Predicate over an item's content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub content_type: ContentType,
}

impl Filter {
    pub fn content_type(content_type: ContentType) -> Self {
        Self { content_type }
    }

    pub fn matches(&self, item: &Item) -> bool {
        item.content_type == self.content_type
    }
}

/// How the filters of a [`FilterSet`] combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Logical OR
    Any,
    /// Logical AND
    All,
}

/// A combination of filters.
///
/// An empty set matches nothing, whatever the mode, and items already
/// marked deleted never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<Filter>,
    mode: MatchMode,
}

impl FilterSet {
    pub fn new(filters: Vec<Filter>, mode: MatchMode) -> Self {
        Self { filters, mode }
    }

    pub fn any(filters: Vec<Filter>) -> Self {
        Self::new(filters, MatchMode::Any)
    }

    pub fn all(filters: Vec<Filter>) -> Self {
        Self::new(filters, MatchMode::All)
    }

    /// Any-match over the given content types
    pub fn types(types: impl IntoIterator<Item = ContentType>) -> Self {
        Self::any(types.into_iter().map(Filter::content_type).collect())
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        if item.deleted || self.filters.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::Any => self.filters.iter().any(|f| f.matches(item)),
            MatchMode::All => self.filters.iter().all(|f| f.matches(item)),
        }
    }
}

impl Default for FilterSet {
    /// Notes and tags, the items the benchmark itself creates
    fn default() -> Self {
        Self::types([ContentType::Note, ContentType::Tag])
    }
}
