//! Contract of the paginated list engine.
//!
//! Storage ports receive a [`ListQuery`] and must return rows that belong to
//! the owner, are not deleted, match the scope, and are ordered by
//! [`SearchRank`] first (when searching) and the sort column second.

use serde::{Deserialize, Serialize};

use super::filter::{SortColumn, SortOrder};

/// Extra predicates on top of owner and status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListScope {
    pub local_id: Option<i64>,
    pub parameter_only: bool,
}

impl ListScope {
    pub fn products(local_id: Option<i64>) -> Self {
        Self {
            local_id,
            parameter_only: false,
        }
    }

    pub fn read_products(local_id: Option<i64>) -> Self {
        Self {
            local_id,
            parameter_only: true,
        }
    }
}

/// A validated, executable listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub owner_id: i64,
    pub scope: ListScope,
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    /// `None` returns every matching row.
    pub limit: Option<i64>,
    pub offset: i64,
}

/// Relevance bucket of a name against a search term, best first.
///
/// Buckets are tested in declaration order and the first match wins, so a
/// name that both contains and ends with the term lands in `Contains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchRank {
    StartsWith,
    Contains,
    EndsWith,
    Other,
}

impl SearchRank {
    /// Buckets that carry a LIKE pattern, in evaluation order.
    pub const MATCHING: [SearchRank; 3] = [
        SearchRank::StartsWith,
        SearchRank::Contains,
        SearchRank::EndsWith,
    ];

    pub fn value(self) -> i32 {
        match self {
            SearchRank::StartsWith => 1,
            SearchRank::Contains => 2,
            SearchRank::EndsWith => 3,
            SearchRank::Other => 4,
        }
    }

    /// LIKE pattern for this bucket. `term` must already be escaped and lowercased.
    pub fn like_pattern(self, term: &str) -> Option<String> {
        match self {
            SearchRank::StartsWith => Some(format!("{}%", term)),
            SearchRank::Contains => Some(format!("%{}%", term)),
            SearchRank::EndsWith => Some(format!("%{}", term)),
            SearchRank::Other => None,
        }
    }

    /// Case-insensitive classification of `name` against `term`.
    pub fn classify(name: &str, term: &str) -> SearchRank {
        let name = name.to_lowercase();
        let term = term.to_lowercase();
        if name.starts_with(&term) {
            SearchRank::StartsWith
        } else if name.contains(&term) {
            SearchRank::Contains
        } else if name.ends_with(&term) {
            SearchRank::EndsWith
        } else {
            SearchRank::Other
        }
    }
}

/// Escapes LIKE metacharacters so user input only matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One window of a listing plus metadata about the whole result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    /// Number of items in this window.
    pub requested_count: i64,
    /// Matching rows ignoring pagination.
    pub total_count: i64,
    /// `ceil(total_count / limit)`, or 1 for unbounded listings.
    pub page: i64,
}

impl<T> PaginatedList<T> {
    pub fn new(items: Vec<T>, total_count: i64, limit: Option<i64>) -> Self {
        Self {
            requested_count: items.len() as i64,
            total_count,
            page: shared::pagination::page_count(total_count, limit),
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            requested_count: self.requested_count,
            total_count: self.total_count,
            page: self.page,
        }
    }
}
