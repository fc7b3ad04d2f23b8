//! List filter as received from callers, and its normalisation.

use serde::Deserialize;

use super::listing::{ListQuery, ListScope};
use crate::error::{DomainError, DomainResult};

/// Smallest and largest screen count accepted from a multi-view client.
pub const MIN_SCREEN_COUNT: i64 = 1;
pub const MAX_SCREEN_COUNT: i64 = 64;

/// Caller-supplied listing parameters.
///
/// `page` is 1-based and `limit == 0` means "everything". Query-string names
/// follow the public API (`orderBy`, `ordinationAsc`, `idLocal`, `screenCount`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralFilter {
    pub page: i64,
    pub limit: i64,
    pub order_by: String,
    pub ordination_asc: bool,
    pub search: String,
    pub id_local: Option<i64>,
    pub screen_count: Option<i64>,
}

/// Sortable columns. Anything outside this list sorts by modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Name,
    #[default]
    ModifiedAt,
}

impl SortColumn {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "name" => SortColumn::Name,
            _ => SortColumn::ModifiedAt,
        }
    }

    pub fn as_sql_column(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::ModifiedAt => "modified_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Clamps a requested screen count into the supported range.
pub fn clamp_screen_count(requested: i64) -> i64 {
    requested.clamp(MIN_SCREEN_COUNT, MAX_SCREEN_COUNT)
}

impl GeneralFilter {
    /// Validates the filter and turns it into an executable list query.
    ///
    /// A page without a limit is rejected; pages are converted to a 0-based
    /// offset; the search term is trimmed and dropped when empty.
    pub fn into_query(self, owner_id: i64, scope: ListScope) -> DomainResult<ListQuery> {
        if self.limit < 0 || self.page < 0 {
            return Err(DomainError::invalid("page and limit must not be negative"));
        }
        if self.limit == 0 && self.page != 0 {
            return Err(DomainError::invalid("page requires a limit"));
        }

        let screen_count = self.screen_count.map(clamp_screen_count);
        let limit = if self.limit > 0 {
            Some(self.limit)
        } else {
            screen_count
        };
        let offset = limit
            .map(|limit| shared::pagination::offset_for_page(self.page, limit))
            .unwrap_or(0);

        let search = Some(self.search.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let order = if self.ordination_asc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };

        Ok(ListQuery {
            owner_id,
            scope,
            search,
            sort: SortColumn::parse(&self.order_by),
            order,
            limit,
            offset,
        })
    }

    /// The local scope requested through `idLocal`, if any.
    pub fn local_scope(&self) -> Option<i64> {
        self.id_local.filter(|id| *id > 0)
    }
}
