//! Shared SQL builder for ranked, paginated listings.
//!
//! Products, read products and locals all list through here; each caller
//! supplies only its table and column projection. Statements are built as
//! text plus an ordered list of bind values so they can be checked without
//! a database.

use domain::models::{escape_like, ListQuery, SearchRank, StatusCode};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres};

use crate::metrics::QueryTimer;

/// Table-specific part of a listing.
#[derive(Debug, Clone, Copy)]
pub struct ListSource {
    pub table: &'static str,
    pub columns: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    SmallInt(i16),
    Text(String),
}

/// A listing compiled into a page query and a count query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListStatement {
    pub data_sql: String,
    pub data_binds: Vec<BindValue>,
    pub count_sql: String,
    pub count_binds: Vec<BindValue>,
}

/// Keeps placeholder numbering and bind order in step.
struct Binds {
    values: Vec<BindValue>,
}

impl Binds {
    fn new() -> Self {
        Self { values: Vec::new() }
    }

    fn push(&mut self, value: BindValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

fn where_clause(query: &ListQuery, binds: &mut Binds) -> String {
    let mut conditions = vec![
        format!("user_id = {}", binds.push(BindValue::Int(query.owner_id))),
        format!(
            "status_code <> {}",
            binds.push(BindValue::SmallInt(StatusCode::Deleted.as_i16()))
        ),
    ];

    if let Some(local_id) = query.scope.local_id {
        conditions.push(format!("local_id = {}", binds.push(BindValue::Int(local_id))));
    }
    if query.scope.parameter_only {
        conditions.push("parameter = TRUE".to_string());
    }
    if let Some(term) = search_term(query) {
        let pattern = SearchRank::Contains.like_pattern(&term).unwrap_or_default();
        conditions.push(format!(
            "LOWER(name) LIKE {} ESCAPE '\\'",
            binds.push(BindValue::Text(pattern))
        ));
    }

    format!(" WHERE {}", conditions.join(" AND "))
}

fn search_term(query: &ListQuery) -> Option<String> {
    query
        .search
        .as_deref()
        .map(|term| escape_like(&term.to_lowercase()))
}

/// Builds the page and count statements for `query` against `source`.
pub fn build_list_statement(source: &ListSource, query: &ListQuery) -> ListStatement {
    let mut count_binds = Binds::new();
    let count_sql = format!(
        "SELECT COUNT(*) FROM {}{}",
        source.table,
        where_clause(query, &mut count_binds)
    );

    let mut binds = Binds::new();
    let mut data_sql = format!(
        "SELECT {} FROM {}{}",
        source.columns,
        source.table,
        where_clause(query, &mut binds)
    );

    let direction = query.order.as_sql();
    let mut order_by = Vec::new();
    if let Some(term) = search_term(query) {
        let mut rank = String::from("CASE");
        for bucket in SearchRank::MATCHING {
            if let Some(pattern) = bucket.like_pattern(&term) {
                rank.push_str(&format!(
                    " WHEN LOWER(name) LIKE {} ESCAPE '\\' THEN {}",
                    binds.push(BindValue::Text(pattern)),
                    bucket.value()
                ));
            }
        }
        rank.push_str(&format!(" ELSE {} END", SearchRank::Other.value()));
        order_by.push(rank);
    }
    order_by.push(format!("{} {}", query.sort.as_sql_column(), direction));
    order_by.push(format!("id {}", direction));
    data_sql.push_str(&format!(" ORDER BY {}", order_by.join(", ")));

    if let Some(limit) = query.limit {
        let limit_param = binds.push(BindValue::Int(limit));
        let offset_param = binds.push(BindValue::Int(query.offset));
        data_sql.push_str(&format!(" LIMIT {} OFFSET {}", limit_param, offset_param));
    }

    ListStatement {
        data_sql,
        data_binds: binds.values,
        count_sql,
        count_binds: count_binds.values,
    }
}

fn bind_all<'q, E>(
    mut q: QueryAs<'q, Postgres, E, PgArguments>,
    values: Vec<BindValue>,
) -> QueryAs<'q, Postgres, E, PgArguments> {
    for value in values {
        q = match value {
            BindValue::Int(v) => q.bind(v),
            BindValue::SmallInt(v) => q.bind(v),
            BindValue::Text(v) => q.bind(v),
        };
    }
    q
}

fn bind_all_scalar<'q>(
    mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    values: Vec<BindValue>,
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for value in values {
        q = match value {
            BindValue::Int(v) => q.bind(v),
            BindValue::SmallInt(v) => q.bind(v),
            BindValue::Text(v) => q.bind(v),
        };
    }
    q
}

/// Runs a listing: one query for the page, one for the total.
///
/// The two queries are not in a transaction; under concurrent writes the
/// count may briefly disagree with the page.
pub async fn fetch_list<E>(
    pool: &PgPool,
    source: &ListSource,
    query: &ListQuery,
) -> Result<(Vec<E>, i64), sqlx::Error>
where
    E: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let statement = build_list_statement(source, query);

    let timer = QueryTimer::new(format!("list_{}", source.table));
    let rows = bind_all(
        sqlx::query_as::<_, E>(&statement.data_sql),
        statement.data_binds,
    )
    .fetch_all(pool)
    .await;
    timer.record();
    let rows = rows?;

    let timer = QueryTimer::new(format!("count_{}", source.table));
    let total = bind_all_scalar(
        sqlx::query_scalar::<_, i64>(&statement.count_sql),
        statement.count_binds,
    )
    .fetch_one(pool)
    .await;
    timer.record();

    Ok((rows, total?))
}
