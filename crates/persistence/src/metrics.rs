//! Database metrics: query latency histogram and pool gauges.

use metrics::{gauge, histogram};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

/// Point-in-time view of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub active: u32,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        Self::from_counts(pool.size(), pool.num_idle() as u32)
    }

    fn from_counts(size: u32, idle: u32) -> Self {
        Self {
            size,
            idle,
            active: size.saturating_sub(idle),
        }
    }
}

/// Records a query duration under `database_query_duration_seconds`.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Publishes pool gauges and returns the snapshot they were taken from.
pub fn record_pool_metrics(pool: &PgPool) -> PoolStats {
    let stats = PoolStats::of(pool);
    gauge!("database_connections_active").set(stats.active as f64);
    gauge!("database_connections_idle").set(stats.idle as f64);
    gauge!("database_connections_total").set(stats.size as f64);
    stats
}

/// Times one query.
///
/// ```ignore
/// let timer = QueryTimer::new("get_product");
/// let result = sqlx::query_as::<_, ProductEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(&self.query_name, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_names() {
        assert_eq!(QueryTimer::new("list_products").query_name, "list_products");
        assert_eq!(
            QueryTimer::new(format!("count_{}", "locals")).query_name,
            "count_locals"
        );
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        QueryTimer::new("get_local").record();
    }

    #[test]
    fn test_pool_stats_active_never_negative() {
        assert_eq!(
            PoolStats::from_counts(5, 2),
            PoolStats {
                size: 5,
                idle: 2,
                active: 3
            }
        );
        assert_eq!(PoolStats::from_counts(1, 3).active, 0);
    }
}
