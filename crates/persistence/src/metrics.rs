//! Query timing and pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Times one named query and records it into `database_query_duration_seconds`.
///
/// Names are static so the `query` label stays bounded.
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        histogram!("database_query_duration_seconds", "query" => self.query)
            .record(self.start.elapsed().as_secs_f64());
    }
}

/// Snapshot of the pool as `database_pool_connections{state=...}` gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_pool_connections", "state" => "idle").set(idle as f64);
    gauge!("database_pool_connections", "state" => "in_use").set(size.saturating_sub(idle) as f64);
    gauge!("database_pool_connections", "state" => "open").set(size as f64);
}
