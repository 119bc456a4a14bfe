use std::time::Duration;
use typed_builder::TypedBuilder;

/// Connection pool settings shared by the SQL backends.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolConfig {
    #[builder(default = 5)]
    pub max_connections: u32,
    #[builder(default = 0)]
    pub min_connections: u32,
    #[builder(default = Duration::from_secs(3))]
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PoolConfig {
    pub(crate) fn options<DB: sqlx::Database>(&self) -> sqlx::pool::PoolOptions<DB> {
        sqlx::pool::PoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}
