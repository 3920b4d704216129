//! Production I/O: a lazily connected redis client and the system clock

use super::{Clock, FetchFuture, StatsSource};
use crate::config::InstanceIdentity;
use crate::error::{ConfigError, FetchError};
use redis::aio::MultiplexedConnection;
use redis::{Cmd, FromRedisValue};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Section passed to INFO; `all` includes commandstats
const INFO_SECTION: &str = "all";

/// Redis-backed [`StatsSource`]
///
/// Connects on first use. After an I/O error the connection is dropped and
/// re-established by the next fetch, so a restarting server only costs the
/// cycles during which it is down.
pub struct RedisSource {
    client: redis::Client,
    connection: Option<MultiplexedConnection>,
    address: String,
    timeout: Duration,
}

impl RedisSource {
    /// `timeout` bounds every connect and every command
    pub fn new(instance: &InstanceIdentity, timeout: Duration) -> Result<Self, ConfigError> {
        let client = redis::Client::open(instance.redis_url())?;
        Ok(RedisSource {
            client,
            connection: None,
            address: instance.address(),
            timeout,
        })
    }

    async fn query<T: FromRedisValue>(&mut self, cmd: Cmd, name: &str) -> Result<T, FetchError> {
        let mut connection = match self.connection.take() {
            Some(connection) => connection,
            None => {
                let connection = tokio::time::timeout(
                    self.timeout,
                    self.client.get_multiplexed_async_connection(),
                )
                .await
                .map_err(|_| FetchError::Timeout(self.timeout))??;
                info!(address = %self.address, "connected to redis");
                connection
            }
        };

        let result = tokio::time::timeout(self.timeout, cmd.query_async::<_, T>(&mut connection))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))
            .and_then(|r| r.map_err(FetchError::from));

        match &result {
            Err(FetchError::Redis(e)) if !(e.is_io_error() || e.is_connection_dropped()) => {
                // Server-side error reply, the connection itself is fine.
                self.connection = Some(connection);
            }
            Err(e) => {
                warn!(address = %self.address, command = name, error = %e, "dropping redis connection");
            }
            Ok(_) => {
                debug!(address = %self.address, command = name, "query ok");
                self.connection = Some(connection);
            }
        }

        result
    }
}

impl StatsSource for RedisSource {
    fn fetch_info(&mut self) -> FetchFuture<'_, String> {
        Box::pin(async move {
            let mut cmd = redis::cmd("INFO");
            cmd.arg(INFO_SECTION);
            self.query(cmd, "INFO").await
        })
    }

    fn fetch_latency_history<'a>(&'a mut self, event: &'a str) -> FetchFuture<'a, redis::Value> {
        Box::pin(async move {
            let mut cmd = redis::cmd("LATENCY");
            cmd.arg("HISTORY").arg(event);
            self.query(cmd, "LATENCY HISTORY").await
        })
    }
}

/// [`Clock`] backed by `SystemTime`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        // A clock before 1970 is reported as 0 rather than aborting a cycle.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
