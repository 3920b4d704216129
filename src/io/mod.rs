//! I/O Abstraction Layer
//!
//! The collector only talks to the outside world through the traits below, so
//! the same polling code runs against a real Redis (`production`) and against
//! scripted replies in tests (`simulation`).

pub mod production;
pub mod simulation;

use crate::error::FetchError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use production::{RedisSource, SystemClock};
pub use simulation::{FixedClock, StaticSource};

/// Boxed future returned by [`StatsSource`] methods
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Wall clock in whole UNIX seconds
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}

/// Where INFO text and latency histories come from
pub trait StatsSource: Send {
    /// Full `INFO` reply
    fn fetch_info(&mut self) -> FetchFuture<'_, String>;

    /// Raw `LATENCY HISTORY <event>` reply, validated later by the latency parser
    fn fetch_latency_history<'a>(&'a mut self, event: &'a str) -> FetchFuture<'a, redis::Value>;
}
