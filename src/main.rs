#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::Parser;
use redis_collectd::io::{RedisSource, SystemClock};
use redis_collectd::observability::init_tracing;
use redis_collectd::sink::StdoutSink;
use redis_collectd::{BridgeConfig, CliArgs, Collector, InstanceIdentity};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    if args.is_version_request() {
        println!("v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(args.log_format, args.verbose).map_err(|e| e.to_string())?;

    // Startup errors are the only fatal ones.
    let instance = InstanceIdentity::parse(&args.connection)?;
    let latency = args.latency_enabled()?;
    let config = BridgeConfig::load(args.config.as_deref())?;

    info!(
        instance = %instance,
        hostname = %config.hostname,
        interval_secs = config.interval_secs,
        "configuration loaded"
    );

    let source = RedisSource::new(&instance, config.interval())?;
    let collector = Collector::new(instance, config, source, Arc::new(StdoutSink), SystemClock)
        .with_latency(latency);

    collector
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for ctrl-c, running until killed");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
