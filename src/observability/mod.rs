//! Logging and tracing
//!
//! Structured logs via `tracing`, written to stderr so they never mix with
//! the PUTVAL stream on stdout.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | `info` | Log filter (`--verbose` forces `debug`) |

pub mod spans;
pub mod tracing_setup;

pub use spans::*;
pub use tracing_setup::init as init_tracing;
