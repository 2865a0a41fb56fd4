//! Shared utilities for the forge workspace.

pub mod logging;
pub mod stats;
pub mod time;

pub use logging::{init_tracing, init_tracing_json};
pub use stats::StatsCounter;
pub use time::{format_duration, format_height_delay, BLOCK_TIME_SECS};
