//! Tracing subscriber setup shared by the pinger binaries.

mod subscriber;

pub use subscriber::{LogFormat, init_tracing};
