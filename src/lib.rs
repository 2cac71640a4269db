pub mod batch;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod http_probe;
pub mod newrelic;
pub mod request;
pub mod target_source;
pub mod telemetry;

pub use handler::{Checker, RunOutput};
