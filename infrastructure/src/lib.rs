mod infra;
mod tracing;

pub mod app;

pub use infra::*;
pub use tracing::Tracing;
