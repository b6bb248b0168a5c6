//! Use-case orchestration and pipeline glue.
//!
//! - [`services`]: the explicit `Services` dependency-injection record,
//!   replacing the source system's ambient module-level singletons.
//! - [`pipeline`]: the worker that drives the six-step analysis pipeline.
//! - [`use_cases`]: one module per client-facing operation.

pub mod pipeline;
pub mod services;
#[cfg(test)]
mod test_support;
pub mod use_cases;

pub use pipeline::Worker;
pub use services::Services;
