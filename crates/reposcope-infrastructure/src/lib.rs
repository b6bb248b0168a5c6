//! Concrete adapters for every domain port, plus configuration, logging
//! and startup wiring.
//!
//! - [`config`]: environment-sourced [`config::AppConfig`] (C1-adjacent).
//! - [`logging`]: `tracing` subscriber bootstrap.
//! - [`queue`]: C1, in-memory and Redis job queues plus the job runner.
//! - [`fetcher`]: C2, `git2` + REST-backed remote fetcher.
//! - [`walker`]: C3, `ignore`-based working-copy tree walker.
//! - [`store`]: C5, `SeaORM`-backed record store.
//! - [`di`]: wires the above into a [`reposcope_application::Services`].

pub mod config;
pub mod di;
pub mod fetcher;
pub mod logging;
pub mod queue;
pub mod store;
pub mod walker;

pub use di::{bootstrap, Application};
