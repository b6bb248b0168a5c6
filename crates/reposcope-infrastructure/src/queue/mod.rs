//! `JobQueue` adapters (C1): in-memory and Redis-backed, plus the
//! retry-driving [`runner::JobRunner`].

pub mod memory_queue;
pub mod redis_queue;
pub mod runner;

pub use memory_queue::InMemoryJobQueue;
pub use redis_queue::RedisJobQueue;
pub use runner::JobRunner;
