//! Infrastructure adapters and runtime bootstrap.

pub mod db;
pub mod error;
pub mod http;
pub mod mem;
pub mod telemetry;
