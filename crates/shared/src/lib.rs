//! Shared types, errors, and configuration for the Hawala engine.
//!
//! This crate provides common types used across all other crates:
//!
//! - `error` - The engine-wide error taxonomy
//! - `types` - Typed IDs, money, and currency primitives
//! - `config` - Layered configuration loading
//! - `telemetry` - Tracing bootstrap

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
