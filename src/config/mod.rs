//! Configuration module for crawl sessions
//!
//! This module provides the `SessionConfig` struct and its builder
//! for configuring browser sessions with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::SessionConfigBuilder;
pub use types::SessionConfig;
