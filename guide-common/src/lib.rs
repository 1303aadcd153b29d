//! # Neighborhood Guide Common Library
//!
//! Shared code for the neighborhood guide services including:
//! - Common error type
//! - TOML configuration discovery, loading and writing
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
