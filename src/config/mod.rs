//! Configuration module for Greylit
//!
//! This module handles loading, parsing, and validating the TOML file that
//! names the canonical endpoint, the known organisations, and every satellite
//! source.
//!
//! # Example
//!
//! ```no_run
//! use greylit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("greylit.toml")).unwrap();
//! println!("Searching {} with {} satellites", config.canonical.base_url, config.sources.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CanonicalConfig, ClientConfig, Config, SearchConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
