//! Configuration module for the archiver
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and turning raw CLI values into a [`RunTarget`].
//!
//! # Example
//!
//! ```no_run
//! use vk_wall_archive::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("archive.toml")).unwrap();
//! println!("Batches are cached in: {}", config.output.cache_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, OutputConfig, PagingConfig, RunTarget};

// Re-export parser functions
pub use parser::{
    load_config, load_or_default, parse_author_ids, parse_config, parse_group_id, parse_target,
};
