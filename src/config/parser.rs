use crate::config::types::{Config, RunTarget};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use vk_wall_archive::config::load_config;
///
/// let config = load_config(Path::new("archive.toml")).unwrap();
/// println!("Page size: {}", config.paging.page_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration file if one was given, otherwise the defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Parses a comma-separated list of author ids
///
/// An empty or absent list yields no ids. Any entry that is not an integer
/// is rejected with [`ConfigError::WrongArgument`] naming that entry.
pub fn parse_author_ids(raw: Option<&str>) -> Result<Vec<i64>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|entry| {
            entry
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::WrongArgument(entry.to_string()))
        })
        .collect()
}

/// Parses the wall owner id
pub fn parse_group_id(raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::WrongArgument(raw.to_string()))
}

/// Builds the run target from the raw CLI values
pub fn parse_target(group: &str, authors: Option<&str>) -> Result<RunTarget, ConfigError> {
    Ok(RunTarget {
        group_id: parse_group_id(group)?,
        author_ids: parse_author_ids(authors)?,
    })
}
