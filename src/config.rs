// ⚙️ Configuration - environment variables + defaults
//
// A `.env` file in the working directory is honoured when present.

use crate::entities::Taxonomy;
use crate::error::{CatalogError, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "recipes.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_STATIC_DIR: &str = "client/dist";
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file (`RECIPE_DB_PATH`)
    pub database_path: PathBuf,
    /// Listen address (`RECIPE_BIND_ADDR`, or `PORT` on all interfaces)
    pub bind_addr: String,
    /// Built client served at `/` when it exists (`RECIPE_STATIC_DIR`)
    pub static_dir: PathBuf,
    /// Upload cap for recipe images (`RECIPE_MAX_IMAGE_BYTES`)
    pub max_image_bytes: usize,
    /// Allowed category labels (`RECIPE_CATEGORIES`, comma-separated)
    pub taxonomy: Taxonomy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            taxonomy: Taxonomy::with_defaults(),
        }
    }
}

impl Config {
    /// Load from the process environment (after reading `.env`).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key → value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Config::default();

        if let Some(path) = get("RECIPE_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(addr) = get("RECIPE_BIND_ADDR") {
            config.bind_addr = addr;
        } else if let Some(port) = get("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| CatalogError::Config(format!("PORT must be a valid port number, got '{}'", port)))?;
            config.bind_addr = format!("0.0.0.0:{}", port);
        }

        if let Some(dir) = get("RECIPE_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        if let Some(max) = get("RECIPE_MAX_IMAGE_BYTES") {
            config.max_image_bytes = max.parse().map_err(|_| {
                CatalogError::Config(format!("RECIPE_MAX_IMAGE_BYTES must be a byte count, got '{}'", max))
            })?;
        }

        if let Some(labels) = get("RECIPE_CATEGORIES") {
            let taxonomy = Taxonomy::new(labels.split(','));
            if taxonomy.is_empty() {
                return Err(CatalogError::Config(
                    "RECIPE_CATEGORIES must name at least one category".to_string(),
                ));
            }
            config.taxonomy = taxonomy;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.database_path, PathBuf::from("recipes.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(config.taxonomy, Taxonomy::with_defaults());
    }

    #[test]
    fn test_port_only_overrides_port() {
        let config = load(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");

        let config = load(&[("PORT", "8080"), ("RECIPE_BIND_ADDR", "127.0.0.1:9000")]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        assert!(matches!(load(&[("PORT", "eighty")]), Err(CatalogError::Config(_))));
        assert!(matches!(
            load(&[("RECIPE_MAX_IMAGE_BYTES", "5MB")]),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_category_override() {
        let config = load(&[("RECIPE_CATEGORIES", "Tapas, Pintxos ,,")]).unwrap();
        assert_eq!(config.taxonomy.names(), &["Tapas".to_string(), "Pintxos".to_string()]);

        assert!(load(&[("RECIPE_CATEGORIES", " , ")]).is_err());
    }
}
