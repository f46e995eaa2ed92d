//! Store location configuration.

use std::path::{Path, PathBuf};

pub const DATA_DIR_VAR: &str = "STOCKLEDGER_DATA_DIR";
pub const PRODUCTS_FILE_VAR: &str = "STOCKLEDGER_PRODUCTS_FILE";
pub const SALES_FILE_VAR: &str = "STOCKLEDGER_SALES_FILE";

pub const DEFAULT_PRODUCTS_FILE: &str = "products.json";
pub const DEFAULT_SALES_FILE: &str = "sales.json";

/// Where the product and sale stores live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub products_file: String,
    pub sales_file: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            products_file: DEFAULT_PRODUCTS_FILE.to_string(),
            sales_file: DEFAULT_SALES_FILE.to_string(),
        }
    }

    /// Read the configuration from `STOCKLEDGER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get(DATA_DIR_VAR).unwrap_or_else(|| {
            tracing::warn!("{DATA_DIR_VAR} not set; using current directory");
            ".".to_string()
        });

        let mut config = Self::new(data_dir);
        if let Some(file) = get(PRODUCTS_FILE_VAR) {
            config.products_file = file;
        }
        if let Some(file) = get(SALES_FILE_VAR) {
            config.sales_file = file;
        }
        config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(&self.products_file)
    }

    pub fn sales_path(&self) -> PathBuf {
        self.data_dir.join(&self.sales_file)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
