use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_BALANCE;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Props to pick from, the scraper's CSV or a JSON array.
    pub props_path: PathBuf,

    /// JSON file holding accounts and their history.
    pub store_path: PathBuf,

    /// Balance new accounts are registered with.
    pub starting_balance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            props_path: PathBuf::from("underdog_props.csv"),
            store_path: PathBuf::from("users_db.json"),
            starting_balance: DEFAULT_BALANCE,
        }
    }
}

impl Config {
    /// Parses a YAML config. Keys that are left out keep their defaults.
    /// ```
    /// let config = pickem::config::Config::from_yaml("starting_balance: 250").unwrap();
    /// assert_eq!(config.starting_balance, 250.0);
    /// assert_eq!(config.store_path, std::path::PathBuf::from("users_db.json"));
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&yaml)
    }
}
