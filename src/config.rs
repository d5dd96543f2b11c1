//! Configuration module

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATASET: &str = "insurance.csv";
pub const DEFAULT_REGION: &str = "southeast";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Dataset file (csv, json or parquet)
    pub dataset_path: PathBuf,

    /// Region selected when the window opens
    pub default_region: String,
}

impl Config {
    /// Load configuration from the process environment and arguments.
    /// The first positional argument overrides `LIFESURE_DATASET`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok(), env::args().nth(1))
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, path_arg: Option<String>) -> Self {
        let dataset_path = path_arg
            .or_else(|| lookup("LIFESURE_DATASET"))
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATASET.to_string());

        let default_region = lookup("LIFESURE_DEFAULT_REGION")
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            dataset_path: PathBuf::from(dataset_path),
            default_region,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup(&[]), None);
        assert_eq!(cfg.dataset_path, PathBuf::from("insurance.csv"));
        assert_eq!(cfg.default_region, "southeast");
    }

    #[test]
    fn test_env_values() {
        let cfg = Config::from_lookup(
            lookup(&[
                ("LIFESURE_DATASET", "/data/claims.parquet"),
                ("LIFESURE_DEFAULT_REGION", " northwest "),
            ]),
            None,
        );
        assert_eq!(cfg.dataset_path, PathBuf::from("/data/claims.parquet"));
        assert_eq!(cfg.default_region, "northwest");
    }

    #[test]
    fn test_argument_overrides_env() {
        let cfg = Config::from_lookup(
            lookup(&[("LIFESURE_DATASET", "/data/claims.parquet")]),
            Some("local.csv".to_string()),
        );
        assert_eq!(cfg.dataset_path, PathBuf::from("local.csv"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let cfg = Config::from_lookup(
            lookup(&[("LIFESURE_DATASET", "  "), ("LIFESURE_DEFAULT_REGION", "")]),
            None,
        );
        assert_eq!(cfg, Config::from_lookup(lookup(&[]), None));
    }
}
