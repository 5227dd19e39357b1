/// Run configuration. Discovers and loads `chart-schema.toml` from the
/// working directory. Without a file every flavor in the catalog is
/// generated to its built-in destinations, relative to the working
/// directory.
use crate::flavor::{self, Flavor};
use crate::Error;
use fs_err as fs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "chart-schema.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHART_SCHEMA_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown flavor '{0}'")]
    UnknownFlavor(String),
    #[error("flavor '{0}' has no destinations")]
    NoDestinations(String),
}

/// Top-level configuration from chart-schema.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base directory for relative destinations. Relative values are
    /// resolved against the working directory.
    pub root: Option<PathBuf>,

    /// Flavors to generate, in order. Empty means the whole catalog.
    pub flavors: Vec<String>,

    /// Per-flavor destination overrides.
    pub destinations: BTreeMap<String, Vec<PathBuf>>,
}

/// One flavor scheduled for generation.
#[derive(Debug, Clone)]
pub struct Target {
    pub flavor: &'static Flavor,
    pub destinations: Vec<PathBuf>,
}

impl Config {
    /// Resolve the flavors to run and where each one is written.
    pub fn targets(&self) -> Result<Vec<Target>, ConfigError> {
        for name in self.destinations.keys() {
            if flavor::find(name).is_none() {
                return Err(ConfigError::UnknownFlavor(name.clone()));
            }
        }

        let selected: Vec<&'static Flavor> = if self.flavors.is_empty() {
            flavor::catalog().iter().collect()
        } else {
            self.flavors
                .iter()
                .map(|name| {
                    flavor::find(name).ok_or_else(|| ConfigError::UnknownFlavor(name.clone()))
                })
                .collect::<Result<_, _>>()?
        };

        selected
            .into_iter()
            .map(|flavor| {
                let destinations = match self.destinations.get(flavor.name) {
                    Some(paths) => paths.clone(),
                    None => flavor.destinations.iter().map(PathBuf::from).collect(),
                };
                if destinations.is_empty() {
                    return Err(ConfigError::NoDestinations(flavor.name.to_string()));
                }
                Ok(Target {
                    flavor,
                    destinations,
                })
            })
            .collect()
    }

    /// Directory relative destinations are joined onto.
    pub fn root_dir(&self, cwd: &Path) -> PathBuf {
        match &self.root {
            Some(root) => cwd.join(root),
            None => cwd.to_path_buf(),
        }
    }
}

/// Discover the chart-schema.toml config file in `dir`.
pub fn discover_config(dir: &Path) -> Option<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path.display());
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path.display());
        None
    }
}

/// Load and parse a config file.
pub fn load_config(path: &Path) -> Result<Config, Error> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_config(&contents)?)
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Load config from `dir`, or return the default if there is none.
pub fn load_or_default(dir: &Path) -> Result<Config, Error> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runs_whole_catalog() {
        let targets = Config::default().targets().unwrap();
        let names: Vec<_> = targets.iter().map(|t| t.flavor.name).collect();
        assert_eq!(names, vec!["chart", "configurable-chart"]);
        assert_eq!(
            targets[0].destinations,
            vec![
                PathBuf::from("files/chart/values.schema.json"),
                PathBuf::from("test/files/expectedChart/values.schema.json"),
            ]
        );
    }

    #[test]
    fn test_parse_selection_and_overrides() {
        let config = parse_config(
            r#"
root = "out"
flavors = ["configurable-chart"]

[destinations]
configurable-chart = ["a.json", "b/c.json"]
"#,
        )
        .unwrap();
        assert_eq!(config.root, Some(PathBuf::from("out")));
        let targets = config.targets().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].flavor.name, "configurable-chart");
        assert_eq!(
            targets[0].destinations,
            vec![PathBuf::from("a.json"), PathBuf::from("b/c.json")]
        );
        assert_eq!(
            config.root_dir(Path::new("/work")),
            PathBuf::from("/work/out")
        );
    }

    #[test]
    fn test_reject_unknown_flavor() {
        let config = parse_config(r#"flavors = ["chart", "helm"]"#).unwrap();
        assert!(matches!(
            config.targets(),
            Err(ConfigError::UnknownFlavor(name)) if name == "helm"
        ));

        let config = parse_config("[destinations]\nnope = [\"x.json\"]\n").unwrap();
        assert!(matches!(
            config.targets(),
            Err(ConfigError::UnknownFlavor(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_reject_empty_destinations() {
        let config = parse_config("[destinations]\nchart = []\n").unwrap();
        assert!(matches!(
            config.targets(),
            Err(ConfigError::NoDestinations(name)) if name == "chart"
        ));
    }

    #[test]
    fn test_reject_unknown_keys() {
        assert!(matches!(
            parse_config("output = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(dir.path()).unwrap();
        assert!(config.flavors.is_empty());
        assert!(config.root.is_none());
    }

    #[test]
    fn test_load_from_discovered_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "flavors = [\"chart\"]\n").unwrap();
        let config = load_or_default(dir.path()).unwrap();
        assert_eq!(config.flavors, vec!["chart".to_string()]);
    }
}
