// Configuration management for the girder framework

pub mod env;
pub mod error;
pub mod loader;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Sectioned key/value configuration, read-only once built.
///
/// Paths are dotted: `database.driver` reads key `driver` of section
/// `database`; a path without a dot reads a root key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    root: HashMap<String, String>,
    sections: HashMap<String, HashMap<String, String>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::new()
    }

    /// Load `path` (format from its extension) and apply `GIRDER_*` overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().file(path).env_prefix("GIRDER").build()
    }

    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        let value = ConfigLoader::new(format).parse(content)?;
        let mut store = Self::new();
        store.merge_value(value);
        Ok(store)
    }

    fn merge_value(&mut self, value: Value) {
        let Value::Object(map) = value else {
            return;
        };
        for (name, value) in map {
            match value {
                Value::Object(entries) => {
                    let section = self.sections.entry(name).or_default();
                    for (key, value) in entries {
                        section.insert(key, scalar(value));
                    }
                }
                other => {
                    self.root.insert(name, scalar(other));
                }
            }
        }
    }

    /// Set a single value. Used while building.
    fn insert(&mut self, section: Option<String>, key: String, value: String) {
        match section {
            Some(section) => {
                self.sections.entry(section).or_default().insert(key, value);
            }
            None => {
                self.root.insert(key, value);
            }
        }
    }

    pub fn get(&self, path: &str) -> Result<&str> {
        let value = match path.split_once('.') {
            Some((section, key)) => self.sections.get(section).and_then(|s| s.get(key)),
            None => self.root.get(path),
        };
        value
            .map(String::as_str)
            .ok_or_else(|| ConfigError::Missing(path.to_string()))
    }

    pub fn get_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.get(path).unwrap_or(default)
    }

    /// Like [`get_or`](Self::get_or), treating an empty value as missing.
    pub fn get_non_empty_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        match self.get(path) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => default,
        }
    }

    /// `1`, `true`, `on`, `yes` are true; `0`, `false`, `off`, `no` and the
    /// empty string are false.
    pub fn get_bool(&self, path: &str) -> Result<bool> {
        let value = self.get(path)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: path.to_string(),
                message: format!("`{}` is not a boolean", value),
            }),
        }
    }

    pub fn get_int(&self, path: &str) -> Result<i64> {
        let value = self.get(path)?;
        value
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidValue {
                key: path.to_string(),
                message: format!("`{}`: {}", value, e),
            })
    }

    pub fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(name)
    }

    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn root(&self) -> &HashMap<String, String> {
        &self.root
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }
}

fn scalar(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

/// Builder for [`ConfigStore`]: files in order, then `.env`, then the
/// process environment, then explicit overrides. Later sources win.
#[derive(Debug, Default)]
pub struct ConfigStoreBuilder {
    files: Vec<(PathBuf, Option<FileFormat>)>,
    optional_files: Vec<PathBuf>,
    dotenv: bool,
    env: Option<EnvLoader>,
    env_vars: Option<Vec<(String, String)>>,
    overrides: Vec<(String, String)>,
}

impl ConfigStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required file, format from the extension.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), None));
        self
    }

    pub fn file_with_format(mut self, path: impl AsRef<Path>, format: FileFormat) -> Self {
        self.files.push((path.as_ref().to_path_buf(), Some(format)));
        self
    }

    /// File that is skipped when it does not exist.
    pub fn optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.optional_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn dotenv(mut self, enabled: bool) -> Self {
        self.dotenv = enabled;
        self
    }

    /// Apply `PREFIX_SECTION__KEY` variables from the process environment.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env = Some(EnvLoader::new(prefix));
        self
    }

    /// Use `vars` instead of the process environment.
    pub fn env_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env_vars = Some(vars.into_iter().collect());
        self
    }

    /// Set `path` to `value` after every other source.
    pub fn set(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((path.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<ConfigStore> {
        let mut store = ConfigStore::new();

        for (path, format) in &self.files {
            let loader = match format {
                Some(format) => ConfigLoader::new(*format),
                None => ConfigLoader::auto(path)?,
            };
            store.merge_value(loader.load_file(path)?);
            girder_log::debug!("Loaded configuration from {}", path.display());
        }

        for path in &self.optional_files {
            if path.exists() {
                store.merge_value(ConfigLoader::auto(path)?.load_file(path)?);
                girder_log::debug!("Loaded configuration from {}", path.display());
            }
        }

        if let Some(env) = &self.env {
            if self.dotenv {
                env.load_dotenv();
            }
            let overrides = match self.env_vars {
                Some(vars) => env.collect(vars),
                None => env.load(),
            };
            for (section, key, value) in overrides {
                store.insert(section, key, value);
            }
        }

        for (path, value) in self.overrides {
            match path.split_once('.') {
                Some((section, key)) => {
                    store.insert(Some(section.to_string()), key.to_string(), value)
                }
                None => store.insert(None, path, value),
            }
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI: &str = r#"
[database]
type = "mysql"
host = "localhost"
username = "test_user"

[defaults]
controller = "Home"
method = "main"

[app]
debug = "true"
timezone = "UTC"
"#;

    fn store() -> ConfigStore {
        ConfigStore::parse(INI, FileFormat::Ini).unwrap()
    }

    #[test]
    fn test_get_section_value() {
        let config = store();
        assert_eq!(config.get("app.debug").unwrap(), "true");
        assert_eq!(config.get("database.host").unwrap(), "localhost");
        assert_eq!(config.get("defaults.controller").unwrap(), "Home");
    }

    #[test]
    fn test_missing_value() {
        let config = store();
        assert!(matches!(config.get("missing.var"), Err(ConfigError::Missing(_))));
        assert_eq!(config.get_or("missing.var", "default_value"), "default_value");
        assert!(!config.has("app"));
    }

    #[test]
    fn test_typed_getters() {
        let config = ConfigStore::builder()
            .set("server.port", "8081")
            .set("app.debug", "off")
            .set("app.name", "girder")
            .build()
            .unwrap();

        assert_eq!(config.get_int("server.port").unwrap(), 8081);
        assert!(!config.get_bool("app.debug").unwrap());
        assert!(matches!(
            config.get_bool("app.name"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.get_int("app.name"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_section_listing() {
        let config = store();
        assert_eq!(config.section_names(), ["app", "database", "defaults"]);
        assert_eq!(config.section("defaults").unwrap().len(), 2);
        assert!(config.section("missing").is_none());
    }

    #[test]
    fn test_json_scalars_become_strings() {
        let config =
            ConfigStore::parse(r#"{"name": "x", "app": {"debug": true, "workers": 4}}"#, FileFormat::Json)
                .unwrap();
        assert_eq!(config.get("name").unwrap(), "x");
        assert!(config.get_bool("app.debug").unwrap());
        assert_eq!(config.get_int("app.workers").unwrap(), 4);
    }

    #[test]
    fn test_get_non_empty_or() {
        let config = ConfigStore::builder().set("database.prefix", "").build().unwrap();
        assert_eq!(config.get_non_empty_or("database.prefix", "none"), "none");
    }
}
