// Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Ini,
    Toml,
    Json,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ini" | "conf" => Some(FileFormat::Ini),
            "toml" => Some(FileFormat::Toml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Parses one file into a JSON object: scalars at the top level are root
/// keys, nested objects are sections.
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Detect the format from the file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::Load(format!("No file extension: {}", path.display())))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::Load(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::Load(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Ini => parse_ini(content),
            FileFormat::Toml => parse_toml(content),
            FileFormat::Json => parse_json(content),
        }
    }
}

fn parse_json(content: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))?;
    if !value.is_object() {
        return Err(ConfigError::Parse(
            "JSON configuration must be an object".to_string(),
        ));
    }
    Ok(value)
}

fn parse_toml(content: &str) -> Result<Value> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;

    serde_json::to_value(table)
        .map_err(|e| ConfigError::Parse(format!("TOML to JSON conversion error: {}", e)))
}

/// INI with `[section]` headers, `key = value` pairs and `;`/`#` comments.
/// Keys before the first header are root keys. Surrounding quotes are
/// removed from values; a later duplicate key replaces the earlier one.
fn parse_ini(content: &str) -> Result<Value> {
    let mut root = Map::new();
    let mut section: Option<String> = None;

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    ConfigError::Parse(format!("line {}: malformed section header", lineno + 1))
                })?;
            root.entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            section = Some(name.to_string());
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            ConfigError::Parse(format!("line {}: expected `key = value`", lineno + 1))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Parse(format!("line {}: empty key", lineno + 1)));
        }
        let value = Value::String(ini_value(value));

        match &section {
            Some(name) => {
                if let Some(Value::Object(map)) = root.get_mut(name) {
                    map.insert(key.to_string(), value);
                }
            }
            None => {
                root.insert(key.to_string(), value);
            }
        }
    }

    Ok(Value::Object(root))
}

fn ini_value(raw: &str) -> String {
    let value = raw.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    // Unquoted values may carry a trailing comment.
    match value.find(" ;") {
        Some(idx) => value[..idx].trim_end().to_string(),
        None => value.to_string(),
    }
}
