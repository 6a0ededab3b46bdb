// Environment variable overrides

use std::env;

/// Maps prefixed environment variables onto configuration paths.
///
/// With prefix `GIRDER`, `GIRDER_DATABASE__DRIVER` targets `database.driver`
/// and `GIRDER_NAME` targets the root key `name`. Names are lowercased.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Load `.env` from the working directory if present.
    pub fn load_dotenv(&self) {
        match dotenvy::dotenv() {
            Ok(path) => girder_log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => girder_log::warn!("Ignoring unreadable .env file: {}", e),
        }
    }

    /// Overrides from the process environment.
    pub fn load(&self) -> Vec<(Option<String>, String, String)> {
        self.collect(env::vars())
    }

    /// Overrides from an arbitrary variable list, as
    /// `(section, key, value)` triples.
    pub fn collect<I>(&self, vars: I) -> Vec<(Option<String>, String, String)>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let head = format!("{}_", self.prefix);
        vars.into_iter()
            .filter_map(|(name, value)| {
                let rest = name.strip_prefix(&head)?;
                if rest.is_empty() {
                    return None;
                }
                match rest.split_once("__") {
                    Some((section, key)) if !section.is_empty() && !key.is_empty() => Some((
                        Some(section.to_lowercase()),
                        key.to_lowercase(),
                        value,
                    )),
                    Some(_) => None,
                    None => Some((None, rest.to_lowercase(), value)),
                }
            })
            .collect()
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new("GIRDER")
    }
}
