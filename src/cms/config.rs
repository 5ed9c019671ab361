use crate::error::{CmsError, Result};
use crate::store::sqlite::DEFAULT_DATABASE_PATH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const DATABASE_URL_ENV: &str = "CMS_DATABASE_URL";

/// Configuration for cms, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CmsConfig {
    /// Database location (path or `sqlite://` URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Editor command line, overrides $EDITOR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Derive a slug from the title when none is given
    #[serde(default = "default_auto_slug")]
    pub auto_slug: bool,

    /// Page size for `list` when --limit is not given (0 lists everything)
    #[serde(default)]
    pub default_limit: i64,
}

fn default_auto_slug() -> bool {
    true
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            editor: None,
            auto_slug: default_auto_slug(),
            default_limit: 0,
        }
    }
}

/// Keys understood by `cms config`.
pub const KEYS: &[&str] = &["database-url", "editor", "auto-slug", "default-limit"];

impl CmsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: CmsConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Database location: explicit flag, then `$CMS_DATABASE_URL`, then the
    /// config file, then `./cms.db`.
    pub fn resolve_database_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(DATABASE_URL_ENV).ok();
        pick_database_url(flag, env.as_deref(), self.database_url.as_deref())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "database-url" => Ok(self.database_url.clone().unwrap_or_default()),
            "editor" => Ok(self.editor.clone().unwrap_or_default()),
            "auto-slug" => Ok(self.auto_slug.to_string()),
            "default-limit" => Ok(self.default_limit.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    /// Sets a key from its string form. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database-url" => self.database_url = non_blank(value),
            "editor" => self.editor = non_blank(value),
            "auto-slug" => {
                self.auto_slug = value.parse().map_err(|_| {
                    CmsError::Config(format!("auto-slug expects true or false, got '{}'", value))
                })?
            }
            "default-limit" => {
                self.default_limit = value.parse().map_err(|_| {
                    CmsError::Config(format!("default-limit expects an integer, got '{}'", value))
                })?
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn pick_database_url(flag: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    [flag, env, config]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_DATABASE_PATH)
        .to_string()
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn unknown_key(key: &str) -> CmsError {
    CmsError::Config(format!(
        "unknown config key '{}' (expected one of: {})",
        key,
        KEYS.join(", ")
    ))
}
