//! `redline.toml` configuration.
//!
//! ```toml
//! [proxy]
//! target = "http://localhost:4321"
//! root = "src/content"
//! routes = [{ pattern = "/blog/:slug", file = "blog/:slug" }]
//!
//! [agent]
//! model = "sonnet"
//! timeout_secs = 90
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::paths::normalize_lexically;
use crate::route_map::{RouteConfig, RouteMap};

pub const CONFIG_FILE_NAME: &str = "redline.toml";

/// Fixed upper bound on a single agent call unless configured otherwise.
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 120;

const DEFAULT_TARGET: &str = "http://localhost:3000";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedlineConfig {
    pub proxy: ProxyConfig,
    pub agent: AgentConfig,
}

/// The server whose pages are being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Origin of the upstream server.
    pub target: String,
    /// Directory holding the source documents. Relative paths are resolved
    /// against the directory containing the config file.
    pub root: PathBuf,
    /// URL path to source file mappings, tried in order.
    pub routes: Vec<RouteConfig>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            root: PathBuf::from("."),
            routes: Vec::new(),
        }
    }
}

impl ProxyConfig {
    pub fn route_map(&self) -> Result<RouteMap> {
        RouteMap::new(&self.routes)
    }
}

/// Options passed through to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Reasoning effort hint, e.g. `"low"` or `"high"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_budget_usd: Option<f64>,

    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            system_prompt: None,
            effort: None,
            max_budget_usd: None,
            timeout_secs: DEFAULT_AGENT_TIMEOUT_SECS,
        }
    }
}

impl AgentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RedlineConfig {
    /// Parse config text, resolving `proxy.root` against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: RedlineConfig =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.proxy.root = normalize_lexically(&base_dir.join(&config.proxy.root));
        Ok(config)
    }

    /// Load config from `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let path = std::path::absolute(path)?;
        let base_dir = path.parent().unwrap_or(Path::new("/"));
        let config = Self::from_toml_str(&content, base_dir)?;

        debug!(
            path = %path.display(),
            root = %config.proxy.root.display(),
            routes = config.proxy.routes.len(),
            "Loaded config"
        );
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_for_empty_file() {
        let config = RedlineConfig::from_toml_str("", Path::new("/project")).unwrap();
        assert_eq!(config.proxy.target, "http://localhost:3000");
        assert_eq!(config.proxy.root, PathBuf::from("/project"));
        assert_eq!(config.proxy.root.as_os_str(), "/project");
        assert!(config.proxy.routes.is_empty());
        assert_eq!(config.agent.model, None);
        assert_eq!(config.agent.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_full_config() {
        let content = r#"
[proxy]
target = "http://localhost:4321"
root = "src/content"
routes = [
  { pattern = "/blog/:slug", file = "blog/:slug" },
  { pattern = "/docs/:path*", file = "docs/:path" },
]

[agent]
model = "sonnet"
system_prompt = "Be concise."
effort = "low"
max_budget_usd = 0.5
timeout_secs = 30
"#;
        let config = RedlineConfig::from_toml_str(content, Path::new("/site")).unwrap();
        assert_eq!(config.proxy.target, "http://localhost:4321");
        assert_eq!(config.proxy.root, PathBuf::from("/site/src/content"));
        assert_eq!(config.proxy.routes.len(), 2);
        assert_eq!(config.proxy.routes[1].file, "docs/:path");
        assert_eq!(config.agent.model.as_deref(), Some("sonnet"));
        assert_eq!(config.agent.system_prompt.as_deref(), Some("Be concise."));
        assert_eq!(config.agent.effort.as_deref(), Some("low"));
        assert_eq!(config.agent.max_budget_usd, Some(0.5));
        assert_eq!(config.agent.timeout(), Duration::from_secs(30));

        let routes = config.proxy.route_map().unwrap();
        assert_eq!(routes.resolve("/blog/hello").as_deref(), Some("blog/hello"));
    }

    #[test]
    fn test_absolute_root_is_kept() {
        let config =
            RedlineConfig::from_toml_str("[proxy]\nroot = \"/srv/docs\"\n", Path::new("/site"))
                .unwrap();
        assert_eq!(config.proxy.root, PathBuf::from("/srv/docs"));
    }

    #[test]
    fn test_root_dot_segments_are_resolved() {
        let config =
            RedlineConfig::from_toml_str("[proxy]\nroot = \"../docs/./src\"\n", Path::new("/site/app"))
                .unwrap();
        assert_eq!(config.proxy.root.as_os_str(), "/site/docs/src");
    }

    #[test]
    fn test_invalid_toml() {
        let err = RedlineConfig::from_toml_str("[proxy\n", Path::new("/")).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let loaded = RedlineConfig::load(&temp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_resolves_root_against_config_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[proxy]\nroot = \"content\"\n").unwrap();

        let config = RedlineConfig::load(&path).unwrap().unwrap();
        assert_eq!(config.proxy.root, temp.path().join("content"));
    }
}
