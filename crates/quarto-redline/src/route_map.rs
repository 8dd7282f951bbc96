//! URL path to source file mapping.
//!
//! Routes are tried in order. A pattern is a `/`-separated list of segments:
//!
//! - a literal segment matches itself
//! - `:name` matches exactly one segment
//! - `:name*` matches one or more segments
//!
//! The file template of the first matching route has each `:name`
//! placeholder replaced by the captured text.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A `{pattern, file}` pair as written in `redline.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub pattern: String,
    pub file: String,
}

#[derive(Debug)]
struct CompiledRoute {
    regex: Regex,
    param_names: Vec<String>,
    file_template: String,
}

impl CompiledRoute {
    fn compile(route: &RouteConfig) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidRoute {
            pattern: route.pattern.clone(),
            message: message.to_string(),
        };

        let mut param_names = Vec::new();
        let mut source = String::from("^");

        for part in route.pattern.split('/').filter(|p| !p.is_empty()) {
            source.push('/');
            let Some(param) = part.strip_prefix(':') else {
                source.push_str(&regex::escape(part));
                continue;
            };

            let (name, capture) = match param.strip_suffix('*') {
                Some(name) => (name, "(.+)"),
                None => (param, "([^/]+)"),
            };
            if name.is_empty() {
                return Err(invalid("parameter name is empty"));
            }
            if param_names.iter().any(|n| n == name) {
                return Err(invalid(&format!("parameter ':{name}' appears twice")));
            }
            param_names.push(name.to_string());
            source.push_str(capture);
        }

        source.push_str("/?$");
        let regex = Regex::new(&source).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            regex,
            param_names,
            file_template: route.file.clone(),
        })
    }

    fn resolve(&self, url_path: &str) -> Option<String> {
        let captures = self.regex.captures(url_path)?;
        let mut file = self.file_template.clone();
        for (i, name) in self.param_names.iter().enumerate() {
            let value = captures.get(i + 1)?.as_str();
            file = file.replacen(&format!(":{name}"), value, 1);
        }
        Some(file)
    }
}

/// Ordered set of compiled routes.
#[derive(Debug, Default)]
pub struct RouteMap {
    routes: Vec<CompiledRoute>,
}

impl RouteMap {
    pub fn new(routes: &[RouteConfig]) -> Result<Self> {
        let routes = routes
            .iter()
            .map(CompiledRoute::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { routes })
    }

    /// The file for `url_path`, from the first route that matches.
    ///
    /// A trailing `/` on `url_path` is ignored.
    pub fn resolve(&self, url_path: &str) -> Option<String> {
        let url_path = match url_path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => url_path,
        };
        self.routes.iter().find_map(|route| route.resolve(url_path))
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}
