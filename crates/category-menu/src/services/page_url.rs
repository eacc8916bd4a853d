//! Page URL resolution.
//!
//! Pages are registered with a route pattern such as `/category/:slug`.
//! Resolving a page fills the `:name` segments from the given parameters.
//! A segment written `:name?` is optional and is dropped when the parameter
//! is missing or empty.

use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::debug;

/// Route parameter carrying a category's nested slug.
pub const SLUG_PARAM: &str = "slug";

/// Maps a page reference plus route parameters to a URL.
pub trait PageUrlResolver: Send + Sync {
    fn page_url(&self, page: &str, params: &HashMap<&str, &str>) -> Result<String>;
}

/// Registry of page identifiers and their route patterns.
#[derive(Debug, Clone, Default)]
pub struct RoutePageUrlResolver {
    /// Prefix for generated URLs, without trailing slash.
    base_url: String,
    /// Page identifier -> route pattern.
    pages: HashMap<String, String>,
}

impl RoutePageUrlResolver {
    /// Create a resolver that prefixes every URL with `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            pages: HashMap::new(),
        }
    }

    /// Create a resolver from (page, pattern) pairs.
    pub fn from_routes(base_url: impl Into<String>, routes: &[(String, String)]) -> Self {
        let mut resolver = Self::new(base_url);
        for (page, pattern) in routes {
            resolver.register(page.clone(), pattern.clone());
        }
        debug!(pages = resolver.pages.len(), "registered page routes");
        resolver
    }

    /// Register (or replace) the pattern of a page.
    pub fn register(&mut self, page: impl Into<String>, pattern: impl Into<String>) {
        self.pages.insert(page.into(), pattern.into());
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageUrlResolver for RoutePageUrlResolver {
    fn page_url(&self, page: &str, params: &HashMap<&str, &str>) -> Result<String> {
        let Some(pattern) = self.pages.get(page) else {
            bail!("unknown page '{page}'");
        };
        let path = fill_pattern(pattern, params)?;
        Ok(format!("{}{}", self.base_url, path))
    }
}

/// Fill a route pattern with parameter values.
///
/// Pattern: "/category/:slug"
/// Params: {"slug": "clothing/shirts"}
/// Result: "/category/clothing/shirts"
///
/// Each `/`-separated part of a value is percent-encoded; the separators
/// themselves are kept so nested slugs map onto nested paths.
fn fill_pattern(pattern: &str, params: &HashMap<&str, &str>) -> Result<String> {
    let mut segments: Vec<String> = Vec::new();

    for segment in pattern.trim_start_matches('/').split('/') {
        let Some(param) = segment.strip_prefix(':') else {
            segments.push(segment.to_string());
            continue;
        };

        let (name, optional) = match param.strip_suffix('?') {
            Some(name) => (name, true),
            None => (param, false),
        };

        match params.get(name).copied().filter(|v| !v.is_empty()) {
            Some(value) => segments.push(
                value
                    .trim_matches('/')
                    .split('/')
                    .map(|part| urlencoding::encode(part).into_owned())
                    .collect::<Vec<_>>()
                    .join("/"),
            ),
            None if optional => {}
            None => bail!("missing route parameter '{name}' for pattern '{pattern}'"),
        }
    }

    Ok(format!("/{}", segments.join("/")))
}
