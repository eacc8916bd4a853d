//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Default route registered for the category page.
const DEFAULT_PAGE_ROUTES: &str = "category=/category/:slug";

/// Default L1 cache capacity.
const DEFAULT_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Default L1 TTL in seconds when Redis is attached.
const DEFAULT_CACHE_L1_TTL_SECS: u64 = 60;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page reference used to build category URLs. When None, every menu
    /// resolution fails with a configuration error.
    pub category_page: Option<String>,

    /// Page identifier to route pattern pairs (from PAGE_ROUTES).
    pub page_routes: Vec<(String, String)>,

    /// Public site URL prefixed to every generated link (default: empty).
    pub site_url: String,

    /// Locales the cache is maintained for (default: ["en"]).
    pub locales: Vec<String>,

    /// Active locale (default: first entry of `locales`).
    pub default_locale: String,

    /// Redis connection URL. When None, only the in-process cache is used.
    pub redis_url: Option<String>,

    /// Maximum in-process cache entries (default: 10000).
    pub cache_max_capacity: u64,

    /// Lifetime of in-process copies of Redis entries (default: 60s). Other
    /// instances may serve purged data for up to this long. `CACHE_L1_TTL_SECS=0`
    /// yields None, which disables the in-process tier when Redis is attached.
    pub cache_l1_ttl: Option<Duration>,

    /// Category data file, JSON or YAML (default: ./categories.yaml).
    pub categories_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let category_page = lookup("CATEGORY_PAGE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let page_routes = parse_page_routes(
            &lookup("PAGE_ROUTES").unwrap_or_else(|| DEFAULT_PAGE_ROUTES.to_string()),
        )
        .context("PAGE_ROUTES must be a ';'-separated list of page=pattern pairs")?;

        let site_url = lookup("SITE_URL").unwrap_or_default();

        let locales: Vec<String> = lookup("LOCALES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let locales = if locales.is_empty() {
            vec!["en".to_string()]
        } else {
            locales
        };

        let default_locale = match lookup("DEFAULT_LOCALE") {
            Some(locale) if !locale.trim().is_empty() => locale.trim().to_string(),
            _ => locales[0].clone(),
        };

        let redis_url = lookup("REDIS_URL").filter(|v| !v.is_empty());

        let cache_max_capacity = match lookup("CACHE_MAX_CAPACITY") {
            Some(v) => v
                .parse()
                .context("CACHE_MAX_CAPACITY must be a valid u64")?,
            None => DEFAULT_CACHE_MAX_CAPACITY,
        };

        let cache_l1_ttl_secs = match lookup("CACHE_L1_TTL_SECS") {
            Some(v) => v
                .parse()
                .context("CACHE_L1_TTL_SECS must be a valid u64")?,
            None => DEFAULT_CACHE_L1_TTL_SECS,
        };
        let cache_l1_ttl =
            (cache_l1_ttl_secs > 0).then(|| Duration::from_secs(cache_l1_ttl_secs));

        let categories_file = lookup("CATEGORIES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./categories.yaml"));

        Ok(Self {
            category_page,
            page_routes,
            site_url,
            locales,
            default_locale,
            redis_url,
            cache_max_capacity,
            cache_l1_ttl,
            categories_file,
        })
    }
}

fn parse_page_routes(raw: &str) -> Result<Vec<(String, String)>> {
    let mut routes = Vec::new();
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((page, pattern)) = pair.split_once('=') else {
            bail!("invalid page route '{pair}'");
        };
        let (page, pattern) = (page.trim(), pattern.trim());
        if page.is_empty() || pattern.is_empty() {
            bail!("invalid page route '{pair}'");
        }
        routes.push((page.to_string(), pattern.to_string()));
    }
    Ok(routes)
}
