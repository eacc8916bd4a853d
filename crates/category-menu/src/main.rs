//! Category menu CLI
//!
//! Resolves category menus from a category data file and manages the cached
//! menu data.
//!
//! Usage:
//!   category-menu --locale de tree --url /category/clothing

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use category_menu::cache::{CacheLayer, CacheStore};
use category_menu::menu::registered_menu_types;
use category_menu::services::{
    CATEGORY_PAGE_SETTING, InMemoryCategoryRepository, RoutePageUrlResolver,
    StaticLocaleResolver, StaticSettings,
};
use category_menu::{CategoryCache, CategoryId, CategoryMenu, Config};

/// Category menu tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Category data file, JSON or YAML (overrides CATEGORIES_FILE).
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    /// Locale to work in (overrides DEFAULT_LOCALE).
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the full category menu tree.
    Tree {
        /// Current request URL, used for active flags.
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Print the menu item of a single category.
    Item {
        id: CategoryId,

        /// Current request URL, used for the active flag.
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Print menu editor metadata for a menu type.
    Describe { kind: String },

    /// Print the category id map.
    Map,

    /// List the menu types offered to the menu editor.
    Types,

    /// Delete cached menu data in Redis (every locale unless --locale is
    /// given). Requires REDIS_URL.
    Purge,

    /// Pre-populate cached menu data in Redis (every locale unless --locale
    /// is given). Requires REDIS_URL.
    Warm,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    if matches!(args.command, Command::Purge | Command::Warm) {
        require_shared_cache(&config, &args.command)?;
    }

    let menu = build_menu(&config, &args).await?;
    let locale = args.locale.clone();

    match args.command {
        Command::Tree { url } => print_json(&menu.resolve_categories_item(&url).await?)?,
        Command::Item { id, url } => print_json(&menu.resolve_category_item(id, &url).await?)?,
        Command::Describe { kind } => print_json(&menu.menu_type_info(&kind).await?)?,
        Command::Map => {
            let locale = locale.unwrap_or_else(|| config.default_locale.clone());
            print_json(&menu.cache().resolve_map(&locale).await?)?;
        }
        Command::Types => {
            println!("{:<16} LABEL", "TYPE");
            println!("{}", "-".repeat(32));
            for (kind, label) in registered_menu_types() {
                println!("{kind:<16} {label}");
            }
        }
        Command::Purge => match locale {
            Some(locale) => menu.cache().purge(&[locale]).await?,
            None => menu.purge_all().await?,
        },
        Command::Warm => match locale {
            Some(locale) => menu.cache().warm(&[locale]).await?,
            None => menu.warm_all().await?,
        },
    }

    Ok(())
}

async fn build_menu(config: &Config, args: &Args) -> Result<CategoryMenu> {
    let categories = args
        .categories
        .clone()
        .unwrap_or_else(|| config.categories_file.clone());
    let repository = InMemoryCategoryRepository::load(&categories).await?;
    info!(categories = repository.len(), "Categories loaded");

    let store: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str()).context("invalid REDIS_URL")?;
            Arc::new(CacheLayer::with_redis(
                client,
                config.cache_max_capacity,
                config.cache_l1_ttl,
            ))
        }
        None => Arc::new(CacheLayer::new(config.cache_max_capacity)),
    };

    let settings = StaticSettings::new();
    if let Some(page) = &config.category_page {
        settings.set(CATEGORY_PAGE_SETTING, page.clone());
    }

    let urls = RoutePageUrlResolver::from_routes(config.site_url.clone(), &config.page_routes);

    let active = args
        .locale
        .clone()
        .unwrap_or_else(|| config.default_locale.clone());
    let locales = StaticLocaleResolver::new(active, config.locales.clone());

    let cache = CategoryCache::new(
        store,
        Arc::new(repository),
        Arc::new(settings),
        Arc::new(urls),
    );
    Ok(CategoryMenu::new(cache, Arc::new(locales)))
}

/// Cache maintenance only outlives the process through Redis.
fn require_shared_cache(config: &Config, command: &Command) -> Result<()> {
    if config.redis_url.is_none() {
        bail!(
            "{} needs REDIS_URL: without Redis the menu cache lives only in this process",
            command.name()
        );
    }
    Ok(())
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Tree { .. } => "tree",
            Command::Item { .. } => "item",
            Command::Describe { .. } => "describe",
            Command::Map => "map",
            Command::Types => "types",
            Command::Purge => "purge",
            Command::Warm => "warm",
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
