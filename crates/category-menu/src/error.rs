//! Menu resolution error types.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors raised while resolving category menus.
///
/// A missing category is not an error: single-item resolution returns
/// `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum MenuError {
    /// No category page is configured. Fatal for the whole resolution.
    #[error("no category page configured; select one via the `category_page` setting")]
    Configuration,

    #[error("category repository failed")]
    Repository(#[source] anyhow::Error),

    #[error("settings lookup failed")]
    Settings(#[source] anyhow::Error),

    #[error("page url resolution failed for page '{page}'")]
    PageUrl {
        page: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cache store failed")]
    Cache(#[from] CacheError),

    #[error("cached menu data could not be (de)serialized")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using MenuError.
pub type MenuResult<T> = Result<T, MenuError>;
