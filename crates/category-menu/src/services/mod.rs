//! Collaborator interfaces the menu core depends on, with the in-process
//! implementations used by the binary and the tests.

mod category_repository;
mod locale;
mod page_url;
mod settings;

pub use category_repository::{CategoryRepository, InMemoryCategoryRepository};
pub use locale::{LocaleResolver, StaticLocaleResolver};
pub use page_url::{PageUrlResolver, RoutePageUrlResolver, SLUG_PARAM};
pub use settings::{CATEGORY_PAGE_SETTING, SettingsStore, StaticSettings};
