//! Active locale lookup.

/// Supplies the locale of the current request and the set of locales the
/// site is maintained in.
pub trait LocaleResolver: Send + Sync {
    /// Locale of the current request/context.
    fn active_locale(&self) -> String;

    /// Every locale cached entries may exist for.
    fn available_locales(&self) -> Vec<String>;
}

/// Fixed locale configuration.
#[derive(Debug, Clone)]
pub struct StaticLocaleResolver {
    active: String,
    available: Vec<String>,
}

impl StaticLocaleResolver {
    /// Create a resolver. The active locale is added to `available` if it is
    /// not already listed.
    pub fn new(active: impl Into<String>, available: Vec<String>) -> Self {
        let active = active.into();
        let mut available = available;
        if !available.contains(&active) {
            available.insert(0, active.clone());
        }
        Self { active, available }
    }

    /// A copy of this resolver with a different active locale.
    pub fn with_active(&self, active: impl Into<String>) -> Self {
        Self::new(active, self.available.clone())
    }
}

impl LocaleResolver for StaticLocaleResolver {
    fn active_locale(&self) -> String {
        self.active.clone()
    }

    fn available_locales(&self) -> Vec<String> {
        self.available.clone()
    }
}
