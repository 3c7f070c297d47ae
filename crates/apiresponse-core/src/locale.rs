//! Locale and translation collaborators

use std::collections::HashMap;

/// Supplies the active application locale
pub trait LocaleProvider: Send + Sync {
    fn current_locale(&self) -> String;
}

/// Translation lookup used to localize default messages
pub trait Translator: Send + Sync {
    fn has(&self, key: &str, locale: &str) -> bool;

    fn translate(&self, key: &str, locale: &str) -> Option<String>;
}

/// Locale provider returning a fixed tag
#[derive(Debug, Clone)]
pub struct StaticLocale(String);

impl StaticLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self(locale.into())
    }
}

impl LocaleProvider for StaticLocale {
    fn current_locale(&self) -> String {
        self.0.clone()
    }
}

/// Translator with no entries
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl Translator for NoTranslations {
    fn has(&self, _key: &str, _locale: &str) -> bool {
        false
    }

    fn translate(&self, _key: &str, _locale: &str) -> Option<String> {
        None
    }
}

/// In-memory translation catalog keyed by locale, then by key
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.catalogs
            .entry(locale.into())
            .or_default()
            .insert(key.into(), text.into());
    }

    pub fn with(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.insert(locale, key, text);
        self
    }
}

impl Translator for CatalogTranslator {
    fn has(&self, key: &str, locale: &str) -> bool {
        self.catalogs
            .get(locale)
            .is_some_and(|catalog| catalog.contains_key(key))
    }

    fn translate(&self, key: &str, locale: &str) -> Option<String> {
        self.catalogs.get(locale)?.get(key).cloned()
    }
}
