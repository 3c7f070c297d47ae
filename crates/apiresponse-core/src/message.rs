//! Default message resolution

use crate::config::ResponseConfig;
use crate::locale::{NoTranslations, Translator};
use crate::status;
use std::sync::Arc;

/// Prefix applied to message keys before asking the translator
pub const TRANSLATION_PREFIX: &str = "api-response.messages.";

/// Resolves the default message for a status code
///
/// Lookup order: translation of the named key for the locale, the configured
/// message for the named key, a configured message under the numeric code,
/// then the built-in status table. The last step always yields text.
#[derive(Clone)]
pub struct MessageResolver {
    config: Arc<ResponseConfig>,
    translator: Arc<dyn Translator>,
}

impl MessageResolver {
    pub fn new(config: Arc<ResponseConfig>) -> Self {
        Self {
            config,
            translator: Arc::new(NoTranslations),
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn config(&self) -> &ResponseConfig {
        &self.config
    }

    pub fn resolve(&self, code: u16, locale: &str) -> String {
        if let Some(key) = status::message_key(code) {
            let translation_key = format!("{TRANSLATION_PREFIX}{key}");
            if self.translator.has(&translation_key, locale)
                && let Some(text) = self
                    .translator
                    .translate(&translation_key, locale)
                    .filter(|t| !t.is_empty())
            {
                return text;
            }
            if let Some(message) = self.config.message(key) {
                return message.to_string();
            }
        }

        if let Some(message) = self.config.message(&code.to_string()) {
            return message.to_string();
        }

        status::default_message(code).to_string()
    }
}

impl std::fmt::Debug for MessageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
