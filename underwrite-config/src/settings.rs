//! Typed settings for opening a dictionary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use underwrite_fields::path::{is_template_key, PLACEHOLDER};
use underwrite_fields::{
    builtin, CollectionBinding, CollectionBindings, DictionaryContext, MatchStrategy,
};

use crate::error::{ConfigError, ConfigResult};

/// Everything needed to open a dictionary.
///
/// ```toml
/// dictionary_dir = "dictionary"
/// strict = true
/// matcher = "scan"
///
/// [[collections]]
/// pattern = "umbrella.properties[*]"
/// path = "umbrella.scheduled_properties"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `fields/` and `groups/`. Without it only the
    /// built-in dictionary loads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_dir: Option<PathBuf>,
    /// Layer the dictionary directory over the built-in definitions.
    pub builtin: bool,
    /// Fail on unreadable or duplicate definitions instead of skipping them.
    pub strict: bool,
    pub matcher: MatchStrategy,
    /// Collections beyond the built-in ones that template groups may expand over.
    pub collections: Vec<CollectionBinding>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary_dir: None,
            builtin: true,
            strict: false,
            matcher: MatchStrategy::default(),
            collections: Vec::new(),
        }
    }
}

impl Settings {
    /// Reject settings that cannot produce a usable dictionary.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dictionary_dir.is_none() && !self.builtin {
            return Err(ConfigError::ValidationError {
                message: "no dictionary_dir and builtin disabled: nothing to load".into(),
            });
        }
        for binding in &self.collections {
            if !binding.pattern.ends_with(PLACEHOLDER) {
                return Err(ConfigError::InvalidValue {
                    key: "collections.pattern".into(),
                    message: format!("'{}' must end with {PLACEHOLDER}", binding.pattern),
                });
            }
            if binding.path.as_deref().is_some_and(is_template_key) {
                return Err(ConfigError::InvalidValue {
                    key: "collections.path".into(),
                    message: format!("'{}' must be a concrete path", binding.pattern),
                });
            }
            if binding.id_base.as_deref().is_some_and(str::is_empty) {
                return Err(ConfigError::InvalidValue {
                    key: "collections.id_base".into(),
                    message: format!("empty id base for '{}'", binding.pattern),
                });
            }
        }
        Ok(())
    }

    /// Built-in collection bindings plus the configured ones.
    pub fn bindings(&self) -> CollectionBindings {
        self.collections
            .iter()
            .cloned()
            .fold(CollectionBindings::builtin(), CollectionBindings::with)
    }

    /// Load and validate the dictionary these settings describe.
    pub async fn open_dictionary(&self) -> ConfigResult<DictionaryContext> {
        self.validate()?;
        let builder = match &self.dictionary_dir {
            Some(dir) => DictionaryContext::open(dir),
            None => DictionaryContext::in_memory(),
        };
        let builder = builder
            .with_strategy(self.matcher)
            .with_bindings(self.bindings())
            .strict(self.strict);
        let builder = if self.builtin {
            builder.with_defaults(builtin::defaults()?)
        } else {
            builder
        };
        debug!(dir = ?self.dictionary_dir, builtin = self.builtin, "opening dictionary");
        Ok(builder.build().await?)
    }
}
