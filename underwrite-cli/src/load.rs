//! Settings, dictionary and record loading shared by every command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;
use underwrite_config::{load_settings, Settings};
use underwrite_fields::{DictionaryContext, MatchStrategy};

use crate::cli::Cli;

/// Command-line values that take precedence over configuration.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub dictionary: Option<PathBuf>,
    pub strict: bool,
    pub no_builtin: bool,
    pub matcher: Option<MatchStrategy>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            dictionary: cli.dictionary.clone(),
            strict: cli.strict,
            no_builtin: cli.no_builtin,
            matcher: cli.matcher.map(Into::into),
        }
    }
}

impl Overrides {
    /// Layer the flags over loaded settings. Flags only ever switch things on,
    /// so an absent flag leaves the configured value alone.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(dir) = &self.dictionary {
            settings.dictionary_dir = Some(dir.clone());
        }
        if self.strict {
            settings.strict = true;
        }
        if self.no_builtin {
            settings.builtin = false;
        }
        if let Some(matcher) = self.matcher {
            settings.matcher = matcher;
        }
        settings
    }
}

/// Configured settings with command-line overrides applied.
pub fn settings(overrides: &Overrides) -> Result<Settings> {
    let settings = overrides.apply(load_settings().context("failed to load configuration")?);
    debug!(?settings, "effective settings");
    Ok(settings)
}

/// Open the dictionary the settings describe.
pub async fn dictionary(settings: &Settings) -> Result<DictionaryContext> {
    settings
        .open_dictionary()
        .await
        .context("failed to open dictionary")
}

/// Read an application record. `.yaml`/`.yml` files are parsed as YAML,
/// anything else as JSON. Without a path the record is empty.
pub fn record(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value = if is_yaml {
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?
    };
    Ok(value)
}
