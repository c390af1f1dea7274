//! Settings provider using Figment

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::ConfigResult;
use crate::settings::Settings;

/// Prefix of environment variables that override configuration files.
pub const ENV_PREFIX: &str = "UNDERWRITE_";

/// Loads [`Settings`] from every source in precedence order.
///
/// Nothing is cached: each call reads the files again, so edits take effect
/// on the next load.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider reading configuration files from custom locations.
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate settings.
    pub fn load(&self) -> ConfigResult<Settings> {
        let settings: Settings = self.build_figment().extract()?;
        settings.validate()?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Sources in precedence order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Discovered configuration files, global then project
    /// 3. `UNDERWRITE_` environment variables
    pub fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        for file in self.discovery.discover_all() {
            trace!(path = %file.path.display(), scope = ?file.scope, "merging config file");
            figment = figment.merge(load_config_file(&file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }
}

fn load_config_file(file: &ConfigFile) -> Figment {
    let path = &file.path;
    match file.format {
        ConfigFormat::Toml => Figment::from(Toml::file(path)),
        ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
        ConfigFormat::Json => Figment::from(Json::file(path)),
    }
}
