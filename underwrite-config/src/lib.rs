//! Underwrite configuration management using Figment
//!
//! Settings decide which dictionary the tools open: an optional dictionary
//! directory, whether the built-in definitions sit underneath it, strict
//! loading, the template matching strategy and any extra repeated
//! collections.
//!
//! # Configuration Files
//!
//! - Global: `~/.underwrite/underwrite.{toml,yaml,yml,json}`
//! - Project: `./.underwrite/underwrite.{toml,yaml,yml,json}`
//!
//! Precedence: defaults → global → project → `UNDERWRITE_*` environment.
//!
//! ```no_run
//! # async fn run() -> underwrite_config::ConfigResult<()> {
//! let settings = underwrite_config::load_settings()?;
//! let dictionary = settings.open_dictionary().await?;
//! println!("{} fields", dictionary.fields().len());
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod settings;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, ENV_PREFIX};
pub use settings::Settings;

/// Load settings from the standard locations.
pub fn load_settings() -> ConfigResult<Settings> {
    ConfigProvider::new().load()
}
