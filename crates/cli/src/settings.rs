//! Loading [`ProviderSettings`] from file and environment.
//!
//! Sources, lowest precedence first:
//!
//! 1. `firefly.toml` (or `.json`/`.yaml`) in the working directory, optional.
//! 2. `FIREFLY_*` environment variables, e.g. `FIREFLY_ENDPOINT`,
//!    `FIREFLY_ACCESS_TOKEN`, `FIREFLY_CLIENT_ID`, `FIREFLY_CLIENT_SECRET`,
//!    `FIREFLY_TIMEOUT_SECS`.

use config::{Config, ConfigError, Environment, File, Map, Source};
use ledger::ProviderSettings;

/// Base name of the optional settings file.
const SETTINGS_FILE: &str = "firefly";

/// Prefix of the environment variables read as settings.
const ENV_PREFIX: &str = "FIREFLY";

/// Loads settings from the default file and the environment.
pub fn load() -> Result<ProviderSettings, ConfigError> {
    load_from(File::with_name(SETTINGS_FILE).required(false), None)
}

/// Loads settings from `base`, overridden by `env` when given and by the
/// process environment otherwise.
fn load_from<S>(base: S, env: Option<Map<String, String>>) -> Result<ProviderSettings, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(base)
        .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
        .build()?
        .try_deserialize()
}
