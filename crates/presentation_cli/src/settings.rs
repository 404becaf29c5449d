//! Layered CLI configuration
//!
//! Sources in increasing priority: the optional config file (`[ilmeteo]`
//! table), `ILMETEO__<FIELD>` environment variables, command-line overrides.

use integration_ilmeteo::IlMeteoConfig;
use serde::Deserialize;

/// Everything the CLI reads from its configuration sources
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub ilmeteo: IlMeteoConfig,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `file` is passed to [`config::File::with_name`], so `config` also finds
    /// `config.toml`. A missing file is not an error.
    pub fn load(file: &str, base_url: Option<String>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            // ILMETEO__TIMEOUT_SECS=10 → ilmeteo.timeout_secs
            .add_source(
                config::Environment::with_prefix("ILMETEO")
                    .prefix_separator("__")
                    .separator("__")
                    .keep_prefix(true)
                    .try_parsing(true),
            )
            .set_override_option("ilmeteo.base_url", base_url)?;

        builder.build()?.try_deserialize()
    }
}
