use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AssetClassConfig, Config, InstrumentConfig, ReportSettings};

/// Environment variables such as `SNAPSHOT__REPORT__TOP_K=3` override the file.
const ENV_PREFIX: &str = "SNAPSHOT";

/// Loads and validates the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// file, layers `SNAPSHOT__*` environment variables on top, deserializes the
/// result into our strongly-typed `Config` struct and validates it.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses configuration from TOML text, without environment overrides.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        asset_classes = config.asset_classes.len(),
        anchors = config.anchors.len(),
        "Configuration loaded."
    );
    Ok(config)
}
