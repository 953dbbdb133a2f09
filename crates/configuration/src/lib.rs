use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisSettings, DatabaseSettings, LoggingSettings, NarrativeSettings, PowerWeights,
    ServerSettings, Settings,
};

/// Loads the application configuration from `config.toml` and the environment.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults,
/// 2. `config.toml` in the working directory (optional),
/// 3. `COMMISH__SECTION__KEY` environment variables,
/// 4. the conventional `DATABASE_URL`, `ANTHROPIC_API_KEY`, `API_HOST`,
///    `API_PORT` and `ALLOWED_ORIGINS` variables (also read from `.env`).
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config.toml"))
}

/// Same as [`load_settings`] but reads the TOML file from `path`.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("COMMISH")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true),
        );
    let builder = apply_conventional_env(builder)?;

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

fn apply_conventional_env(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let origins = env::var("ALLOWED_ORIGINS").ok().map(|raw| {
        raw.split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect::<Vec<_>>()
    });

    let builder = builder
        .set_override_option("database.url", non_empty_var("DATABASE_URL"))?
        .set_override_option("narrative.api_key", non_empty_var("ANTHROPIC_API_KEY"))?
        .set_override_option("server.host", non_empty_var("API_HOST"))?
        .set_override_option("server.port", non_empty_var("API_PORT"))?
        .set_override_option("server.allowed_origins", origins)?;
    Ok(builder)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings_from(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(settings.analysis.power_weights, PowerWeights::default());
        assert_eq!(settings.narrative.block_max_tokens, 150);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
[logging]
level = "debug"

[analysis.power_weights]
win_pct = 0.40
championship_rate = 0.20
playoff_rate = 0.20
points_per_game = 0.10
longevity = 0.10
"#,
        );
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.analysis.power_weights.win_pct, dec!(0.40));
    }

    #[test]
    fn invalid_weights_fail_to_load() {
        let file = write_config(
            r#"
[analysis.power_weights]
win_pct = 0.90
"#,
        );
        let err = load_settings_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
