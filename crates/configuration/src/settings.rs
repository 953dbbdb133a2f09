use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub narrative: NarrativeSettings,
    pub analysis: AnalysisSettings,
}

/// Where the HTTP API listens and which browser origins may call it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. A single `*` allows any origin.
    pub allowed_origins: Vec<String>,
    /// How long a loaded league snapshot serves requests. Zero reloads per request.
    pub snapshot_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Postgres connection string. Usually supplied through `DATABASE_URL`.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

/// Settings for the LLM used to write narrative blurbs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NarrativeSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Human readable model name reported to the dashboard.
    pub model_display: String,
    pub timeout_secs: u64,
    pub summary_max_tokens: u32,
    pub block_max_tokens: u32,
    /// Budget for one combined request covering several blocks.
    pub batch_max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Weights for the power score. Must sum to 1.0.
    pub power_weights: PowerWeights,
}

/// Weights for the five power-score components.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PowerWeights {
    pub win_pct: Decimal,
    pub championship_rate: Decimal,
    pub playoff_rate: Decimal,
    pub points_per_game: Decimal,
    pub longevity: Decimal,
}

// --- Default Implementations ---

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            snapshot_ttl_secs: 30,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "commish.log".to_string(),
        }
    }
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            model_display: "Claude Sonnet 4".to_string(),
            timeout_secs: 30,
            summary_max_tokens: 500,
            block_max_tokens: 150,
            batch_max_tokens: 1000,
            temperature: 0.8,
        }
    }
}

impl Default for PowerWeights {
    fn default() -> Self {
        Self {
            win_pct: dec!(0.35),
            championship_rate: dec!(0.25),
            playoff_rate: dec!(0.20),
            points_per_game: dec!(0.10),
            longevity: dec!(0.10),
        }
    }
}

impl PowerWeights {
    pub fn sum(&self) -> Decimal {
        self.win_pct + self.championship_rate + self.playoff_rate + self.points_per_game + self.longevity
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parts = [
            self.win_pct,
            self.championship_rate,
            self.playoff_rate,
            self.points_per_game,
            self.longevity,
        ];
        if parts.iter().any(|w| w.is_sign_negative() && !w.is_zero()) {
            return Err(ConfigError::ValidationError(
                "power weights must not be negative".to_string(),
            ));
        }
        if self.sum() != Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "power weights must sum to 1.0, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

impl NarrativeSettings {
    /// True when an API key is present, i.e. narrative generation can be attempted.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Settings {
    /// Rejects settings the rest of the application cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.power_weights.validate()?;
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("server.port must be non-zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.narrative.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "narrative.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = PowerWeights::default();
        assert_eq!(weights.sum(), Decimal::ONE);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let weights = PowerWeights {
            win_pct: dec!(0.5),
            ..PowerWeights::default()
        };
        assert!(matches!(weights.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn negative_weights_are_rejected() {
        let weights = PowerWeights {
            win_pct: dec!(0.55),
            longevity: dec!(-0.10),
            ..PowerWeights::default()
        };
        assert_eq!(weights.sum(), Decimal::ONE);
        assert!(weights.validate().is_err());
    }

    #[test]
    fn narrative_requires_non_blank_key() {
        let mut narrative = NarrativeSettings::default();
        assert!(!narrative.is_configured());
        narrative.api_key = Some("   ".to_string());
        assert!(!narrative.is_configured());
        narrative.api_key = Some("sk-test".to_string());
        assert!(narrative.is_configured());
    }
}
