//! Environment configuration.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use crate::quality::{QualityThresholds, QualityWeights};
use std::env;
use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,

    pub model_sentiment_url: String,
    pub model_zeroshot_url: String,
    pub model_chat_url: String,
    pub model_api_token: String,
    pub model_chat_model_id: String,
    pub model_max_concurrency: usize,

    pub store_uri: String,
    pub store_database_name: String,

    pub webhook_signing_secret: Option<String>,

    pub quality_weights: QualityWeights,
    pub quality_thresholds: QualityThresholds,

    pub push_credentials_json: Option<String>,
    pub chat_bot_token: Option<String>,

    pub shop_category_labels_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
            model_sentiment_url: String::new(),
            model_zeroshot_url: String::new(),
            model_chat_url: String::new(),
            model_api_token: String::new(),
            model_chat_model_id: "default".to_string(),
            model_max_concurrency: 16,
            store_uri: String::new(),
            store_database_name: String::new(),
            webhook_signing_secret: None,
            quality_weights: QualityWeights::default(),
            quality_thresholds: QualityThresholds::default(),
            push_credentials_json: None,
            chat_bot_token: None,
            shop_category_labels_file: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PORT";
    const ENV_BIND_ADDR: &'static str = "BIND_ADDR";

    const ENV_MODEL_SENTIMENT_URL: &'static str = "MODEL_SENTIMENT_URL";
    const ENV_MODEL_ZEROSHOT_URL: &'static str = "MODEL_ZEROSHOT_URL";
    const ENV_MODEL_CHAT_URL: &'static str = "MODEL_CHAT_URL";
    const ENV_MODEL_API_TOKEN: &'static str = "MODEL_API_TOKEN";
    const ENV_MODEL_CHAT_MODEL_ID: &'static str = "MODEL_CHAT_MODEL_ID";
    const ENV_MODEL_MAX_CONCURRENCY: &'static str = "MODEL_MAX_CONCURRENCY";

    const ENV_STORE_URI: &'static str = "STORE_URI";
    const ENV_STORE_DATABASE_NAME: &'static str = "STORE_DATABASE_NAME";

    const ENV_WEBHOOK_SIGNING_SECRET: &'static str = "WEBHOOK_SIGNING_SECRET";

    const ENV_QUALITY_WEIGHT_LENGTH: &'static str = "QUALITY_WEIGHT_LENGTH";
    const ENV_QUALITY_WEIGHT_DIVERSITY: &'static str = "QUALITY_WEIGHT_DIVERSITY";
    const ENV_QUALITY_WEIGHT_VALID_CHARS: &'static str = "QUALITY_WEIGHT_VALID_CHARS";
    const ENV_QUALITY_WEIGHT_REPETITION: &'static str = "QUALITY_WEIGHT_REPETITION";
    const ENV_QUALITY_WEIGHT_TOXICITY: &'static str = "QUALITY_WEIGHT_TOXICITY";
    const ENV_QUALITY_HARD_REJECT: &'static str = "QUALITY_HARD_REJECT";
    const ENV_QUALITY_BASE_THRESHOLD: &'static str = "QUALITY_BASE_THRESHOLD";
    const ENV_QUALITY_UNCERTAIN_THRESHOLD: &'static str = "QUALITY_UNCERTAIN_THRESHOLD";

    const ENV_PUSH_CREDENTIALS_JSON: &'static str = "PUSH_CREDENTIALS_JSON";
    const ENV_CHAT_BOT_TOKEN: &'static str = "CHAT_BOT_TOKEN";
    const ENV_SHOP_CATEGORY_LABELS_FILE: &'static str = "SHOP_CATEGORY_LABELS_FILE";

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;

        let model_sentiment_url =
            Self::parse_string_from_env(Self::ENV_MODEL_SENTIMENT_URL, defaults.model_sentiment_url);
        let model_zeroshot_url =
            Self::parse_string_from_env(Self::ENV_MODEL_ZEROSHOT_URL, defaults.model_zeroshot_url);
        let model_chat_url =
            Self::parse_string_from_env(Self::ENV_MODEL_CHAT_URL, defaults.model_chat_url);
        let model_api_token =
            Self::parse_string_from_env(Self::ENV_MODEL_API_TOKEN, defaults.model_api_token);
        let model_chat_model_id = Self::parse_string_from_env(
            Self::ENV_MODEL_CHAT_MODEL_ID,
            defaults.model_chat_model_id,
        );
        let model_max_concurrency = Self::parse_usize_from_env(
            Self::ENV_MODEL_MAX_CONCURRENCY,
            defaults.model_max_concurrency,
        );

        let store_uri = Self::parse_string_from_env(Self::ENV_STORE_URI, defaults.store_uri);
        let store_database_name = Self::parse_string_from_env(
            Self::ENV_STORE_DATABASE_NAME,
            defaults.store_database_name,
        );

        let webhook_signing_secret = Self::parse_optional_string_from_env(
            Self::ENV_WEBHOOK_SIGNING_SECRET,
        );

        let default_weights = QualityWeights::default();
        let quality_weights = QualityWeights {
            length: Self::parse_f64_from_env(
                Self::ENV_QUALITY_WEIGHT_LENGTH,
                default_weights.length,
            )?,
            diversity: Self::parse_f64_from_env(
                Self::ENV_QUALITY_WEIGHT_DIVERSITY,
                default_weights.diversity,
            )?,
            valid_chars: Self::parse_f64_from_env(
                Self::ENV_QUALITY_WEIGHT_VALID_CHARS,
                default_weights.valid_chars,
            )?,
            repetition: Self::parse_f64_from_env(
                Self::ENV_QUALITY_WEIGHT_REPETITION,
                default_weights.repetition,
            )?,
            toxicity: Self::parse_f64_from_env(
                Self::ENV_QUALITY_WEIGHT_TOXICITY,
                default_weights.toxicity,
            )?,
        };

        let default_thresholds = QualityThresholds::default();
        let quality_thresholds = QualityThresholds {
            hard_reject: Self::parse_f64_from_env(
                Self::ENV_QUALITY_HARD_REJECT,
                default_thresholds.hard_reject,
            )?,
            base_threshold: Self::parse_f64_from_env(
                Self::ENV_QUALITY_BASE_THRESHOLD,
                default_thresholds.base_threshold,
            )?,
            uncertain_threshold: Self::parse_f64_from_env(
                Self::ENV_QUALITY_UNCERTAIN_THRESHOLD,
                default_thresholds.uncertain_threshold,
            )?,
        };

        let push_credentials_json =
            Self::parse_optional_string_from_env(Self::ENV_PUSH_CREDENTIALS_JSON);
        let chat_bot_token = Self::parse_optional_string_from_env(Self::ENV_CHAT_BOT_TOKEN);
        let shop_category_labels_file =
            Self::parse_optional_string_from_env(Self::ENV_SHOP_CATEGORY_LABELS_FILE);

        Ok(Self {
            port,
            bind_addr,
            model_sentiment_url,
            model_zeroshot_url,
            model_chat_url,
            model_api_token,
            model_chat_model_id,
            model_max_concurrency,
            store_uri,
            store_database_name,
            webhook_signing_secret,
            quality_weights,
            quality_thresholds,
            push_credentials_json,
            chat_bot_token,
            shop_category_labels_file,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_api_token.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_MODEL_API_TOKEN,
            });
        }
        if self.store_uri.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_STORE_URI,
            });
        }
        if self.store_database_name.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_STORE_DATABASE_NAME,
            });
        }

        let sum = self.quality_weights.sum();
        if (sum - 1.0).abs() > 0.01 {
            return Err(ConfigError::WeightsDoNotSumToOne { sum });
        }

        if let Some(path) = &self.shop_category_labels_file
            && !std::path::Path::new(path).exists()
        {
            return Err(ConfigError::CategoryLabelsFile {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_f64_from_env(var_name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
