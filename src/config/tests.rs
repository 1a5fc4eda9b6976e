use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("PORT");
        env::remove_var("BIND_ADDR");
        env::remove_var("MODEL_SENTIMENT_URL");
        env::remove_var("MODEL_ZEROSHOT_URL");
        env::remove_var("MODEL_CHAT_URL");
        env::remove_var("MODEL_API_TOKEN");
        env::remove_var("MODEL_CHAT_MODEL_ID");
        env::remove_var("STORE_URI");
        env::remove_var("STORE_DATABASE_NAME");
        env::remove_var("WEBHOOK_SIGNING_SECRET");
        env::remove_var("QUALITY_WEIGHT_LENGTH");
        env::remove_var("QUALITY_HARD_REJECT");
        env::remove_var("QUALITY_BASE_THRESHOLD");
        env::remove_var("QUALITY_UNCERTAIN_THRESHOLD");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
    );
    assert_eq!(config.model_chat_model_id, "default");
    assert_eq!(config.model_max_concurrency, 16);
    assert!(config.webhook_signing_secret.is_none());
}

#[test]
fn test_socket_addr() {
    let config = Config {
        port: 3000,
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config.port, 8080);
    assert_eq!(config.quality_thresholds, QualityThresholds::default());
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_env();

    with_env_vars(&[("PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_env();

    with_env_vars(&[("PORT", "0")], || {
        let result = Config::from_env();
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidPort { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_env();

    with_env_vars(&[("PORT", "not_a_port")], || {
        let result = Config::from_env();
        assert!(matches!(result.unwrap_err(), ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_env();

    with_env_vars(&[("BIND_ADDR", "not.an.ip.address")], || {
        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidBindAddr { .. }
        ));
    });
}

#[test]
#[serial]
fn test_custom_quality_weight_overrides_one_factor() {
    clear_env();

    with_env_vars(&[("QUALITY_WEIGHT_LENGTH", "0.5")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.quality_weights.length, 0.5);
    });
}

#[test]
#[serial]
fn test_invalid_quality_weight_is_a_parse_error() {
    clear_env();

    with_env_vars(&[("QUALITY_WEIGHT_LENGTH", "not_a_float")], || {
        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::FloatParseError { .. }
        ));
    });
}

#[test]
#[serial]
fn test_custom_quality_thresholds() {
    clear_env();

    with_env_vars(
        &[
            ("QUALITY_HARD_REJECT", "0.40"),
            ("QUALITY_BASE_THRESHOLD", "0.50"),
            ("QUALITY_UNCERTAIN_THRESHOLD", "0.60"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.quality_thresholds.hard_reject, 0.40);
            assert_eq!(config.quality_thresholds.base_threshold, 0.50);
            assert_eq!(config.quality_thresholds.uncertain_threshold, 0.60);
        },
    );
}

#[test]
fn test_validate_requires_model_api_token() {
    let config = Config {
        store_uri: "mongodb://localhost".into(),
        store_database_name: "reviews".into(),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar { name } if name == "MODEL_API_TOKEN"));
}

#[test]
fn test_validate_requires_store_uri() {
    let config = Config {
        model_api_token: "secret".into(),
        store_database_name: "reviews".into(),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar { name } if name == "STORE_URI"));
}

#[test]
fn test_validate_rejects_unbalanced_weights() {
    let config = Config {
        model_api_token: "secret".into(),
        store_uri: "mongodb://localhost".into(),
        store_database_name: "reviews".into(),
        quality_weights: QualityWeights {
            length: 0.9,
            ..QualityWeights::default()
        },
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::WeightsDoNotSumToOne { .. }));
}

#[test]
fn test_validate_succeeds_with_required_fields_set() {
    let config = Config {
        model_api_token: "secret".into(),
        store_uri: "mongodb://localhost".into(),
        store_database_name: "reviews".into(),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_missing_category_labels_file() {
    let config = Config {
        model_api_token: "secret".into(),
        store_uri: "mongodb://localhost".into(),
        store_database_name: "reviews".into(),
        shop_category_labels_file: Some("/nonexistent/labels.json".into()),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::CategoryLabelsFile { .. }));
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("invalid port"));

    let err = ConfigError::MissingEnvVar {
        name: "MODEL_API_TOKEN",
    };
    assert!(err.to_string().contains("MODEL_API_TOKEN"));
}
