//! Tests for validated configuration.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::{NamedTempFile, tempdir};

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, write_default_config};

/// Helper to create CLI args from a slice; the subcommand is `serve`.
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["invoice-ninja", "serve"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn invalid_retry(result: Result<ValidatedConfig, ConfigError>) -> String {
    match result {
        Err(ConfigError::InvalidRetry(reason)) => reason,
        other => panic!("expected InvalidRetry, got {other:?}"),
    }
}

mod defaults {
    use super::*;

    #[test]
    fn empty_sources_use_builtin_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(config.base_url.as_str(), "https://invoicing.co/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.requests_per_second, 10);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(1000));
        assert_eq!(config.retry.max_backoff, Duration::from_millis(30_000));
        assert!((config.retry.backoff_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            config.retry.retryable_status_codes.iter().copied().collect::<Vec<_>>(),
            vec![429, 500, 502, 503, 504]
        );
        assert!(config.retry.jitter);
        assert_eq!(config.listen.to_string(), "127.0.0.1:8080");
        assert_eq!(config.webhook_path, "/webhook");
        assert!(!config.verbose);
    }

    #[test]
    fn client_options_carry_resolved_values() {
        let config = ValidatedConfig::from_raw(&cli(&["--rate-limit", "3"]), None).unwrap();

        let options = config.client_options();

        assert_eq!(options.base_url, "https://invoicing.co/");
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.requests_per_second, 3);
        assert_eq!(options.retry, config.retry);
    }
}

mod token {
    use super::*;

    #[test]
    fn missing_token_is_reported_on_demand() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert!(matches!(
            config.api_token(),
            Err(ConfigError::MissingRequired { field: "token", .. })
        ));
    }

    #[test]
    fn token_from_toml() {
        let toml = toml("[api]\ntoken = \"from-file\"\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.api_token().unwrap(), "from-file");
    }

    #[test]
    fn cli_token_overrides_toml() {
        let toml = toml("[api]\ntoken = \"from-file\"\n");
        let config =
            ValidatedConfig::from_raw(&cli(&["--token", "from-cli"]), Some(&toml)).unwrap();

        assert_eq!(config.api_token().unwrap(), "from-cli");
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let config = ValidatedConfig::from_raw(&cli(&["--token", ""]), None).unwrap();

        assert!(config.api_token().is_err());
    }

    #[test]
    fn debug_and_display_hide_token() {
        let config = ValidatedConfig::from_raw(&cli(&["--token", "tok-12345"]), None).unwrap();

        assert!(!format!("{config:?}").contains("tok-12345"));
        assert!(!config.to_string().contains("tok-12345"));
    }
}

mod base_url {
    use super::*;

    #[test]
    fn cli_overrides_toml() {
        let toml = toml("[api]\nbase_url = \"https://file.example.com\"\n");
        let config = ValidatedConfig::from_raw(
            &cli(&["--base-url", "https://cli.example.com"]),
            Some(&toml),
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://cli.example.com/");
    }

    #[test]
    fn toml_overrides_default() {
        let toml = toml("[api]\nbase_url = \"https://demo.invoiceninja.com\"\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.base_url.host_str(), Some("demo.invoiceninja.com"));
    }

    #[test]
    fn unparsable_url_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--base-url", "not a url"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--base-url", "ftp://example.com"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidUrl { reason, .. }) if reason.contains("http")
        ));
    }
}

mod limits {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml("[api]\ntimeout = 0\n")));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--rate-limit", "0"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidRateLimit(_))));
    }

    #[test]
    fn rate_limit_cli_overrides_toml() {
        let toml = toml("[rate_limit]\nrequests_per_second = 4\n");

        let from_toml = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();
        let from_cli =
            ValidatedConfig::from_raw(&cli(&["--rate-limit", "7"]), Some(&toml)).unwrap();

        assert_eq!(from_toml.requests_per_second, 4);
        assert_eq!(from_cli.requests_per_second, 7);
    }
}

mod retry {
    use super::*;

    #[test]
    fn toml_retry_section_is_applied() {
        let toml = toml(
            r"
            [retry]
            max_retries = 5
            initial_backoff_ms = 250
            max_backoff_ms = 4000
            multiplier = 1.5
            status_codes = [503]
            jitter = false
        ",
        );
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.retry.max_backoff, Duration::from_millis(4000));
        assert!((config.retry.backoff_multiplier - 1.5).abs() < f64::EPSILON);
        assert!(config.retry.is_retryable_status(503));
        assert!(!config.retry.is_retryable_status(500));
        assert!(!config.retry.jitter);
    }

    #[test]
    fn cli_max_retries_overrides_toml() {
        let toml = toml("[retry]\nmax_retries = 5\n");
        let config = ValidatedConfig::from_raw(&cli(&["--max-retries", "0"]), Some(&toml)).unwrap();

        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn empty_status_code_list_is_allowed() {
        let config =
            ValidatedConfig::from_raw(&cli(&[]), Some(&toml("[retry]\nstatus_codes = []\n")))
                .unwrap();

        assert!(config.retry.retryable_status_codes.is_empty());
    }

    #[test]
    fn multiplier_of_one_is_rejected() {
        let reason = invalid_retry(ValidatedConfig::from_raw(
            &cli(&[]),
            Some(&toml("[retry]\nmultiplier = 1.0\n")),
        ));

        assert!(reason.contains("multiplier"));
    }

    #[test]
    fn non_finite_multiplier_is_rejected() {
        let reason = invalid_retry(ValidatedConfig::from_raw(
            &cli(&[]),
            Some(&toml("[retry]\nmultiplier = inf\n")),
        ));

        assert!(reason.contains("multiplier"));
    }

    #[test]
    fn initial_above_max_is_rejected() {
        let reason = invalid_retry(ValidatedConfig::from_raw(
            &cli(&[]),
            Some(&toml("[retry]\ninitial_backoff_ms = 5000\nmax_backoff_ms = 1000\n")),
        ));

        assert!(reason.contains("max_backoff_ms"));
    }

    #[test]
    fn initial_equal_to_max_is_allowed() {
        let toml = toml("[retry]\ninitial_backoff_ms = 1000\nmax_backoff_ms = 1000\n");

        assert!(ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).is_ok());
    }

    #[test]
    fn status_code_out_of_range_is_rejected() {
        let reason = invalid_retry(ValidatedConfig::from_raw(
            &cli(&[]),
            Some(&toml("[retry]\nstatus_codes = [503, 600]\n")),
        ));

        assert!(reason.contains("600"));
    }
}

mod webhook {
    use super::*;

    #[test]
    fn listen_and_path_from_toml() {
        let toml = toml("[webhook]\nlisten = \"0.0.0.0:9000\"\npath = \"/hooks/ninja\"\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.webhook_path, "/hooks/ninja");
    }

    #[test]
    fn cli_listen_overrides_toml() {
        let toml = toml("[webhook]\nlisten = \"0.0.0.0:9000\"\n");
        let config =
            ValidatedConfig::from_raw(&cli(&["--listen", "127.0.0.1:7000"]), Some(&toml)).unwrap();

        assert_eq!(config.listen.to_string(), "127.0.0.1:7000");
    }

    #[test]
    fn unparsable_listen_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--listen", "localhost"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidListen { value, .. }) if value == "localhost"
        ));
    }

    #[test]
    fn relative_path_is_rejected() {
        let toml = toml("[webhook]\npath = \"hook\"\n");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidWebhookPath { path, .. }) if path == "hook"
        ));
    }

    #[test]
    fn capture_and_wildcard_paths_are_rejected() {
        for path in ["/:hook", "/hooks/*rest", "*", "/{id}", "/hook{", "/hook}"] {
            let toml = toml(&format!("[webhook]\npath = \"{path}\"\n"));
            let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

            assert!(
                matches!(result, Err(ConfigError::InvalidWebhookPath { .. })),
                "{path} was accepted"
            );
        }
    }

    #[test]
    fn colon_inside_segment_is_allowed() {
        let toml = toml("[webhook]\npath = \"/hooks/v1:ninja\"\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.webhook_path, "/hooks/v1:ninja");
    }

    #[test]
    fn secret_from_toml_enables_verification() {
        let toml = toml("[webhook]\nsecret = \"s3cret\"\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        let secret = config.webhook_secret.unwrap();
        let expected = crate::webhook::WebhookSecret::new("s3cret").unwrap();
        assert_eq!(secret.sign(b"{}"), expected.sign(b"{}"));
    }

    #[test]
    fn no_secret_disables_verification() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn empty_cli_secret_overrides_toml_secret() {
        let toml = toml("[webhook]\nsecret = \"s3cret\"\n");
        let config =
            ValidatedConfig::from_raw(&cli(&["--webhook-secret", ""]), Some(&toml)).unwrap();

        assert!(config.webhook_secret.is_none());
    }
}

mod config_load {
    use super::*;

    #[test]
    fn load_from_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [api]
            base_url = "https://demo.invoiceninja.com"

            [rate_limit]
            requests_per_second = 2
        "#
        )
        .unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.base_url.as_str(), "https://demo.invoiceninja.com/");
        assert_eq!(config.requests_per_second, 2);
    }

    #[test]
    fn load_without_config_file() {
        let config = ValidatedConfig::load(&cli(&["--rate-limit", "5"])).unwrap();

        assert_eq!(config.requests_per_second, 5);
    }

    #[test]
    fn load_nonexistent_config_file_returns_error() {
        let cli = cli(&["--config", "nonexistent_file_12345.toml"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_malformed_config_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);

        assert!(matches!(
            ValidatedConfig::load(&cli),
            Err(ConfigError::TomlParse(_))
        ));
    }
}

mod write_config {
    use super::*;

    #[test]
    fn write_default_config_creates_loadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test-config.toml");

        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[api]"));
        assert!(content.contains("[webhook]"));

        let cli = cli(&["--config", path.to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();
        assert_eq!(config.requests_per_second, 10);
    }

    #[test]
    fn write_default_config_to_invalid_path_returns_error() {
        let path = Path::new("/nonexistent_dir_12345/config.toml");
        let result = write_default_config(path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}
