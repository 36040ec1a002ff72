//! Integration tests for lexicon-cli.
//!
//! These tests run the command pipeline in process: argument parsing,
//! configuration loading, package registration, and resolution.

use clap::Parser;
use lexicon_cli::{execute, init_config, load_config, CliError, Cli};
use lexicon_common::test_utils::{create_temp_dir, init_test_logging, translation_fixtures, write_fixture};
use lexicon_config::{Config, ConfigLoader};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("lexicon").chain(args.iter().copied())).unwrap()
}

#[tokio::test]
async fn test_resolve_from_config_file() {
    init_test_logging();
    let dir = create_temp_dir();
    let packages = dir.path().join("packages");
    write_fixture(&packages, "ui/en.json", translation_fixtures::ui_en_json());
    write_fixture(&packages, "ui/fr.yaml", translation_fixtures::ui_fr_yaml());

    let config_path = write_fixture(
        dir.path(),
        "lexicon.yaml",
        &format!("i18n:\n  locales: [fr, en]\n  packages_dir: {}\n", packages.display()),
    );
    let config_arg = config_path.to_string_lossy().into_owned();

    let cli = parse(&["--config", &config_arg, "resolve", "ui.greeting", "-p", "name=Sam"]);
    let config = load_config(&cli).await.unwrap();
    assert_eq!(config.i18n.locales, ["fr", "en"]);

    assert_eq!(execute(&cli, &config).await.unwrap(), "Bonjour, Sam !");
}

#[tokio::test]
async fn test_locale_flag_overrides_config() {
    init_test_logging();
    let dir = create_temp_dir();
    write_fixture(dir.path(), "ui/en.json", translation_fixtures::ui_en_json());
    write_fixture(dir.path(), "ui/fr.yaml", translation_fixtures::ui_fr_yaml());
    let packages = dir.path().to_string_lossy().into_owned();

    let cli = parse(&[
        "--packages", &packages, "--locale", "en", "resolve", "ui.inbox.count", "-p", "count=3",
    ]);
    let config = load_config(&cli).await.unwrap();

    assert_eq!(execute(&cli, &config).await.unwrap(), "3 messages");
}

#[tokio::test]
async fn test_unknown_key_prints_diagnostic() {
    init_test_logging();
    let cli = parse(&["resolve", "nowhere.key", "-p", "a=1", "-p", "b=two"]);
    let config = load_config(&cli).await.unwrap();

    assert_eq!(
        execute(&cli, &config).await.unwrap(),
        r#"nowhere.key: { "a": "1", "b": "two" }"#
    );
}

#[tokio::test]
async fn test_reserved_segment_is_an_error() {
    init_test_logging();
    let cli = parse(&["resolve", "__proto__.polluted"]);
    let config = load_config(&cli).await.unwrap();

    let err = execute(&cli, &config).await.unwrap_err();
    assert!(matches!(err, CliError::I18n(_)));
}

#[tokio::test]
async fn test_invalid_locale_flag_is_rejected() {
    init_test_logging();
    let cli = parse(&["--locale", "not a locale", "resolve", "ui.x"]);
    assert!(matches!(load_config(&cli).await, Err(CliError::Config(_))));
}

#[tokio::test]
async fn test_init_config_round_trip() {
    init_test_logging();
    let dir = create_temp_dir();
    let path = dir.path().join("lexicon.toml");

    init_config(&path, false).await.unwrap();
    let loaded = ConfigLoader::new(&path).load().await.unwrap();
    assert_eq!(loaded.i18n, Config::default().i18n);

    let err = init_config(&path, false).await.unwrap_err();
    assert!(matches!(err, CliError::AlreadyExists(_)));
    init_config(&path, true).await.unwrap();
}

#[tokio::test]
async fn test_named_config_must_exist() {
    init_test_logging();
    let dir = create_temp_dir();
    let missing = dir.path().join("absent.yaml").to_string_lossy().into_owned();

    let cli = parse(&["--config", &missing, "resolve", "ui.x"]);
    assert!(matches!(load_config(&cli).await, Err(CliError::Config(_))));
}

#[tokio::test]
async fn test_without_config_uses_defaults() {
    init_test_logging();
    let cli = parse(&["resolve", "ui.x"]);
    let config = load_config(&cli).await.unwrap();

    assert_eq!(config.i18n.packages_dir, Config::default().i18n.packages_dir);
    assert_eq!(config.logging.format, Config::default().logging.format);
}
