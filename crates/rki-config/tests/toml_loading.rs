//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed env var and file manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rki_config::{ConfigError, LexiconConfig};
use rki_core::enums::{BulkMode, ScriptStrictness, TabularEscaping};

fn base() -> Figment {
    Figment::from(Serialized::defaults(LexiconConfig::default()))
}

#[test]
fn loads_normalize_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[normalize]
mixed_script = "reject"
romanization_digraphs = true
"#,
        )?;

        let config: LexiconConfig = base().merge(Toml::file("config.toml")).extract()?;

        assert_eq!(config.normalize.mixed_script, ScriptStrictness::Reject);
        assert!(config.normalize.romanization_digraphs);
        Ok(())
    });
}

#[test]
fn loads_full_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[normalize]
mixed_script = "off"

[store]
bulk_mode = "best_effort"

[export]
list_separator = "|"
tabular_escaping = "reject"
pretty_json = false
output_dir = "out/lexicon"

[audio]
extensions = ["wav", "ogg"]
"#,
        )?;

        let config: LexiconConfig = base().merge(Toml::file("config.toml")).extract()?;

        assert_eq!(config.normalize.mixed_script, ScriptStrictness::Off);
        assert_eq!(config.bulk_mode().unwrap(), BulkMode::BestEffort);
        assert_eq!(config.export.list_separator, '|');
        assert_eq!(config.export.tabular_escaping, TabularEscaping::Reject);
        assert!(!config.export.pretty_json);
        assert_eq!(config.export.output_dir.to_str(), Some("out/lexicon"));
        assert_eq!(config.audio.extensions, vec!["wav", "ogg"]);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".rki")?;
        jail.create_file(
            ".rki/config.toml",
            r#"
[store]
bulk_mode = "atomic"
"#,
        )?;

        let config = LexiconConfig::load().expect("config loads");
        assert_eq!(config.bulk_mode().unwrap(), BulkMode::Atomic);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[export]
pretty_json = false
"#,
        )?;

        let config: LexiconConfig = base().merge(Toml::file("config.toml")).extract()?;

        assert!(!config.export.pretty_json);
        assert_eq!(config.export.list_separator, ';');
        assert_eq!(config.export.tabular_escaping, TabularEscaping::Backslash);
        assert!(config.store.bulk_mode.is_none());
        Ok(())
    });
}

#[rstest]
#[case("\\t")]
#[case("n")]
#[case("r")]
fn escape_colliding_separator_is_rejected(#[case] separator: &str) {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            &format!("[export]\nlist_separator = \"{separator}\"\n"),
        )?;

        let err = LexiconConfig::from_figment(&base().merge(Toml::file("config.toml")))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "export.list_separator")
        );
        Ok(())
    });
}

#[test]
fn unknown_strictness_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[normalize]
mixed_script = "sometimes"
"#,
        )?;

        let err = LexiconConfig::from_figment(&base().merge(Toml::file("config.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("RKI_STORE__BULK_MODE", "atomic");

        jail.create_file(
            "config.toml",
            r#"
[store]
bulk_mode = "best_effort"

[normalize]
romanization_digraphs = true
"#,
        )?;

        let config: LexiconConfig = base()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("RKI_").split("__"))
            .extract()?;

        // Env should win over TOML
        assert_eq!(config.store.bulk_mode, Some(BulkMode::Atomic));
        // TOML value not overridden by env should remain
        assert!(config.normalize.romanization_digraphs);
        Ok(())
    });
}
