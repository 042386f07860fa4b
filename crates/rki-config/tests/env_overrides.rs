use figment::Jail;
use rki_config::LexiconConfig;
use rki_core::enums::{BulkMode, ScriptStrictness};

#[test]
fn env_sets_values_without_files() {
    Jail::expect_with(|jail| {
        jail.set_env("RKI_NORMALIZE__MIXED_SCRIPT", "reject");
        jail.set_env("RKI_STORE__BULK_MODE", "best_effort");
        jail.set_env("RKI_EXPORT__PRETTY_JSON", "false");

        let config = LexiconConfig::load().expect("config loads");
        assert_eq!(config.normalize.mixed_script, ScriptStrictness::Reject);
        assert_eq!(config.bulk_mode().unwrap(), BulkMode::BestEffort);
        assert!(!config.export.pretty_json);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".rki")?;
        jail.create_file(".rki/config.toml", "[normalize]\nmixed_script = \"off\"\n")?;
        jail.set_env("RKI_NORMALIZE__MIXED_SCRIPT", "warn");

        let config = LexiconConfig::load().expect("config loads");
        assert_eq!(config.normalize.mixed_script, ScriptStrictness::Warn);
        Ok(())
    });
}

/// Typo'd env var keys are silently ignored by figment.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("RKI_STORE__BULK_MODEE", "atomic");

        let config = LexiconConfig::load().expect("config loads");
        assert!(config.store.bulk_mode.is_none());
        Ok(())
    });
}
