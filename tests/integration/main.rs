//! Integration tests for hero-api

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and Functions app settings
    fn hero(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("hero-api");
        cmd.env("HERO_CONFIG", config_dir.path().join("config.toml"))
            .env_remove("KeyVaultName")
            .env_remove("TableStorageAccountName")
            .env_remove("FUNCTIONS_CUSTOMHANDLER_PORT")
            .env_remove("HERO_CHECK_TABLE_STORAGE")
            .env_remove("HERO_RESOLVE_DNS")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Health-check API"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("hero-api"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[health]"))
            .stdout(predicate::str::contains("DataStorageConnectionString"));
    }

    #[test]
    fn config_show_reflects_app_settings() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .env("KeyVaultName", "env-kv")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("env-kv"));
    }

    #[test]
    fn config_set_persists() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .args(["config", "set", "key_vault.name", "hero-kv"])
            .assert()
            .success();

        let written = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
        assert!(written.contains("hero-kv"));
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn secret_without_vault_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .args(["secret", "DataStorageConnectionString"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Key Vault name not configured"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn health_without_vault_fails() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .arg("health")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Key Vault name not configured"));
    }

    #[test]
    fn config_loading_is_logged_with_debug_verbosity() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .args(["-vv", "config", "path"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Config file not found, using defaults"));
    }

    #[test]
    fn invalid_health_toggle_fails() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .env("HERO_RESOLVE_DNS", "maybe")
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("HERO_RESOLVE_DNS"));
    }

    #[test]
    fn ambient_health_toggles_do_not_leak_into_tests() {
        std::env::set_var("HERO_CHECK_TABLE_STORAGE", "not-a-bool");
        std::env::set_var("HERO_RESOLVE_DNS", "not-a-bool");
        let temp = TempDir::new().unwrap();
        let assert = hero(&temp).args(["config", "path"]).assert();
        std::env::remove_var("HERO_CHECK_TABLE_STORAGE");
        std::env::remove_var("HERO_RESOLVE_DNS");

        assert.success();
    }

    #[test]
    fn invalid_port_setting_fails() {
        let temp = TempDir::new().unwrap();
        hero(&temp)
            .env("FUNCTIONS_CUSTOMHANDLER_PORT", "not-a-port")
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("FUNCTIONS_CUSTOMHANDLER_PORT"));
    }
}
