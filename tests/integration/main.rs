//! Integration tests for Marathon

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Binary isolated from the user's config and cache
    fn marathon(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("marathon");
        cmd.current_dir(temp.path())
            .env("MARATHON_PATH", temp.path().join("root"))
            .env("MARATHON_CONFIG", temp.path().join("config.toml"))
            .env("CI", "1");
        cmd
    }

    fn cache_dir(temp: &TempDir) -> PathBuf {
        temp.path().join("root").join("Scripts").join("Cache")
    }

    fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Swift scripts"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("marathon"));
    }

    #[test]
    fn list_empty() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn resolve_local_script_creates_entry() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "hello.swift", "print(\"Hello\")\n");

        marathon(&temp)
            .args(["resolve", "hello"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Resolved Hello"));

        let entries: Vec<PathBuf> = std::fs::read_dir(cache_dir(&temp))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert!(entry.join("Sources/Hello/main.swift").is_file());
        assert!(entry.join("Package.swift").is_file());
        assert!(entry.join("OriginalFile").symlink_metadata().is_ok());

        marathon(&temp)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hello.swift"));
    }

    #[test]
    fn resolve_missing_script_fails() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["resolve", "missing.swift"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Could not find"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn resolve_shorthand_without_remote_fails() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["resolve", "owner/repo", "--no-remote"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn resolve_unknown_modifier_fails() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["resolve", "owner/repo,tag:1.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("tag:1.0"));
    }

    #[test]
    fn remove_uncached_script_succeeds() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["remove", "never-resolved.swift"])
            .assert()
            .success();
    }

    #[test]
    fn remove_deletes_entry() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "tool.swift", "print(1)\n");

        marathon(&temp).args(["resolve", "tool.swift"]).assert().success();
        assert_eq!(std::fs::read_dir(cache_dir(&temp)).unwrap().count(), 1);

        marathon(&temp)
            .args(["remove", "tool"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed tool"));
        assert_eq!(std::fs::read_dir(cache_dir(&temp)).unwrap().count(), 0);
    }

    #[test]
    fn remove_all_with_yes() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "a.swift", "print(1)\n");
        marathon(&temp).args(["resolve", "a"]).assert().success();

        marathon(&temp)
            .args(["remove", "--all", "--yes"])
            .assert()
            .success();
        assert!(!cache_dir(&temp).exists());
    }

    #[test]
    fn list_collects_scripts_that_were_deleted() {
        let temp = TempDir::new().unwrap();
        let script = write_script(temp.path(), "gone.swift", "print(1)\n");
        marathon(&temp).args(["resolve", "gone"]).assert().success();

        std::fs::remove_file(script).unwrap();
        marathon(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
        assert_eq!(std::fs::read_dir(cache_dir(&temp)).unwrap().count(), 0);
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[remote]"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        marathon(&temp).args(["config", "init"]).assert().success();
        assert!(temp.path().join("config.toml").is_file());
    }

    #[test]
    fn completions_generate() {
        let temp = TempDir::new().unwrap();
        marathon(&temp)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("marathon"));
    }
}
