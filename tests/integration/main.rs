//! Integration tests for vlsitech

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn vlsitech() -> Command {
        let mut cmd = cargo_bin_cmd!("vlsitech");
        for var in [
            "VLSITECH_CONFIG",
            "VLSITECH_TECH",
            "VLSITECH_TECH_DIR",
            "VLSITECH_CACHE_DIR",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Write `<root>/ex7/ex7.tech.json` and return the technology directory
    fn write_tech(root: &Path, document: &str) -> PathBuf {
        let dir = root.join("ex7");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("ex7.tech.json"), document).unwrap();
        dir
    }

    const INSTALL_TECH: &str = r#"{
        "name": "Example 7nm",
        "installs": [{ "path": "vendor", "base_var": "VENDOR_HOME" }],
        "libraries": [
            { "name": "stdcells", "lef_file": "vendor/lef/cells.lef" },
            { "name": "sram", "gds_file": "vendor/gds/sram.gds" }
        ]
    }"#;

    #[test]
    fn help_displays() {
        vlsitech()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Technology plugin layer"));
    }

    #[test]
    fn version_displays() {
        vlsitech()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("vlsitech"));
    }

    #[test]
    fn config_path() {
        vlsitech()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        vlsitech()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn explicit_config_must_exist() {
        vlsitech()
            .args(["--config", "/nonexistent/vlsitech.toml", "config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"));
    }

    #[test]
    fn no_technology_selected() {
        vlsitech()
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No technology selected"));
    }

    #[test]
    fn resolve_install_path() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["--set", "VENDOR_HOME=/opt/vendor"])
            .args(["resolve", "vendor/lef/cells.lef", "/abs/file.v"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/opt/vendor/lef/cells.lef"))
            .stdout(predicate::str::contains("/abs/file.v"));
    }

    #[test]
    fn resolve_from_settings_file() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);
        let settings = temp.path().join("settings.yml");
        fs::write(&settings, "VENDOR_HOME: /pdk/vendor\n").unwrap();

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .arg("--settings")
            .arg(&settings)
            .args(["resolve", "vendor/lib/a.lib"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/pdk/vendor/lib/a.lib"));
    }

    #[test]
    fn resolve_with_library_prefix() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["resolve", "--prefix", "mylib=/usr/share/mylib", "mylib/b.v"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/usr/share/mylib/b.v"));
    }

    #[test]
    fn resolve_unknown_prefix_fails() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["resolve", "other/a.lef"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("did not match any tarballs"));
    }

    #[test]
    fn resolve_ambiguous_prefix_fails() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["--set", "VENDOR_HOME=/opt/vendor"])
            .args(["resolve", "--prefix", "vendor=/elsewhere", "vendor/a.lef"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("matched more than one path source"));
    }

    #[test]
    fn resolve_missing_setting_fails() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["resolve", "vendor/a.lef"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Setting VENDOR_HOME not found"));
    }

    #[test]
    fn check_missing_install_fails() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);
        let missing = temp.path().join("not-installed");

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .arg("--set")
            .arg(format!("VENDOR_HOME={}", missing.display()))
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("are missing on disk"));
    }

    #[test]
    fn check_present_install_succeeds() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .arg("--set")
            .arg(format!("VENDOR_HOME={}", temp.path().display()))
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("[OK]"));
    }

    #[test]
    fn extract_without_sources_fails() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), r#"{ "name": "Bare" }"#);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .arg("--cache-dir")
            .arg(temp.path().join("cache"))
            .arg("extract")
            .assert()
            .failure()
            .stderr(predicate::str::contains("neither tarballs nor installs"));
    }

    #[test]
    fn libraries_json() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["libraries", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"lef_file\": \"vendor/lef/cells.lef\""));
    }

    #[test]
    fn libraries_plain() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), INSTALL_TECH);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .args(["libraries", "--format", "plain"])
            .assert()
            .success()
            .stdout("stdcells\nsram\n");
    }

    #[test]
    fn schema_violation_reported() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(temp.path(), r#"{ "installs": [{ "path": "vendor" }] }"#);

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not match the schema"));
    }

    #[test]
    fn tarball_path_leaving_cache_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = write_tech(
            temp.path(),
            r#"{ "tarballs": [{ "path": "../../victim", "base_var": "" }] }"#,
        );

        vlsitech()
            .arg("--tech-dir")
            .arg(&dir)
            .arg("--cache-dir")
            .arg(temp.path().join("cache"))
            .arg("extract")
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not match the schema"));
    }
}

#[cfg(unix)]
mod extraction_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Build `<dir>/<name>` as a tar archive holding `cells.lef`
    fn write_archive(dir: &std::path::Path, name: &str) {
        let file = fs::File::create(dir.join(name)).unwrap();
        let mut builder = tar::Builder::new(file);
        let data = b"VERSION 5.8 ;\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o444);
        header.set_cksum();
        builder
            .append_data(&mut header, "cells.lef", &data[..])
            .unwrap();
        builder.finish().unwrap();
    }

    #[test]
    fn extract_and_resolve_tarball() {
        let temp = TempDir::new().unwrap();
        let tech_dir = temp.path().join("ex7");
        fs::create_dir_all(&tech_dir).unwrap();
        fs::write(
            tech_dir.join("ex7.tech.json"),
            r#"{ "name": "Example 7nm", "tarballs": [{ "path": "pdk.tar", "base_var": "" }] }"#,
        )
        .unwrap();
        write_archive(&tech_dir, "pdk.tar");
        let cache = temp.path().join("cache");

        cargo_bin_cmd!("vlsitech")
            .env_remove("VLSITECH_CONFIG")
            .arg("--tech-dir")
            .arg(&tech_dir)
            .arg("--cache-dir")
            .arg(&cache)
            .arg("extract")
            .assert()
            .success();

        assert!(cache.join("extracted/pdk.tar/cells.lef").is_file());

        cargo_bin_cmd!("vlsitech")
            .env_remove("VLSITECH_CONFIG")
            .arg("--tech-dir")
            .arg(&tech_dir)
            .arg("--cache-dir")
            .arg(&cache)
            .args(["resolve", "pdk.tar/cells.lef"])
            .assert()
            .success()
            .stdout(predicate::str::contains("extracted/pdk.tar/cells.lef"));
    }
}
