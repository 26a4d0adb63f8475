/// End-to-end tests for the CLI
///
/// Every run gets its own cache and config directories so the developer's
/// environment never leaks in, and no test talks to the real package index.
mod test_utilities;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use test_utilities::fixtures::SitePackages;

fn pipinfo(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pipinfo");
    cmd.env("PIPINFO_CACHE_DIR", home.path().join("cache"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("PIPINFO_INDEX_URL", "http://127.0.0.1:9")
        .env_remove("PIPINFO_DEBUG")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_site() -> SitePackages {
    SitePackages::new()
        .dist_info("requests", "2.31.0", &["urllib3<3,>=1.21.1", "certifi>=2017.4.17"])
        .dist_info("urllib3", "2.0.7", &[])
        .dist_info("certifi", "2023.11.17", &[])
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - normal execution
    #[test]
    fn test_exit_code_success() {
        let home = TempDir::new().unwrap();
        let site = sample_site();
        pipinfo(&home).arg(site.path()).assert().code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("pipinfo").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("pipinfo")
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("pipinfo"));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("pipinfo")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("pipinfo")
            .args(["-f", "invalid_format"])
            .assert()
            .code(2);
    }

    /// Exit code 2: Contradicting selections
    #[test]
    fn test_exit_code_conflicting_selections() {
        cargo_bin_cmd!("pipinfo")
            .args(["--outdated", "--latest"])
            .assert()
            .code(2);
        cargo_bin_cmd!("pipinfo")
            .args(["-I", "-V"])
            .assert()
            .code(2);
    }

    /// Exit code 2: Concurrency outside 1..=64
    #[test]
    fn test_exit_code_jobs_out_of_range() {
        cargo_bin_cmd!("pipinfo")
            .args(["-j", "0"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - no usable installation root
    #[test]
    fn test_exit_code_application_error_nonexistent_path() {
        let home = TempDir::new().unwrap();
        pipinfo(&home)
            .arg("/nonexistent/lib/python3.12/site-packages")
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No usable installation roots"));
    }

    /// Exit code 3: Every configured interpreter fails
    #[test]
    fn test_exit_code_no_interpreter() {
        let home = TempDir::new().unwrap();
        pipinfo(&home)
            .args(["--interpreter", "pipinfo-no-such-python-3.99"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No usable installation roots"));
    }
}

mod report_tests {
    use super::*;

    #[test]
    fn test_table_lists_every_package() {
        let home = TempDir::new().unwrap();
        let site = sample_site();

        pipinfo(&home)
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Package"))
            .stdout(predicate::str::contains("requests"))
            .stdout(predicate::str::contains("urllib3"))
            .stdout(predicate::str::contains("The certifi package"))
            .stdout(predicate::str::contains("3 packages"));
    }

    #[test]
    fn test_json_output() {
        let home = TempDir::new().unwrap();
        let site = sample_site();

        let output = pipinfo(&home)
            .args(["--format", "json"])
            .arg(site.path())
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["summary"]["total"], 3);
        assert_eq!(json["summary"]["required"], 2);
        let names: Vec<&str> = json["packages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["certifi", "requests", "urllib3"]);
    }

    #[test]
    fn test_duplicates_across_directories() {
        let home = TempDir::new().unwrap();
        let system = SitePackages::new().dist_info("six", "1.15.0", &[]);
        let user = SitePackages::new().dist_info("six", "1.16.0", &[]);

        pipinfo(&home)
            .arg(system.path())
            .arg(user.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("*six*"))
            .stdout(predicate::str::contains("2 packages, 2 duplicate"));
    }

    #[test]
    fn test_not_required_selection() {
        let home = TempDir::new().unwrap();
        let site = sample_site();

        pipinfo(&home)
            .arg("--not-required")
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("requests"))
            .stdout(predicate::str::contains("urllib3").not())
            .stdout(predicate::str::contains("1 package"));
    }

    #[test]
    fn test_scope_selection() {
        let home = TempDir::new().unwrap();
        let site = sample_site();

        pipinfo(&home)
            .args(["--scope", "system", "--user"])
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0 packages"));

        pipinfo(&home)
            .args(["--scope", "system", "--system"])
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("3 packages"));
    }

    #[test]
    fn test_malformed_record_is_a_warning() {
        let home = TempDir::new().unwrap();
        let site = sample_site().broken_dist_info("broken", "1.0");

        pipinfo(&home)
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("3 packages"))
            .stderr(predicate::str::contains("Warning"));
    }

    #[test]
    fn test_output_file() {
        let home = TempDir::new().unwrap();
        let site = sample_site();
        let output_path = home.path().join("report.json");

        pipinfo(&home)
            .args(["-f", "json", "-o"])
            .arg(&output_path)
            .arg(site.path())
            .assert()
            .success();

        let content = fs::read_to_string(&output_path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["packages"].as_array().unwrap().len(), 3);
    }
}

mod remote_check_tests {
    use super::*;

    fn index_with_latest(
        server: &mut mockito::Server,
        name: &str,
        latest: &str,
        hits: usize,
    ) -> mockito::Mock {
        server
            .mock("GET", format!("/pypi/{}/json", name).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"info": {{"name": "{}", "version": "{}"}}, "urls": []}}"#,
                name, latest
            ))
            .expect(hits)
            .create()
    }

    #[test]
    fn test_outdated_selection_checks_latest_versions() {
        let home = TempDir::new().unwrap();
        let site = SitePackages::new()
            .dist_info("requests", "2.31.0", &[])
            .dist_info("six", "1.16.0", &[]);

        let mut server = mockito::Server::new();
        let _requests = index_with_latest(&mut server, "requests", "2.32.3", 1);
        let _six = index_with_latest(&mut server, "six", "1.16.0", 1);

        pipinfo(&home)
            .env("PIPINFO_INDEX_URL", server.url())
            .args(["--outdated", "--info"])
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("^2.31.0^"))
            .stdout(predicate::str::contains("Version 2.32.3 is available"))
            .stdout(predicate::str::contains("six").not())
            .stdout(predicate::str::contains("1 package, 1 outdated"));
    }

    #[test]
    fn test_second_run_is_served_from_cache() {
        let home = TempDir::new().unwrap();
        let site = SitePackages::new().dist_info("requests", "2.31.0", &[]);

        let mut server = mockito::Server::new();
        let mock = index_with_latest(&mut server, "requests", "2.32.3", 1);

        for _ in 0..2 {
            pipinfo(&home)
                .env("PIPINFO_INDEX_URL", server.url())
                .arg("--check-latest")
                .arg(site.path())
                .assert()
                .success()
                .stdout(predicate::str::contains("1 outdated"));
        }
        mock.assert();
    }

    #[test]
    fn test_unreachable_index_marks_facets_unknown() {
        let home = TempDir::new().unwrap();
        let site = SitePackages::new().dist_info("requests", "2.31.0", &[]);

        let mut server = mockito::Server::new();
        let _failing = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .create();

        pipinfo(&home)
            .env("PIPINFO_INDEX_URL", server.url())
            .args(["--check-latest", "--format", "json"])
            .arg(site.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""status": "failed""#))
            .stderr(predicate::str::contains("remote lookup(s) failed"));
    }
}
