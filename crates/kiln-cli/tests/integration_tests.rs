//! End-to-end tests for the kiln binary.
//!
//! Every test points the store/template/scripts roots at its own temp
//! directory via environment variables, so tests never touch a real
//! user configuration and can run in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Per-test sandbox: working directory, store snapshot, template root
/// and scripts root, all under one temp dir.
struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::create_dir_all(temp.path().join("scripts")).unwrap();
        fs::create_dir_all(temp.path().join("work")).unwrap();
        Self { temp }
    }

    fn work_dir(&self) -> PathBuf {
        self.temp.path().join("work")
    }

    fn template_root(&self) -> PathBuf {
        self.temp.path().join("templates")
    }

    fn scripts_root(&self) -> PathBuf {
        self.temp.path().join("scripts")
    }

    fn kiln(&self) -> Command {
        let mut cmd = Command::cargo_bin("kiln").unwrap();
        cmd.current_dir(self.work_dir())
            .env("KILN_STORE_PATH", self.temp.path().join("store.json"))
            .env("KILN_TEMPLATE_ROOT", self.template_root())
            .env("KILN_SCRIPTS_ROOT", self.scripts_root())
            .env("NO_COLOR", "1");
        cmd
    }

    fn example_config(&self) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/example-class-export.toml")
    }

    /// Import the shipped example config (label `exp`) and seed the
    /// README template it references.
    fn import_example(&self) {
        fs::write(self.template_root().join("README.md"), "# example readme").unwrap();
        self.kiln()
            .args(["class", "import", "--config"])
            .arg(self.example_config())
            .assert()
            .success()
            .stdout(predicate::str::contains("Imported class 'exp'"));
    }
}

// ── argument surface ──────────────────────────────────────────────────────────

#[test]
fn help_shows_subcommands() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("class"))
        .stdout(predicate::str::contains("create"));
}

#[test]
fn version_matches_cargo() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn class_import_without_source_is_an_argument_error() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .args(["class", "import"])
        .assert()
        .failure()
        .code(2);
}

// ── class lifecycle ───────────────────────────────────────────────────────────

#[test]
fn imported_class_is_listed() {
    let sandbox = Sandbox::new();
    sandbox.import_example();

    sandbox
        .kiln()
        .args(["class", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exp"))
        .stdout(predicate::str::contains("default"));
}

#[test]
fn missing_config_is_reported_but_batch_succeeds() {
    // Per-item failures never fail the command; only argument validation
    // does.
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .args(["class", "import", "--config", "does-not-exist.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does-not-exist.toml"));
}

#[test]
fn export_round_trips_through_import() {
    let sandbox = Sandbox::new();
    sandbox.import_example();

    sandbox
        .kiln()
        .args(["class", "export", "exp", "--destination", "."])
        .assert()
        .success();

    let exported = sandbox.work_dir().join("exp.toml");
    let content = fs::read_to_string(&exported).unwrap();
    assert!(content.contains("[info]"));
    assert!(content.contains("exampleFolder/"));

    // Re-importing the exported file collides on the label, which is a
    // per-item failure, not a parse error.
    sandbox
        .kiln()
        .args(["class", "import", "--config", "exp.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exp.toml:"));
}

#[test]
fn default_class_cannot_be_removed() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .args(["class", "rm", "default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("protected"));

    sandbox
        .kiln()
        .args(["class", "ls"])
        .assert()
        .stdout(predicate::str::contains("default"));
}

#[test]
fn class_rm_all_keeps_the_default() {
    let sandbox = Sandbox::new();
    sandbox.import_example();

    sandbox
        .kiln()
        .args(["class", "rm", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default kept"));

    sandbox
        .kiln()
        .args(["class", "ls"])
        .assert()
        .stdout(predicate::str::contains("Classes (1)"));
}

#[test]
fn directory_import_writes_a_config_artifact() {
    let sandbox = Sandbox::new();
    let app = sandbox.temp.path().join("legacy-app");
    fs::create_dir_all(app.join("src")).unwrap();
    fs::write(app.join("src/main.rs"), "fn main() {}").unwrap();

    sandbox
        .kiln()
        .args(["class", "import", "--directory"])
        .arg(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported class 'legacy-app'"));

    assert!(sandbox.work_dir().join("legacy-app.toml").exists());
}

#[test]
fn remote_import_mirrors_a_skeleton_only() {
    let sandbox = Sandbox::new();
    let mirror = sandbox.temp.path().join("widget");
    fs::create_dir_all(mirror.join("src")).unwrap();
    fs::write(mirror.join("src/lib.rs"), "pub fn x() {}").unwrap();

    sandbox
        .kiln()
        .args(["class", "import", "--remote-repo"])
        .arg(&mirror)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported class 'widget'"));

    sandbox
        .kiln()
        .args(["create", "widget", "demo"])
        .assert()
        .success();

    // Contents are never fetched: the file exists but is empty.
    let lib = sandbox.work_dir().join("demo/src/lib.rs");
    assert_eq!(fs::read_to_string(lib).unwrap(), "");
}

// ── project materialization ───────────────────────────────────────────────────

#[test]
fn create_materializes_the_example_class() {
    let sandbox = Sandbox::new();
    sandbox.import_example();

    sandbox
        .kiln()
        .args(["create", "exp", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'demo' created"));

    let demo = sandbox.work_dir().join("demo");
    assert!(demo.join("exampleFolder").is_dir());
    assert!(demo.join("foo/bar").is_dir());
    assert_eq!(
        fs::read_to_string(demo.join("README.md")).unwrap(),
        "# example readme"
    );
    assert_eq!(
        fs::read_to_string(demo.join("exampleFolder/test.txt")).unwrap(),
        ""
    );
}

#[test]
fn create_registers_the_project() {
    let sandbox = Sandbox::new();
    sandbox.import_example();
    sandbox.kiln().args(["create", "exp", "demo"]).assert().success();

    sandbox
        .kiln()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("exp"));
}

#[test]
fn create_batch_continues_past_a_collision() {
    let sandbox = Sandbox::new();
    sandbox.import_example();
    sandbox.kiln().args(["create", "exp", "demo"]).assert().success();

    // "demo" collides and is skipped in quiet mode; "other" must still
    // be materialized, and the batch exits zero.
    sandbox
        .kiln()
        .args(["--quiet", "create", "exp", "demo", "other"])
        .assert()
        .success();

    assert!(sandbox.work_dir().join("other/foo/bar").is_dir());
}

#[test]
fn create_replace_recreates_the_tree() {
    let sandbox = Sandbox::new();
    sandbox.import_example();
    sandbox.kiln().args(["create", "exp", "demo"]).assert().success();

    let marker = sandbox.work_dir().join("demo/leftover.txt");
    fs::write(&marker, "stale").unwrap();

    sandbox
        .kiln()
        .args(["create", "exp", "demo", "--replace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    assert!(!marker.exists(), "replace must rebuild from scratch");
    assert!(sandbox.work_dir().join("demo/exampleFolder").is_dir());
}

#[test]
fn create_with_unknown_label_exits_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .args(["create", "nope", "demo"])
        .assert()
        .failure()
        .code(3);
}

#[cfg(unix)]
#[test]
fn create_runs_class_scripts_inside_the_project_root() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new();
    let script = sandbox.scripts_root().join("touch_marker.sh");
    fs::write(&script, "#!/bin/sh\ntouch script-ran\n").unwrap();
    let mut perms = fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).unwrap();

    fs::write(
        sandbox.work_dir().join("scripted.toml"),
        "[info]\nname = \"scripted\"\nlabel = \"scripted\"\n\n\
         [[folders]]\ntarget = \"src/\"\n\n\
         [[scripts]]\nname = \"touch_marker.sh\"\nsudo = false\n",
    )
    .unwrap();

    sandbox
        .kiln()
        .args(["class", "import", "--config", "scripted.toml"])
        .assert()
        .success();
    sandbox
        .kiln()
        .args(["create", "scripted", "demo"])
        .assert()
        .success();

    assert!(sandbox.work_dir().join("demo/script-ran").exists());
}

// ── project records ───────────────────────────────────────────────────────────

#[test]
fn add_registers_an_existing_directory() {
    let sandbox = Sandbox::new();
    sandbox.import_example();
    fs::create_dir_all(sandbox.work_dir().join("existing-app")).unwrap();

    sandbox
        .kiln()
        .args(["add", "exp", "existing-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 'existing-app'"));

    sandbox
        .kiln()
        .arg("ls")
        .assert()
        .stdout(predicate::str::contains("existing-app"));
}

#[test]
fn rm_force_removes_the_record_but_keeps_the_tree() {
    let sandbox = Sandbox::new();
    sandbox.import_example();
    sandbox.kiln().args(["create", "exp", "demo"]).assert().success();

    sandbox
        .kiln()
        .args(["rm", "demo", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed record"));

    assert!(sandbox.work_dir().join("demo").is_dir(), "tree stays on disk");
    sandbox
        .kiln()
        .arg("ls")
        .assert()
        .stdout(predicate::str::contains("Projects (0)"));
}

#[test]
fn rm_without_force_in_quiet_mode_is_cancelled() {
    let sandbox = Sandbox::new();
    sandbox.import_example();
    sandbox.kiln().args(["create", "exp", "demo"]).assert().success();

    sandbox
        .kiln()
        .args(["--quiet", "rm", "demo"])
        .assert()
        .failure()
        .code(2);

    sandbox
        .kiln()
        .arg("ls")
        .assert()
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn rm_unknown_path_is_a_per_item_failure() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .args(["rm", "never-registered", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("never-registered"));
}
