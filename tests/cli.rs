use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("blog.db")
    }

    fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// `cms` with an isolated config dir and no colors, without a database flag.
    fn bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("cms").unwrap();
        cmd.current_dir(self.dir.path())
            .env("CMS_HOME", self.home())
            .env("NO_COLOR", "1")
            .env_remove("CMS_DATABASE_URL")
            .env_remove("CMS_LOG");
        cmd
    }

    fn cms(&self) -> Command {
        let mut cmd = self.bare();
        cmd.arg("--database-url")
            .arg(format!("sqlite://{}", self.db().display()));
        cmd
    }

    fn create(&self, args: &[&str]) {
        self.cms()
            .args(["posts", "create"])
            .args(args)
            .assert()
            .success();
    }

    fn get_json(&self, args: &[&str]) -> Value {
        let out = self
            .cms()
            .args(["posts", "get", "--json"])
            .args(args)
            .output()
            .unwrap();
        assert!(out.status.success(), "get failed: {:?}", out);
        serde_json::from_slice(&out.stdout).unwrap()
    }

    fn list_json(&self, args: &[&str]) -> Vec<Value> {
        let out = self
            .cms()
            .args(["posts", "list", "--json"])
            .args(args)
            .output()
            .unwrap();
        assert!(out.status.success(), "list failed: {:?}", out);
        serde_json::from_slice(&out.stdout).unwrap()
    }
}

fn titles(posts: &[Value]) -> Vec<&str> {
    posts.iter().map(|p| p["title"].as_str().unwrap()).collect()
}

#[test]
fn create_then_get_by_slug() {
    let sb = Sandbox::new();
    sb.cms()
        .args(["posts", "create", "-t", "Hello World", "-c", "First!", "-a", "Ann"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Post created (id 1): Hello World"));

    let post = sb.get_json(&["--slug", "hello-world"]);
    assert_eq!(post["id"], 1);
    assert_eq!(post["content"], "First!");
    assert_eq!(post["author"], "Ann");
    assert_eq!(post["created_at"], post["updated_at"]);
}

#[test]
fn add_alias_and_null_fields() {
    let sb = Sandbox::new();
    sb.create(&["-t", "Bare", "--no-slug"]);
    sb.cms()
        .args(["posts", "add", "-t", "Also bare", "--no-slug"])
        .assert()
        .success();

    let post = sb.get_json(&["--id", "1"]);
    assert!(post["content"].is_null());
    assert!(post["author"].is_null());
    assert!(post["slug"].is_null());
}

#[test]
fn duplicate_slug_fails() {
    let sb = Sandbox::new();
    sb.create(&["-t", "Same"]);
    sb.cms()
        .args(["posts", "create", "-t", "Same"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: create post: "))
        .stderr(predicate::str::contains("already used"));
}

#[test]
fn get_requires_one_identifier() {
    let sb = Sandbox::new();
    sb.cms().args(["posts", "get"]).assert().failure();
    sb.cms()
        .args(["posts", "get", "--id", "1", "--slug", "x"])
        .assert()
        .failure();
}

#[test]
fn get_missing_post_fails() {
    let sb = Sandbox::new();
    sb.cms()
        .args(["posts", "get", "--id", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("get post: post not found: id 42"));
}

#[test]
fn get_prints_details() {
    let sb = Sandbox::new();
    sb.create(&["-t", "Readable", "-c", "Body text", "-a", "Bo"]);
    sb.cms()
        .args(["posts", "get", "-i", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Readable"))
        .stdout(predicate::str::contains("Body text"))
        .stdout(predicate::str::contains("readable"));
}

#[test]
fn update_keeps_unset_fields() {
    let sb = Sandbox::new();
    sb.create(&["-t", "A", "-c", "B", "-a", "C", "-s", "a"]);
    let before = sb.get_json(&["--id", "1"]);

    sb.cms()
        .args(["posts", "update", "--id", "1", "--title", "Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Post updated (id 1): Z"));

    let after = sb.get_json(&["--slug", "a"]);
    assert_eq!(after["title"], "Z");
    assert_eq!(after["content"], "B");
    assert_eq!(after["author"], "C");
    assert_eq!(after["created_at"], before["created_at"]);
    assert_ne!(after["updated_at"], before["updated_at"]);
}

#[test]
fn update_by_slug_with_edit_alias() {
    let sb = Sandbox::new();
    sb.create(&["-t", "Post", "-s", "post"]);
    sb.cms()
        .args(["posts", "edit", "-s", "post", "-a", "Dee", "--new-slug", "renamed"])
        .assert()
        .success();

    let post = sb.get_json(&["--slug", "renamed"]);
    assert_eq!(post["author"], "Dee");
}

#[test]
fn update_without_fields_fails() {
    let sb = Sandbox::new();
    sb.create(&["-t", "Post"]);
    sb.cms()
        .args(["posts", "update", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one field"));
}

#[test]
fn update_missing_post_fails() {
    let sb = Sandbox::new();
    sb.cms()
        .args(["posts", "update", "--slug", "nope", "--title", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("post not found"));
}

#[test]
fn delete_needs_force() {
    let sb = Sandbox::new();
    sb.create(&["-t", "Keep me"]);

    sb.cms()
        .args(["posts", "delete", "--id", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    sb.get_json(&["--id", "1"]);

    sb.cms()
        .args(["posts", "remove", "--slug", "keep-me", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Post deleted"));
    sb.cms().args(["posts", "get", "--id", "1"]).assert().failure();
}

#[test]
fn delete_missing_post_succeeds() {
    let sb = Sandbox::new();
    sb.cms()
        .args(["posts", "delete", "--id", "999999", "-f"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));
}

#[test]
fn list_orderings() {
    let sb = Sandbox::new();
    for title in ["one", "two", "three"] {
        sb.create(&["-t", title]);
    }

    assert_eq!(titles(&sb.list_json(&[])), vec!["one", "two", "three"]);
    assert_eq!(titles(&sb.list_json(&["--limit", "2"])), vec!["three", "two"]);
    assert_eq!(
        titles(&sb.list_json(&["--limit", "2", "--offset", "2"])),
        vec!["one"]
    );
    assert!(sb.list_json(&["--limit", "5", "--offset", "10"]).is_empty());
    assert_eq!(sb.list_json(&["--limit", "-1"]).len(), 3);
}

#[test]
fn list_human_output() {
    let sb = Sandbox::new();
    sb.cms()
        .args(["posts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found."));

    sb.create(&["-t", "Listed", "-a", "Eve"]);
    sb.cms()
        .args(["posts", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Listed by Eve"))
        .stdout(predicate::str::contains("listed"));
}

#[test]
fn editor_unavailable_fails_create() {
    let sb = Sandbox::new();
    sb.cms()
        .env("EDITOR", "cms-test-missing-editor")
        .args(["posts", "create", "-t", "Needs editor", "--editor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("editor not available"));
    assert!(sb.list_json(&[]).is_empty());
}

#[test]
fn config_set_and_show() {
    let sb = Sandbox::new();
    sb.bare()
        .args(["config", "default-limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default-limit set to '1'"));
    sb.bare()
        .args(["config", "default-limit"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
    sb.bare()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("auto-slug = true"));
    sb.bare()
        .args(["config", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn config_controls_defaults() {
    let sb = Sandbox::new();
    sb.bare().args(["config", "auto-slug", "false"]).assert().success();
    sb.bare().args(["config", "default-limit", "1"]).assert().success();

    sb.create(&["-t", "First"]);
    sb.create(&["-t", "Second"]);

    let listed = sb.list_json(&[]);
    assert_eq!(titles(&listed), vec!["Second"]);
    assert!(listed[0]["slug"].is_null());
}

#[test]
fn database_url_from_env_and_config() {
    let sb = Sandbox::new();
    let env_db = sb.dir.path().join("env.db");
    sb.bare()
        .env("CMS_DATABASE_URL", &env_db)
        .args(["posts", "create", "-t", "From env"])
        .assert()
        .success();
    assert!(env_db.exists());

    let config_db = sb.dir.path().join("config.db");
    sb.bare()
        .args(["config", "database-url"])
        .arg(&config_db)
        .assert()
        .success();
    sb.bare()
        .args(["posts", "create", "-t", "From config"])
        .assert()
        .success();
    assert!(config_db.exists());
    assert!(!sb.dir.path().join("cms.db").exists());
}

#[test]
fn default_database_in_working_directory() {
    let sb = Sandbox::new();
    sb.bare()
        .args(["posts", "create", "-t", "Local"])
        .assert()
        .success();
    assert!(sb.dir.path().join("cms.db").exists());
}

#[cfg(unix)]
#[test]
fn editor_authors_content_on_create_and_update() {
    use std::os::unix::fs::PermissionsExt;

    let sb = Sandbox::new();
    let script = sb.dir.path().join("fake-editor.sh");
    std::fs::write(&script, "#!/bin/sh\nprintf '# header\\nWritten in editor\\n' > \"$1\"\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    sb.cms()
        .env("EDITOR", &script)
        .args(["posts", "create", "-t", "Edited", "--editor"])
        .assert()
        .success();
    assert_eq!(sb.get_json(&["--slug", "edited"])["content"], "Written in editor");

    sb.cms()
        .env("EDITOR", &script)
        .args(["posts", "update", "--slug", "edited", "-c", "ignored", "-e"])
        .assert()
        .success();
    assert_eq!(sb.get_json(&["--slug", "edited"])["content"], "Written in editor");
}
