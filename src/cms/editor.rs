//! External editor integration for authoring post content.
//!
//! The [`TextEditor`] trait is what the command layer depends on; the
//! production [`SystemEditor`] spawns the user's editor on a temp file, and
//! tests substitute a scripted implementation.

use crate::error::{CmsError, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Something that can author post content interactively.
pub trait TextEditor {
    /// Opens the editor seeded with a template and the existing content,
    /// returning the edited text with template comments stripped.
    fn edit_content(
        &self,
        title: &str,
        author: &str,
        existing_content: &str,
        is_update: bool,
    ) -> Result<String>;

    fn is_available(&self) -> bool;

    /// Human-readable description, used in diagnostics.
    fn describe(&self) -> String;
}

/// Where the editor command came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorSource {
    Config,
    Env(&'static str),
    Fallback,
}

/// Runs the user's configured editor as a child process attached to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEditor {
    command: String,
    args: Vec<String>,
    source: EditorSource,
}

impl SystemEditor {
    /// Picks the editor: explicit config value, then `$EDITOR`, then
    /// `$VISUAL`, then a platform default.
    pub fn detect(configured: Option<&str>) -> Self {
        if let Some(cmd) = configured.filter(|c| !c.trim().is_empty()) {
            return Self::from_command_line(cmd, EditorSource::Config);
        }
        for var in ["EDITOR", "VISUAL"] {
            if let Ok(cmd) = env::var(var) {
                if !cmd.trim().is_empty() {
                    return Self::from_command_line(&cmd, EditorSource::Env(var));
                }
            }
        }
        Self::from_command_line(default_editor(), EditorSource::Fallback)
    }

    /// Splits a command line such as `code --wait` into program and arguments.
    pub fn from_command_line(line: &str, source: EditorSource) -> Self {
        let mut parts = line.split_whitespace().map(str::to_string);
        let command = parts.next().unwrap_or_else(|| default_editor().to_string());
        Self {
            command,
            args: parts.collect(),
            source,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Writes `initial` to a temp file, runs the editor on it and returns
    /// the trimmed result.
    pub fn edit_raw(&self, initial: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("cms-edit-")
            .suffix(".md")
            .tempfile()
            .map_err(|e| CmsError::Editor(format!("failed to create temp file: {}", e)))?;
        file.write_all(initial.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| CmsError::Editor(format!("failed to write initial content: {}", e)))?;

        debug!(editor = %self.command, path = %file.path().display(), "launching editor");
        let status = Command::new(&self.command)
            .args(&self.args)
            .arg(file.path())
            .status()
            .map_err(|e| {
                CmsError::Editor(format!("failed to launch editor '{}': {}", self.command, e))
            })?;

        if !status.success() {
            return Err(CmsError::Editor(format!(
                "editor '{}' exited with {}",
                self.command, status
            )));
        }

        let edited = fs::read_to_string(file.path())
            .map_err(|e| CmsError::Editor(format!("failed to read edited content: {}", e)))?;
        Ok(edited.trim().to_string())
    }
}

impl TextEditor for SystemEditor {
    fn edit_content(
        &self,
        title: &str,
        author: &str,
        existing_content: &str,
        is_update: bool,
    ) -> Result<String> {
        let template = render_template(title, author, existing_content, is_update);
        let edited = self.edit_raw(&template)?;
        Ok(strip_comments(&edited))
    }

    fn is_available(&self) -> bool {
        is_on_path(&self.command)
    }

    fn describe(&self) -> String {
        match &self.source {
            EditorSource::Config => format!("{} (from config)", self.command),
            EditorSource::Env(var) => format!("{} (from {} env var)", self.command, var),
            EditorSource::Fallback => format!("{} (default fallback)", self.command),
        }
    }
}

fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "nano"
    }
}

fn is_on_path(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| {
        let full = dir.join(program);
        full.is_file() || (cfg!(windows) && full.with_extension("exe").is_file())
    })
}

/// The buffer shown to the user. Header lines start with `#` and are
/// stripped on save.
pub fn render_template(title: &str, author: &str, existing_content: &str, is_update: bool) -> String {
    let mut out = String::new();
    if is_update {
        out.push_str("# Editing Post\n");
    } else {
        out.push_str("# Creating New Post\n");
    }
    out.push_str("#\n");
    if !title.is_empty() {
        out.push_str(&format!("# Title: {}\n", title));
    }
    if !author.is_empty() {
        out.push_str(&format!("# Author: {}\n", author));
    }
    out.push_str("#\n");
    out.push_str("# Write your post content below this line.\n");
    out.push_str("# Lines starting with '#' are comments and will be ignored.\n");
    out.push_str("#\n\n");
    out.push_str(existing_content);
    out
}

/// Drops comment lines and blank lines, then trims the result.
pub fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
