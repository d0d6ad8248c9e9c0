//! CLI execution context.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::output::Output;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "storeforge.toml";

/// Execution context for CLI commands.
pub struct Context {
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Create a context rooted at the current directory.
    pub fn new(output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self { output, cwd })
    }

    /// Find the project root by walking up from the working directory until
    /// a `storeforge.toml` is found.
    pub fn find_project_root(&self) -> Option<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            if current.join(CONFIG_FILE).exists() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Path to the project config file, failing when not inside a project.
    pub fn config_path(&self) -> Result<PathBuf> {
        self.find_project_root()
            .map(|root| root.join(CONFIG_FILE))
            .with_context(|| {
                format!("No {CONFIG_FILE} found in this directory or any parent")
            })
    }
}
