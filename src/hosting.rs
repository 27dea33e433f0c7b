//! The hosting module manages the per-project stylesheet and script published
//! under a public base URL. Files live in two directories below a hosting
//! root, `cssstyles/` and `scripts/`, and are named `<project>_<unix_ts>`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{info, warn};

use crate::constants::{HOSTED_CSS_DIR, HOSTED_JS_DIR};

/// Hosted asset directories and the public URL they are served from.
#[derive(Debug, Clone)]
pub struct HostedFiles {
    root: PathBuf,
    base_url: String,
}

/// Stylesheet and script filenames for a project upload made at `timestamp`.
pub fn hosted_filenames(project_id: i64, timestamp: i64) -> (String, String) {
    (
        format!("{project_id}_{timestamp}.css"),
        format!("{project_id}_{timestamp}.js"),
    )
}

impl HostedFiles {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL of a hosted stylesheet.
    pub fn css_url(&self, filename: &str) -> String {
        format!("{}/{HOSTED_CSS_DIR}/{filename}", self.base_url)
    }

    /// Public URL of a hosted script.
    pub fn js_url(&self, filename: &str) -> String {
        format!("{}/{HOSTED_JS_DIR}/{filename}", self.base_url)
    }

    /// Writes a stylesheet to the hosting directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the filename is not a plain file name or the file
    /// cannot be written.
    pub fn publish_css(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        self.publish(HOSTED_CSS_DIR, filename, contents)
    }

    /// Writes a script to the hosting directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the filename is not a plain file name or the file
    /// cannot be written.
    pub fn publish_js(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        self.publish(HOSTED_JS_DIR, filename, contents)
    }

    /// Contents of a hosted stylesheet, empty if it is missing or unreadable.
    pub fn read_css(&self, filename: &str) -> String {
        self.read(HOSTED_CSS_DIR, filename)
    }

    /// Contents of a hosted script, empty if it is missing or unreadable.
    pub fn read_js(&self, filename: &str) -> String {
        self.read(HOSTED_JS_DIR, filename)
    }

    fn resolve(&self, directory: &str, filename: &str) -> Result<PathBuf> {
        let plain = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        if !plain {
            bail!("Invalid hosted filename: {filename}");
        }
        Ok(self.root.join(directory).join(filename))
    }

    fn publish(&self, directory: &str, filename: &str, contents: &str) -> Result<PathBuf> {
        let path = self.resolve(directory, filename)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, contents).context(format!("Failed to write: {}", path.display()))?;
        info!("Published {}", path.display());
        Ok(path)
    }

    fn read(&self, directory: &str, filename: &str) -> String {
        let path = match self.resolve(directory, filename) {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}");
                return String::new();
            }
        };
        match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Hosted file is missing: {}", path.display());
                String::new()
            }
            Err(e) => {
                warn!("Failed to read hosted file {}: {e}", path.display());
                String::new()
            }
        }
    }
}
