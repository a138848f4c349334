// src/infrastructure/renderer.rs
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::Builder;
use tracing::{debug, instrument};

use crate::constants::BROWSER_LAUNCH_DELAY_MS;

/// Writes rendered notes to a temporary page and hands it to the browser
#[derive(Debug, Default)]
pub struct ContentRenderer {
    // Keep last temp dir alive to prevent deletion
    temp_dir: Option<tempfile::TempDir>,
}

impl ContentRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_temp_file(&mut self, note_id: i64, content: &str) -> Result<PathBuf> {
        let temp_dir = Builder::new()
            .prefix("snappad-")
            .rand_bytes(5)
            .tempdir()
            .context("Failed to create temporary directory")?;

        let file_path = temp_dir.path().join(format!("note-{note_id}.html"));

        File::create(&file_path)
            .with_context(|| format!("Failed to create temp file at {}", file_path.display()))?
            .write_all(content.as_bytes())
            .context("Failed to write content to temporary file")?;

        debug!(path = %file_path.display(), "Wrote note page");
        self.temp_dir = Some(temp_dir);

        Ok(file_path)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn open_in_browser(&self, path: &Path) -> Result<()> {
        let path_str = path.to_str().context("Failed to convert path to string")?;

        #[cfg(target_os = "macos")]
        {
            std::process::Command::new("open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "windows")]
        {
            std::process::Command::new("cmd")
                .args(["/C", "start", path_str])
                .spawn()
                .context("Failed to open browser")?;
        }
        #[cfg(target_os = "linux")]
        {
            std::process::Command::new("xdg-open")
                .arg(path_str)
                .spawn()
                .context("Failed to open browser")?;
        }

        // The browser reads the file asynchronously; the temp dir goes away with us
        tokio::time::sleep(Duration::from_millis(BROWSER_LAUNCH_DELAY_MS)).await;

        Ok(())
    }
}
