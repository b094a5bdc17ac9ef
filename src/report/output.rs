//! Output folder layout and file writing.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CHARTS_DIR: &str = "charts";
pub const TABLES_DIR: &str = "tables";
pub const TEXT_REPORTS_DIR: &str = "text_reports";
pub const ANIME_LISTS_DIR: &str = "anime_lists";

/// Timestamp format used in output folder names.
pub const FOLDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create output folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A run's output folder and its fixed subfolders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub charts: PathBuf,
    pub tables: PathBuf,
    pub text_reports: PathBuf,
    pub anime_lists: PathBuf,
}

impl OutputLayout {
    /// `<base>_<timestamp>`, e.g. `./anime_analysis_output_2024-05-01_12-00-00`.
    pub fn timestamped_root(base: &Path, timestamp: &str) -> PathBuf {
        let mut name = OsString::from(base.as_os_str());
        name.push("_");
        name.push(timestamp);
        PathBuf::from(name)
    }

    /// Create the folder tree. Existing folders are reused.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let root = root.into();
        let layout = Self {
            charts: root.join(CHARTS_DIR),
            tables: root.join(TABLES_DIR),
            text_reports: root.join(TEXT_REPORTS_DIR),
            anime_lists: root.join(ANIME_LISTS_DIR),
            root,
        };

        for dir in [
            &layout.root,
            &layout.charts,
            &layout.tables,
            &layout.text_reports,
            &layout.anime_lists,
        ] {
            fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(layout)
    }

    /// Reveal the folder in the desktop file browser. Failure is only logged.
    pub fn open_in_file_browser(&self) {
        match open::that(&self.root) {
            Ok(()) => log::info!("Opening output folder {}", self.root.display()),
            Err(e) => {
                log::info!("Could not open the output folder automatically: {}", e);
                log::info!("Please open it manually: {}", absolute_display(&self.root));
            }
        }
    }
}

fn absolute_display(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Write a UTF-8 text file.
pub fn save_to_file(path: &Path, content: &str) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("File saved: {}", path.display());
    Ok(())
}

/// File-name-safe form of a genre name.
pub fn file_slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_timestamped_root() {
        let root = OutputLayout::timestamped_root(
            Path::new("./anime_analysis_output"),
            "2024-05-01_12-00-00",
        );
        assert_eq!(
            root,
            PathBuf::from("./anime_analysis_output_2024-05-01_12-00-00")
        );
    }

    #[test]
    fn test_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("report");

        let first = OutputLayout::create(&root).unwrap();
        let second = OutputLayout::create(&root).unwrap();

        assert_eq!(first, second);
        for sub in [CHARTS_DIR, TABLES_DIR, TEXT_REPORTS_DIR, ANIME_LISTS_DIR] {
            assert!(root.join(sub).is_dir());
        }
    }

    #[test]
    fn test_save_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");

        save_to_file(&path, "hello").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert!(save_to_file(&dir.path().join("missing/notes.txt"), "x").is_err());
    }

    #[test]
    fn test_file_slug() {
        assert_eq!(file_slug("Sci-Fi"), "Sci-Fi");
        assert_eq!(file_slug("Slice of Life"), "Slice_of_Life");
        assert_eq!(file_slug("Shoujo Ai/Yuri"), "Shoujo_Ai_Yuri");
        assert_eq!(file_slug("  "), "unnamed");
    }
}
