use crate::library::LibraryOptions;
use crate::theme::Theme;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plain-text book reader with per-book reading progress.
#[derive(Parser, Debug, Clone)]
#[command(name = "txtreader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "TXTREADER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the reading list (default if no command given).
    List,

    /// Add a text file to the reading list.
    Import {
        /// Path to the text file.
        path: PathBuf,
    },

    /// Read a book, continuing from the saved page.
    Open {
        /// Book name as shown by `list` (file name including extension).
        name: String,

        /// Jump to this page.
        #[arg(short, long, conflicts_with_all = ["next", "prev"])]
        page: Option<u32>,

        /// Turn to the next page.
        #[arg(short, long, conflicts_with = "prev")]
        next: bool,

        /// Turn to the previous page.
        #[arg(long)]
        prev: bool,

        /// Theme override for this session.
        #[arg(short, long, value_enum)]
        theme: Option<Theme>,
    },

    /// Remove a book from the reading list (the file is kept).
    Remove {
        /// Book name.
        name: String,
    },

    /// Inspect or reset the stored data.
    Debug {
        /// Debug subcommand action.
        #[command(subcommand)]
        action: DebugCommand,
    },

    /// Create a default config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Debug subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DebugCommand {
    /// Print the stored book list as JSON.
    Dump,

    /// Delete the stored book list.
    Clear,
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reader configuration.
    #[serde(default)]
    pub reader: ReaderConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite key-value database.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("txtreader").join("storage.db"))
        .unwrap_or_else(|| PathBuf::from("data/storage.db"))
}

/// Reader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Lines shown per page.
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,

    /// Maximum characters per line.
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// Distance from the end (in lines) at which the last page is shown.
    #[serde(default = "default_end_snap_tolerance")]
    pub end_snap_tolerance: f64,

    /// Default theme.
    #[serde(default)]
    pub theme: Theme,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            lines_per_page: default_lines_per_page(),
            wrap_width: default_wrap_width(),
            end_snap_tolerance: default_end_snap_tolerance(),
            theme: Theme::default(),
        }
    }
}

fn default_lines_per_page() -> usize {
    30
}

fn default_wrap_width() -> usize {
    80
}

/// Terminal content is measured in whole lines, so the last page only
/// needs to absorb rounding below one line.
fn default_end_snap_tolerance() -> f64 {
    0.5
}

impl ReaderConfig {
    /// Options for the library service.
    pub fn library_options(&self) -> LibraryOptions {
        LibraryOptions {
            end_snap_tolerance: self.end_snap_tolerance,
            theme: self.theme,
        }
    }
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> crate::error::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to parse config file: {}", e))
        })?;

        let reader = &config.reader;
        if reader.lines_per_page == 0 {
            return Err(crate::error::AppError::Config(
                "reader.lines_per_page must be at least 1".to_string(),
            ));
        }
        let tolerance = reader.end_snap_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 || tolerance >= reader.lines_per_page as f64 {
            return Err(crate::error::AppError::Config(format!(
                "reader.end_snap_tolerance must be in [0, {}), got {}",
                reader.lines_per_page, tolerance
            )));
        }
        Ok(config)
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("config.toml"),
            PathBuf::from("txtreader.toml"),
            dirs::config_dir()
                .map(|p| p.join("txtreader").join("config.toml"))
                .unwrap_or_default(),
        ];

        candidates.into_iter().find(|p| p.exists())
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# txtreader configuration

[storage]
# path = "/home/me/.local/share/txtreader/storage.db"

[reader]
# Lines shown per page
lines_per_page = 30
# Maximum characters per line
wrap_width = 80
# Show the last page when less than this many lines remain below the page
# (must be smaller than lines_per_page)
end_snap_tolerance = 0.5
# Theme: "light", "dark" or "sepia"
theme = "light"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&Config::generate_default()).unwrap();
        assert_eq!(config.reader.lines_per_page, 30);
        assert_eq!(config.reader.wrap_width, 80);
        assert_eq!(config.reader.theme, Theme::Light);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("[reader]\ntheme = \"sepia\"\n").unwrap();
        assert_eq!(config.reader.theme, Theme::Sepia);
        assert_eq!(config.reader.end_snap_tolerance, 0.5);
        assert_eq!(config.storage.path, default_storage_path());
    }

    #[test]
    fn test_zero_lines_rejected() {
        assert!(Config::parse("[reader]\nlines_per_page = 0\n").is_err());
    }

    #[test]
    fn test_snap_tolerance_below_page_height() {
        let config = Config::default();
        assert!(config.reader.end_snap_tolerance < config.reader.lines_per_page as f64);

        assert!(Config::parse("[reader]\nlines_per_page = 30\nend_snap_tolerance = 30.0\n").is_err());
        assert!(Config::parse("[reader]\nlines_per_page = 10\nend_snap_tolerance = 20.0\n").is_err());
        assert!(Config::parse("[reader]\nend_snap_tolerance = -1.0\n").is_err());
        assert!(Config::parse("[reader]\nlines_per_page = 30\nend_snap_tolerance = 2.0\n").is_ok());
    }

    #[test]
    fn test_cli_parses_open() {
        let cli = Cli::parse_from(["txtreader", "open", "book.txt", "--next"]);
        match cli.command {
            Some(Command::Open { name, next, prev, page, .. }) => {
                assert_eq!(name, "book.txt");
                assert!(next);
                assert!(!prev);
                assert_eq!(page, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
