use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ServiceKind;
use crate::errors::{PodNoteError, PodNoteResult};

pub const DEFAULT_TEMPLATE: &str = "---\ntags: [Podcast]\ndate: {{Date}}\n---\n# {{Title}}\n![]({{ImageURL}})\n## Description:\n{{Description}}\n-> [Podcast Link]({{PodcastURL}})\n## Notes:\n";

const SETTINGS_FILE: &str = "podnote.json";

/// Process-level configuration: where the settings live.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings_path: PathBuf,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> PodNoteResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let settings_path = match std::env::var("PODNOTE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => exe_dir
                .map(|d| d.join(SETTINGS_FILE))
                .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE)),
        };

        Ok(Self { settings_path })
    }
}

/// User settings persisted between runs. Missing keys take their default,
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Body template
    pub template: String,
    /// File name template for new notes
    pub file_name: String,
    /// Service matched by the most recent run
    pub service: ServiceKind,
    /// Insert into the active document instead of creating a note
    pub at_cursor: bool,
    /// Folder prefix for new notes, used verbatim
    pub folder: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            file_name: String::new(),
            service: ServiceKind::default(),
            at_cursor: true,
            folder: String::new(),
        }
    }
}

impl Settings {
    /// Load settings, or defaults when the file does not exist yet.
    pub fn load<P: AsRef<Path>>(path: P) -> PodNoteResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            PodNoteError::Config(format!("{}: {}", path.display(), e))
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> PodNoteResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Update one setting by its CLI key.
    pub fn set(&mut self, key: &str, value: &str) -> PodNoteResult<()> {
        match key {
            "template" => self.template = value.to_string(),
            "file-name" => self.file_name = value.to_string(),
            "folder" => self.folder = value.to_string(),
            "service" => {
                self.service = value.parse().map_err(PodNoteError::InvalidInput)?;
            }
            "at-cursor" => {
                self.at_cursor = value.trim().parse().map_err(|_| {
                    PodNoteError::InvalidInput(format!(
                        "at-cursor expects true or false, got {}",
                        value
                    ))
                })?;
            }
            _ => {
                return Err(PodNoteError::InvalidInput(format!(
                    "Unknown setting: {} (expected one of: {})",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 5] = ["template", "file-name", "service", "at-cursor", "folder"];
}
