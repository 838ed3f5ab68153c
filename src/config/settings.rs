use clap::ValueEnum;
use log::{ info, warn };
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::fs::{ self, File };
use std::io::{ BufWriter, Write };
use std::path::{ Path, PathBuf };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// User preferences kept between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Like `load`, but a corrupt file only produces a warning.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None | Some("") => "(not set)".to_string(),
            Some(key) if key.chars().count() <= 4 => "****".to_string(),
            Some(key) => {
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("****{}", tail)
            }
        }
    }
}

/// A `Settings` bound to the file it is persisted in.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load_or_default(&path);
        Self { path, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SettingsError> {
        self.settings.theme = theme;
        self.settings.save(&self.path)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, SettingsError> {
        let theme = self.settings.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) -> Result<(), SettingsError> {
        self.settings.api_key = api_key.filter(|k| !k.trim().is_empty());
        self.settings.save(&self.path)
    }

    pub fn set_project_id(&mut self, project_id: Option<String>) -> Result<(), SettingsError> {
        self.settings.project_id = project_id.filter(|p| !p.trim().is_empty());
        self.settings.save(&self.path)
    }
}
