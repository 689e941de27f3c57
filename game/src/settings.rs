use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::levels::LevelTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSet {
    /// The default five-level run with completion dialogs.
    Classic,
    /// Six longer levels, auto-advancing without dialogs.
    Marathon,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::Classic
    }
}

impl LevelSet {
    pub fn table(self) -> LevelTable {
        match self {
            LevelSet::Classic => LevelTable::classic(),
            LevelSet::Marathon => LevelTable::marathon(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameplaySettings {
    pub level_set: LevelSet,
    /// Confirm level transitions automatically instead of waiting for a
    /// keypress (the non-blocking-alert behavior).
    pub auto_advance_levels: bool,
    pub show_countdown: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            level_set: LevelSet::Classic,
            auto_advance_levels: false,
            show_countdown: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionSettings {
    pub enabled: bool,
    /// Base URL of the detection service.
    pub endpoint: String,
    /// Delay between resetting the feed and restarting detection on a
    /// level transition, so the feed has settled before it is watched.
    pub settle_delay_ms: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:5000".to_string(),
            settle_delay_ms: 500,
        }
    }
}

impl DetectionSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 660,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub gameplay: GameplaySettings,
    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub window: WindowSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            gameplay: GameplaySettings::default(),
            detection: DetectionSettings::default(),
            window: WindowSettings::default(),
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.window.width = self.window.width.max(320);
        self.window.height = self.window.height.max(240);
        if self.detection.endpoint.trim().is_empty() {
            self.detection.endpoint = DetectionSettings::default().endpoint;
        }
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("STILLPATH_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("stillpath");
        path.push("settings.json");
        Self { path }
    }

    pub fn load(&self) -> PlayerSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return PlayerSettings::default();
        };
        serde_json::from_slice::<PlayerSettings>(&bytes)
            .map(PlayerSettings::sanitized)
            .unwrap_or_else(|_| PlayerSettings::default())
    }

    pub fn save(&self, settings: &PlayerSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
