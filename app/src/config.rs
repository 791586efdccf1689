use directories::ProjectDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use toml;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeType {
    Dark,
    Light,
    Latte,
    Frappe,
    Macchiato,
    #[default]
    Mocha,
}

/// Shape of the crop window. A circle still saves a rectangular file; the
/// circle only changes the overlay drawn on top.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CropperKind {
    Rectangle { ratio: f32 },
    Circle,
}

impl CropperKind {
    /// Width to height of the crop area. Non-positive configured values
    /// fall back to square, as does the circle.
    pub fn ratio(&self) -> f32 {
        match self {
            CropperKind::Rectangle { ratio } if *ratio > 0.0 => *ratio,
            CropperKind::Rectangle { .. } => 1.0,
            CropperKind::Circle => 1.0,
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, CropperKind::Circle)
    }
}

impl Default for CropperKind {
    fn default() -> Self {
        CropperKind::Rectangle { ratio: 1.0 }
    }
}

/// User-facing strings, overridable from the config file for localization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Wordings {
    pub crop: String,
    pub cancel: String,
    pub save: String,
    pub processing: String,
    pub error_title: String,
    pub ok: String,
}

impl Default for Wordings {
    fn default() -> Self {
        Self {
            crop: "Crop".to_string(),
            cancel: "Cancel".to_string(),
            save: "Save".to_string(),
            processing: "Processing…".to_string(),
            error_title: "Uh oh, something went wrong".to_string(),
            ok: "Ok".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub cropper: CropperKind,
    pub show_grid_overlay: bool,
    /// RGBA fill of the curtains covering everything outside the crop area.
    pub overlay_color: [u8; 4],
    pub theme: ThemeType,
    pub wordings: Wordings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cropper: CropperKind::default(),
            show_grid_overlay: false,
            overlay_color: [0, 0, 0, 220],
            theme: ThemeType::default(),
            wordings: Wordings::default(),
        }
    }
}

fn get_config_path() -> Option<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "videocrop", "video_crop") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            if let Err(e) = fs::create_dir_all(config_dir) {
                error!("Failed to create config directory: {}", e);
                return None;
            }
        }
        let config_path = config_dir.join("config.toml");
        return Some(config_path);
    }
    None
}

pub fn save_config(config: &AppConfig) {
    if let Some(path) = get_config_path() {
        match toml::to_string_pretty(config) {
            Ok(toml_str) => {
                if let Err(e) = fs::write(&path, toml_str) {
                    error!("Failed to write config file: {}", e);
                } else {
                    info!("Config saved to {}", path.display());
                }
            }
            Err(e) => {
                error!("Failed to serialize config: {}", e);
            }
        }
    }
}

pub fn load_config() -> AppConfig {
    if let Some(path) = get_config_path() {
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(toml_str) => match toml::from_str(&toml_str) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Failed to parse config file, using defaults: {}", e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config file, using defaults: {}", e);
                }
            }
        }
    }
    // Return default if file doesn't exist or on any error
    AppConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_roundtrip() {
        let config = AppConfig {
            cropper: CropperKind::Rectangle { ratio: 1.5 },
            show_grid_overlay: true,
            overlay_color: [10, 20, 30, 255],
            theme: ThemeType::Frappe,
            wordings: Wordings {
                save: "Done".to_string(),
                ..Default::default()
            },
        };

        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize config");
        let loaded: AppConfig = toml::from_str(&toml_str).expect("Failed to parse config");
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let loaded: AppConfig = toml::from_str("theme = \"latte\"").expect("Failed to parse");
        assert_eq!(loaded.theme, ThemeType::Latte);
        assert_eq!(loaded.cropper, CropperKind::default());
        assert_eq!(loaded.wordings, Wordings::default());
        assert!(!loaded.show_grid_overlay);
    }

    #[test]
    fn test_circle_cropper_parses() {
        let loaded: AppConfig =
            toml::from_str("[cropper]\nkind = \"circle\"").expect("Failed to parse");
        assert!(loaded.cropper.is_circle());
        assert_eq!(loaded.cropper.ratio(), 1.0);
    }

    #[test]
    fn test_cropper_ratio_guards_nonsense_values() {
        assert_eq!(CropperKind::Rectangle { ratio: -2.0 }.ratio(), 1.0);
        assert_eq!(CropperKind::Rectangle { ratio: 0.0 }.ratio(), 1.0);
        assert_eq!(CropperKind::Rectangle { ratio: 0.75 }.ratio(), 0.75);
    }
}
