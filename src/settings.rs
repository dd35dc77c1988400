use std::path::{Path, PathBuf};

use crate::canvas::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE};
use crate::components::tools::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, clamp_zoom};
use crate::inventory::DEFAULT_STACK_SIZE;
use crate::ops::stamp::StampPattern;
use crate::ops::surface::{DEFAULT_SURFACE_SIZE, MAX_SURFACE_SIZE};
use crate::palette::Variant;

/// Editor defaults persisted between runs.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Cells per grid edge.
    pub grid_size: u32,
    /// Physical surface edge in pixels (never below 2 × grid_size once applied).
    pub surface_size: u32,
    pub brush_size: i32,
    pub zoom: f32,
    pub variant: Variant,
    pub stamp_pattern: StampPattern,
    /// Blocks per stack in the inventory read-out.
    pub stack_size: usize,
    /// Language code (e.g. "en", "pt"). Empty string = auto-detect system language.
    pub language: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            surface_size: DEFAULT_SURFACE_SIZE,
            brush_size: MIN_BRUSH_SIZE,
            zoom: 1.0,
            variant: Variant::Normal,
            stamp_pattern: StampPattern::Grin,
            stack_size: DEFAULT_STACK_SIZE,
            language: String::new(),
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/mapleds/mapleds_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\MapLedsCraft\mapleds_settings.cfg
    /// On macOS:   ~/Library/Application Support/MapLedsCraft/mapleds_settings.cfg
    /// Fallback:   same directory as the executable.
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("mapleds");
            return Some(config_dir.join("mapleds_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(PathBuf::from(appdata).join("MapLedsCraft").join("mapleds_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("MapLedsCraft")
                    .join("mapleds_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("mapleds_settings.cfg")))
        }
    }

    /// Load settings from the default location (defaults if missing or corrupt).
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path` (defaults if missing or corrupt).
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_cfg_str(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse `key=value` lines; unknown keys and bad values keep their defaults.
    pub fn from_cfg_str(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "grid_size" => {
                    s.grid_size = val.parse().unwrap_or(DEFAULT_GRID_SIZE).clamp(1, MAX_GRID_SIZE);
                }
                "surface_size" => {
                    s.surface_size = val.parse().unwrap_or(DEFAULT_SURFACE_SIZE).min(MAX_SURFACE_SIZE);
                }
                "brush_size" => {
                    s.brush_size = val
                        .parse()
                        .unwrap_or(MIN_BRUSH_SIZE)
                        .clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
                }
                "zoom" => {
                    s.zoom = clamp_zoom(val.parse().unwrap_or(1.0));
                }
                "variant" => {
                    s.variant = Variant::from_key(val).unwrap_or(Variant::Normal);
                }
                "stamp_pattern" => {
                    s.stamp_pattern = StampPattern::from_key(val).unwrap_or_default();
                }
                "stack_size" => {
                    s.stack_size = val.parse().unwrap_or(DEFAULT_STACK_SIZE).max(1);
                }
                "language" => {
                    s.language = val.to_string();
                }
                _ => {}
            }
        }
        s
    }

    pub fn to_cfg_string(&self) -> String {
        format!(
            "grid_size={}\n\
             surface_size={}\n\
             brush_size={}\n\
             zoom={}\n\
             variant={}\n\
             stamp_pattern={}\n\
             stack_size={}\n\
             language={}\n",
            self.grid_size,
            self.surface_size,
            self.brush_size,
            self.zoom,
            self.variant.key(),
            self.stamp_pattern.key(),
            self.stack_size,
            self.language,
        )
    }

    /// Save settings to the default location.
    pub fn save(&self) -> std::io::Result<()> {
        match Self::settings_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_cfg_string())
    }

    /// Language to activate: the configured one, or the system language.
    pub fn effective_language(&self) -> String {
        if self.language.is_empty() {
            crate::i18n::detect_system_language()
        } else {
            self.language.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let s = EditorSettings::from_cfg_str(
            "grid_size=abc\nsurface_size=200000\nbrush_size=99\nzoom=7.3\nvariant=purple\nstack_size=0\nmystery=1\nnot a pair\n",
        );
        assert_eq!(s.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(s.surface_size, MAX_SURFACE_SIZE);
        assert_eq!(EditorSettings::from_cfg_str("surface_size=-5\n").surface_size, DEFAULT_SURFACE_SIZE);
        assert_eq!(s.brush_size, MAX_BRUSH_SIZE);
        assert_eq!(s.zoom, 4.0);
        assert_eq!(s.variant, Variant::Normal);
        assert_eq!(s.stack_size, 1);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mapleds_settings.cfg");
        let s = EditorSettings {
            grid_size: 64,
            brush_size: 4,
            zoom: 2.5,
            variant: Variant::Deep,
            stamp_pattern: StampPattern::Derp,
            language: "pt".into(),
            ..EditorSettings::default()
        };
        s.save_to(&path).unwrap();
        assert_eq!(EditorSettings::load_from(&path), s);
    }

    #[test]
    fn missing_file_gives_defaults() {
        assert_eq!(
            EditorSettings::load_from(Path::new("/nonexistent/mapleds_settings.cfg")),
            EditorSettings::default()
        );
    }
}
