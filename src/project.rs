use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::components::tools::Editor;
use crate::palette::Catalog;
use crate::settings::EditorSettings;

/// Single open design.
pub struct Project {
    pub id: Uuid,
    pub editor: Editor,
    /// Script the design was replayed from.
    pub path: PathBuf,
    pub is_dirty: bool,

    /// Display name, the script's file stem
    pub name: String,
}

impl Project {
    pub fn from_script(path: PathBuf, catalog: Arc<Catalog>, settings: &EditorSettings) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            id: Uuid::new_v4(),
            editor: Editor::from_settings(catalog, settings),
            path,
            is_dirty: false,
            name,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Get the display title (name with dirty indicator)
    pub fn display_title(&self) -> String {
        if self.is_dirty {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_script_and_dirty_marker() {
        let catalog = Arc::new(Catalog::default());
        let settings = EditorSettings::default();
        let mut castle = Project::from_script(PathBuf::from("designs/castle.txt"), catalog.clone(), &settings);
        assert_eq!(castle.display_title(), "castle");
        castle.mark_dirty();
        assert_eq!(castle.display_title(), "castle*");
        castle.mark_clean();
        assert!(!castle.is_dirty);
        assert_eq!(castle.editor.canvas().size(), settings.grid_size);

        let other = Project::from_script(PathBuf::from("logo"), catalog, &settings);
        assert_eq!(other.name, "logo");
        assert_eq!(other.path, PathBuf::from("logo"));
        assert_ne!(other.id, castle.id);
    }
}
