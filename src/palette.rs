// ============================================================================
// PALETTE — block catalog, shade variants, reverse colour lookup
// ============================================================================

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::i18n::Translator;

/// Plain 8-bit RGB triple, as stored in the catalog file.
pub type Rgb = [u8; 3];

/// One of the four fixed in-game shade renderings of a base colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Shadow,
    Normal,
    Light,
    Deep,
}

impl Variant {
    /// Variants in stamp-pattern index order (0..=3).
    pub const ALL: [Variant; 4] = [Variant::Shadow, Variant::Normal, Variant::Light, Variant::Deep];

    /// Brightness multiplier out of 255.
    pub fn multiplier(self) -> u32 {
        match self {
            Variant::Shadow => 180,
            Variant::Normal => 220,
            Variant::Light => 255,
            Variant::Deep => 135,
        }
    }

    /// Index used by stamp bitmaps.
    pub fn index(self) -> usize {
        match self {
            Variant::Shadow => 0,
            Variant::Normal => 1,
            Variant::Light => 2,
            Variant::Deep => 3,
        }
    }

    /// Inverse of [`Variant::index`]; out-of-range indices yield `None`.
    pub fn from_index(idx: usize) -> Option<Variant> {
        Self::ALL.get(idx).copied()
    }

    /// Stable lowercase key used in settings files and scripts.
    pub fn key(self) -> &'static str {
        match self {
            Variant::Shadow => "shadow",
            Variant::Normal => "normal",
            Variant::Light => "light",
            Variant::Deep => "deep",
        }
    }

    pub fn from_key(key: &str) -> Option<Variant> {
        match key.trim().to_lowercase().as_str() {
            "shadow" | "sombra" => Some(Variant::Shadow),
            "normal" => Some(Variant::Normal),
            "light" | "luz" => Some(Variant::Light),
            "deep" | "profundo" => Some(Variant::Deep),
            _ => None,
        }
    }
}

/// Scale every channel by `multiplier / 255`, flooring.
pub fn derive_variant(base: Rgb, multiplier: u32) -> Rgb {
    base.map(|c| ((c as u32 * multiplier) / 255) as u8)
}

/// The four shades derived from one base colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantSet {
    pub shadow: Rgb,
    pub normal: Rgb,
    pub light: Rgb,
    pub deep: Rgb,
}

impl VariantSet {
    pub fn from_base(base: Rgb) -> Self {
        Self {
            shadow: derive_variant(base, Variant::Shadow.multiplier()),
            normal: derive_variant(base, Variant::Normal.multiplier()),
            light: derive_variant(base, Variant::Light.multiplier()),
            deep: derive_variant(base, Variant::Deep.multiplier()),
        }
    }

    pub fn get(&self, variant: Variant) -> Rgb {
        match variant {
            Variant::Shadow => self.shadow,
            Variant::Normal => self.normal,
            Variant::Light => self.light,
            Variant::Deep => self.deep,
        }
    }
}

/// Index of an entry inside its [`Catalog`].
pub type EntryId = usize;

/// What a painted cell holds: a catalog entry rendered in one shade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Paint {
    pub entry: EntryId,
    pub variant: Variant,
}

impl Paint {
    pub fn new(entry: EntryId, variant: Variant) -> Self {
        Self { entry, variant }
    }
}

/// A group of interchangeable blocks sharing one representative colour.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PaletteEntry {
    #[serde(alias = "base_id")]
    pub id: i64,
    #[serde(default)]
    pub category: String,
    pub rgb: Rgb,
    #[serde(alias = "blocks")]
    pub names: Vec<String>,
}

impl PaletteEntry {
    /// First listed block name; falls back to the category for nameless entries.
    pub fn representative_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.category)
    }

    pub fn variants(&self) -> VariantSet {
        VariantSet::from_base(self.rgb)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only list of palette entries loaded once per session.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<PaletteEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(src: &str) -> Result<Self, CatalogError> {
        let entries: Vec<PaletteEntry> = serde_json::from_str(src)?;
        Ok(Self::new(entries))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_json_str(&src)
    }

    /// Load a catalog, degrading to an empty palette on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(catalog) => {
                log_info!("Loaded {} palette entries from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                log_warn!("Catalog {} unavailable, using empty palette: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&PaletteEntry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &PaletteEntry)> {
        self.entries.iter().enumerate()
    }

    /// Exact RGB of a painted cell, if its entry exists.
    pub fn rgb_of(&self, paint: Paint) -> Option<Rgb> {
        self.get(paint.entry).map(|e| e.variants().get(paint.variant))
    }

    /// Find the entry listing `name` (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<EntryId> {
        let wanted = name.trim().to_lowercase();
        self.entries()
            .find(|(_, e)| e.names.iter().any(|n| n.to_lowercase() == wanted))
            .map(|(id, _)| id)
    }

    /// Entries whose category, raw names, or translated names contain `term`.
    /// An empty term matches everything.
    pub fn search(&self, term: &str, translator: &dyn Translator) -> Vec<EntryId> {
        let term = term.trim().to_lowercase();
        self.entries()
            .filter(|(_, e)| {
                term.is_empty()
                    || e.category.to_lowercase().contains(&term)
                    || e.names.iter().any(|n| {
                        n.to_lowercase().contains(&term)
                            || translator.block_label(n).to_lowercase().contains(&term)
                    })
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Map every derived shade back to the paint that produces it.
    ///
    /// When two shades collide on the exact same RGB the later one wins,
    /// both across entries (catalog order) and within an entry
    /// (normal, shadow, light, deep).
    pub fn reverse_lookup(&self) -> HashMap<Rgb, Paint> {
        let mut map = HashMap::with_capacity(self.len() * 4);
        for (id, entry) in self.entries() {
            let set = entry.variants();
            for variant in [Variant::Normal, Variant::Shadow, Variant::Light, Variant::Deep] {
                map.insert(set.get(variant), Paint::new(id, variant));
            }
        }
        map
    }
}
