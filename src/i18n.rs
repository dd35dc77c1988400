//! Internationalization (i18n) module for MapLedsCraft.
//!
//! Uses a simple key→string HashMap parsed from embedded translation data.
//! The `t!("key")` macro looks up the current language, falling back to English.
//! Language can be switched at runtime via `set_language()`.
//!
//! Block names go through the [`Translator`] collaborator instead of `t!`, so
//! the engine can label inventory rows without depending on global state.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::palette::Variant;

/// Currently selected language code.
static CURRENT_LANG: Mutex<Option<String>> = Mutex::new(None);

/// lang_code → (key → translated_string)
static TRANSLATIONS: OnceLock<HashMap<String, HashMap<String, String>>> = OnceLock::new();

/// Supported languages: (code, native_name)
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("pt", "Português")];

fn tables() -> &'static HashMap<String, HashMap<String, String>> {
    TRANSLATIONS.get_or_init(|| {
        let mut translations = HashMap::new();
        translations.insert(
            "en".to_string(),
            parse_translations(include_str!("../locales/en.txt")),
        );
        translations.insert(
            "pt".to_string(),
            parse_translations(include_str!("../locales/pt.txt")),
        );
        translations
    })
}

/// Initialize the i18n system with embedded translations.
/// Call once at startup.
pub fn init() {
    tables();
    if let Ok(mut guard) = CURRENT_LANG.lock()
        && guard.is_none()
    {
        *guard = Some("en".to_string());
    }
}

/// Set the active language. If `code` is not a known language, falls back to "en".
pub fn set_language(code: &str) {
    let code = if tables().contains_key(code) { code } else { "en" };
    if let Ok(mut guard) = CURRENT_LANG.lock() {
        *guard = Some(code.to_string());
    }
}

/// Get the current language code.
pub fn current_language() -> String {
    CURRENT_LANG
        .lock()
        .ok()
        .and_then(|guard| guard.clone())
        .unwrap_or_else(|| "en".to_string())
}

/// Look `key` up in one language, then English.
pub fn lookup(lang: &str, key: &str) -> Option<String> {
    let tables = tables();
    if let Some(val) = tables.get(lang).and_then(|map| map.get(key)) {
        return Some(val.clone());
    }
    if lang != "en"
        && let Some(val) = tables.get("en").and_then(|map| map.get(key))
    {
        return Some(val.clone());
    }
    None
}

/// Look up a translation key. Returns the translated string if found,
/// or falls back to English, or returns the key itself as last resort.
pub fn translate(key: &str) -> String {
    lookup(&current_language(), key).unwrap_or_else(|| key.to_string())
}

/// Detect the system language and return the best matching language code.
/// Returns "en" if no match is found.
pub fn detect_system_language() -> String {
    for var in &["LANG", "LC_ALL", "LC_MESSAGES", "LANGUAGE"] {
        if let Some(lang) = std::env::var(var).ok().and_then(|val| match_system_locale(&val)) {
            return lang;
        }
    }
    "en".to_string()
}

/// Match a system locale string (e.g. "pt_BR.UTF-8", "en-US") to our supported languages.
fn match_system_locale(locale: &str) -> Option<String> {
    let normalized = locale.to_lowercase().replace('_', "-");

    // Extract language part (before any '.' or '@')
    let lang_part = normalized.split('.').next().unwrap_or(&normalized);
    let lang_part = lang_part.split('@').next().unwrap_or(lang_part);

    let primary = lang_part.split('-').next().unwrap_or(lang_part);
    LANGUAGES
        .iter()
        .find(|(code, _)| code.to_lowercase() == primary)
        .map(|(code, _)| code.to_string())
}

/// Parse a simple key=value translation file.
/// Format: one `key=value` per line. Lines starting with `#` are comments. Empty lines ignored.
fn parse_translations(data: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            map.insert(key.trim().to_string(), val.trim().to_string());
        }
    }
    map
}

/// Translation key for a raw block name: `block.minecraft.<snake_case>`.
pub fn block_key(name: &str) -> String {
    let snake = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("block.minecraft.{}", snake)
}

/// Labels for blocks and shade variants shown next to inventory counts.
pub trait Translator {
    /// Localized block label, or the raw name when no translation exists.
    fn block_label(&self, name: &str) -> String;

    /// Suffix appended to a block label for `variant`; `None` for the plain shade.
    fn variant_suffix(&self, variant: Variant) -> Option<String>;

    /// Full display name of one shade of a block.
    fn shade_name(&self, name: &str, variant: Variant) -> String {
        let label = self.block_label(name);
        match self.variant_suffix(variant) {
            Some(suffix) => format!("{} ({})", label, suffix),
            None => label,
        }
    }
}

/// Translator backed by the embedded locale tables.
#[derive(Clone, Debug)]
pub struct Localized {
    lang: String,
}

impl Localized {
    pub fn new(lang: &str) -> Self {
        let lang = if tables().contains_key(lang) { lang } else { "en" };
        Self { lang: lang.to_string() }
    }

    /// Translator following the globally selected language.
    pub fn current() -> Self {
        Self::new(&current_language())
    }
}

impl Translator for Localized {
    fn block_label(&self, name: &str) -> String {
        tables()
            .get(&self.lang)
            .and_then(|map| map.get(&block_key(name)))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn variant_suffix(&self, variant: Variant) -> Option<String> {
        let key = match variant {
            Variant::Normal => return None,
            Variant::Shadow => "variant.shadow",
            Variant::Light => "variant.light",
            Variant::Deep => "variant.deep",
        };
        lookup(&self.lang, key)
    }
}

/// Raw names, English suffixes; no table lookups at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Translator for Identity {
    fn block_label(&self, name: &str) -> String {
        name.to_string()
    }

    fn variant_suffix(&self, variant: Variant) -> Option<String> {
        match variant {
            Variant::Normal => None,
            Variant::Shadow => Some("Shadow".to_string()),
            Variant::Light => Some("Light".to_string()),
            Variant::Deep => Some("Deep".to_string()),
        }
    }
}

/// Translation macro. Usage: `t!("cli.done")` or `t!("cli.total", count = 12)`
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::translate($key)
    };
    ($key:expr, $($name:ident = $val:expr),+ $(,)?) => {{
        let mut s = $crate::i18n::translate($key);
        $(
            s = s.replace(concat!("{", stringify!($name), "}"), &format!("{}", $val));
        )+
        s
    }};
}
