//! Game settings and preferences
//!
//! Persisted in LocalStorage; the page URL query (`?variant=jelly`) can
//! override the block variant.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Block variant the session is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Single rigid square per block
    Simple,
    /// Five spring-linked segments per block
    #[default]
    Jelly,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Simple => "Simple",
            Variant::Jelly => "Jelly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" | "rigid" => Some(Variant::Simple),
            "jelly" | "soft" => Some(Variant::Jelly),
            _ => None,
        }
    }

    /// Drop cooldown after each tap (ms)
    pub fn cooldown_ms(&self) -> f64 {
        match self {
            Variant::Simple => SIMPLE_COOLDOWN_MS,
            Variant::Jelly => JELLY_COOLDOWN_MS,
        }
    }

    /// Blocks in the initial tower
    pub fn default_tower_blocks(&self) -> usize {
        match self {
            Variant::Simple => SIMPLE_TOWER_BLOCKS,
            Variant::Jelly => JELLY_TOWER_BLOCKS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub variant: Variant,
    /// Initial tower size; `None` uses the variant default
    #[serde(default)]
    pub tower_blocks: Option<usize>,
    /// Draw spring constraints as thin lines
    #[serde(default)]
    pub show_constraints: bool,
    /// Downward gravity (pixels/s²)
    #[serde(default = "default_gravity")]
    pub gravity: f32,
}

fn default_gravity() -> f32 {
    GRAVITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            tower_blocks: None,
            show_constraints: false,
            gravity: GRAVITY,
        }
    }
}

impl Settings {
    /// Create settings for a variant with everything else default
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Effective initial tower size
    pub fn tower_blocks(&self) -> usize {
        self.tower_blocks
            .unwrap_or_else(|| self.variant.default_tower_blocks())
    }

    /// Apply `key=value` pairs from a URL query string (leading `?` optional)
    ///
    /// Returns true if anything changed.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let mut changed = false;
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "variant" => {
                    if let Some(variant) = Variant::from_str(value) {
                        changed |= self.variant != variant;
                        self.variant = variant;
                    } else {
                        log::warn!("Ignoring unknown variant '{}'", value);
                    }
                }
                "constraints" => {
                    let show = matches!(value, "1" | "true" | "on");
                    changed |= self.show_constraints != show;
                    self.show_constraints = show;
                }
                "tower" => {
                    if let Ok(n) = value.parse::<usize>() {
                        changed |= self.tower_blocks != Some(n);
                        self.tower_blocks = Some(n);
                    }
                }
                _ => {}
            }
        }
        changed
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "jelly_tower_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("Jelly"), Some(Variant::Jelly));
        assert_eq!(Variant::from_str("rigid"), Some(Variant::Simple));
        assert_eq!(Variant::from_str("wobbly"), None);
    }

    #[test]
    fn test_tower_blocks_default_per_variant() {
        assert_eq!(Settings::for_variant(Variant::Simple).tower_blocks(), 20);
        assert_eq!(
            Settings::for_variant(Variant::Jelly).tower_blocks(),
            JELLY_TOWER_BLOCKS
        );
    }

    #[test]
    fn test_apply_query() {
        let mut settings = Settings::for_variant(Variant::Jelly);
        assert!(settings.apply_query("?variant=simple&tower=3&constraints=1"));
        assert_eq!(settings.variant, Variant::Simple);
        assert_eq!(settings.tower_blocks(), 3);
        assert!(settings.show_constraints);

        // Same values again: nothing changes
        assert!(!settings.apply_query("variant=simple&tower=3&constraints=1"));
        // Unknown keys and malformed pairs are ignored
        assert!(!settings.apply_query("?foo=bar&variant"));
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"variant":"Simple"}"#).unwrap();
        assert_eq!(settings.variant, Variant::Simple);
        assert_eq!(settings.tower_blocks, None);
        assert!(!settings.show_constraints);
        assert_eq!(settings.gravity, GRAVITY);
    }
}
