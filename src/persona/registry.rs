//! Bundled persona registry: the default doctor personas compiled into the binary.

/// Identifier and TOML source of every bundled persona, in catalog order.
const BUNDLED: [(&str, &str); 8] = [
    ("doc_001", include_str!("../../config/personas/doc_001.toml")),
    ("doc_002", include_str!("../../config/personas/doc_002.toml")),
    ("doc_003", include_str!("../../config/personas/doc_003.toml")),
    ("doc_004", include_str!("../../config/personas/doc_004.toml")),
    ("doc_005", include_str!("../../config/personas/doc_005.toml")),
    ("doc_006", include_str!("../../config/personas/doc_006.toml")),
    ("doc_007", include_str!("../../config/personas/doc_007.toml")),
    ("doc_008", include_str!("../../config/personas/doc_008.toml")),
];

/// Registry of bundled persona definitions.
pub struct PersonaRegistry;

impl PersonaRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Get the bundled TOML source for a persona id.
    pub fn get_bundled_config(&self, persona_id: &str) -> Option<&'static str> {
        BUNDLED
            .iter()
            .find(|(id, _)| *id == persona_id)
            .map(|(_, source)| *source)
    }

    /// Every bundled (id, source) pair.
    pub fn bundled(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        BUNDLED.iter().copied()
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
