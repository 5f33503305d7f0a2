//! Persona catalog: the immutable set of personas a conversation can use.
//!
//! Built from the bundled registry, or from a directory of `*.toml` files
//! that replaces the bundled set entirely.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

use super::registry::PersonaRegistry;
use super::types::Persona;

/// Lookup-by-id view over a fixed list of personas.
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// Build a catalog from already-loaded personas.
    pub fn new(personas: Vec<Persona>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for persona in &personas {
            persona.validate().map_err(|message| Error::PersonaInvalid {
                source_name: persona.id.clone(),
                message,
            })?;
            if !seen.insert(persona.id.as_str()) {
                return Err(Error::PersonaInvalid {
                    source_name: persona.id.clone(),
                    message: "duplicate persona id".to_string(),
                });
            }
        }
        Ok(Self { personas })
    }

    /// The personas compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let registry = PersonaRegistry::new();
        let personas = registry
            .bundled()
            .map(|(id, source)| parse_persona(id, source))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = personas.len(), "Loaded bundled personas");
        Self::new(personas)
    }

    /// Load every `*.toml` file in `dir`, sorted by file name.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|source| Error::IoRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut personas = Vec::with_capacity(paths.len());
        for path in &paths {
            let source = fs::read_to_string(path).map_err(|source| Error::IoRead {
                path: path.clone(),
                source,
            })?;
            personas.push(parse_persona(&path.display().to_string(), &source)?);
        }

        if personas.is_empty() {
            return Err(Error::PersonaInvalid {
                source_name: dir.display().to_string(),
                message: "directory contains no persona TOML files".to_string(),
            });
        }

        info!(path = %dir.display(), count = personas.len(), "Loaded personas from directory");
        Self::new(personas)
    }

    /// Directory override when given, bundled set otherwise.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::bundled(),
        }
    }

    /// Look a persona up by id.
    pub fn get(&self, persona_id: &str) -> Result<&Persona> {
        self.personas
            .iter()
            .find(|p| p.id == persona_id)
            .ok_or_else(|| Error::persona_not_found(persona_id))
    }

    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

fn parse_persona(source_name: &str, source: &str) -> Result<Persona> {
    toml::from_str(source).map_err(|e| Error::PersonaInvalid {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}
