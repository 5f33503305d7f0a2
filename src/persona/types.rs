//! Core types for the persona catalog.
//!
//! A persona is the fixed profile of one simulated doctor: how they talk,
//! what convinces them and how much time they give a representative.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::SkepticismLevel;

// ─────────────────────────────────────────────────────────────────
// Knowledge Level
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnowledgeLevel {
    Generalist,
    Specialist,
    #[serde(rename = "Thought Leader", alias = "ThoughtLeader")]
    ThoughtLeader,
}

impl KnowledgeLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            KnowledgeLevel::Generalist => "Generalist",
            KnowledgeLevel::Specialist => "Specialist",
            KnowledgeLevel::ThoughtLeader => "Thought Leader",
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for KnowledgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "generalist" => Ok(KnowledgeLevel::Generalist),
            "specialist" => Ok(KnowledgeLevel::Specialist),
            "thoughtleader" => Ok(KnowledgeLevel::ThoughtLeader),
            _ => Err(format!(
                "Unknown knowledge level '{}'. Valid: Generalist, Specialist, Thought Leader",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona (loaded from TOML)
// ─────────────────────────────────────────────────────────────────

/// Full persona profile, deserialized from TOML. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Catalog identifier (e.g. "doc_001").
    pub id: String,

    /// Name and one-line character sketch.
    pub description: String,

    pub communication_style: String,

    /// What sways this doctor, most important first.
    #[serde(default)]
    pub decision_factors: Vec<String>,

    /// Starting point of the skepticism window.
    pub skepticism_level: SkepticismLevel,

    #[serde(default)]
    pub triggers: BehavioralTriggers,

    pub knowledge_level: KnowledgeLevel,

    pub consultation_style: String,

    #[serde(default)]
    pub typical_objections: Vec<String>,

    #[serde(default)]
    pub preferred_evidence: Vec<String>,

    /// Only used when rendering prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Total consultation budget in simulated seconds.
    pub available_time_secs: u64,
}

/// Things that win this doctor over, and things that put them off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralTriggers {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

impl Persona {
    /// The doctor's name, taken from the description before the dash.
    pub fn display_name(&self) -> &str {
        self.description
            .split('—')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    /// Check the fields the engines rely on.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id must not be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        if self.available_time_secs == 0 {
            return Err("available_time_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
