//! Tone engine state and decision types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MAX_PRESSURE: u8 = 5;
pub const MAX_SKEPTICISM: u8 = 5;
pub const MAX_PATIENCE: u8 = 10;
pub const MAX_ENGAGEMENT: u8 = 10;

// ─────────────────────────────────────────────────────────────────
// Tone Mood
// ─────────────────────────────────────────────────────────────────

/// Mood label of the tone engine. Richer than the persona [`Mood`](crate::engine::Mood).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMood {
    #[default]
    #[serde(alias = "Neutral")]
    Neutral,
    #[serde(alias = "Engaged")]
    Engaged,
    #[serde(alias = "Annoyed")]
    Annoyed,
    #[serde(alias = "Impatient")]
    Impatient,
    #[serde(alias = "Frustrated")]
    Frustrated,
    #[serde(alias = "Busy")]
    Busy,
    #[serde(alias = "Dismissive")]
    Dismissive,
}

impl ToneMood {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneMood::Neutral => "neutral",
            ToneMood::Engaged => "engaged",
            ToneMood::Annoyed => "annoyed",
            ToneMood::Impatient => "impatient",
            ToneMood::Frustrated => "frustrated",
            ToneMood::Busy => "busy",
            ToneMood::Dismissive => "dismissive",
        }
    }
}

impl fmt::Display for ToneMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneMood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(ToneMood::Neutral),
            "engaged" => Ok(ToneMood::Engaged),
            "annoyed" => Ok(ToneMood::Annoyed),
            "impatient" => Ok(ToneMood::Impatient),
            "frustrated" => Ok(ToneMood::Frustrated),
            "busy" => Ok(ToneMood::Busy),
            "dismissive" => Ok(ToneMood::Dismissive),
            _ => Err(format!("Unknown tone mood '{}'", s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tone State
// ─────────────────────────────────────────────────────────────────

/// Input and output state of the tone engine.
///
/// Missing fields take the defaults of a call that is already under way
/// (pressure and skepticism 3, patience and engagement 5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToneState {
    pub mood: ToneMood,
    pub time_pressure: u8,
    pub skepticism: u8,
    pub patience: u8,
    pub engagement: u8,
    pub hype_count: u32,
    pub evidence_count: u32,
    pub monologue_count: u32,
}

impl Default for ToneState {
    fn default() -> Self {
        Self {
            mood: ToneMood::Neutral,
            time_pressure: 3,
            skepticism: 3,
            patience: 5,
            engagement: 5,
            hype_count: 0,
            evidence_count: 0,
            monologue_count: 0,
        }
    }
}

impl ToneState {
    /// Pull every bounded quantity back into range. Counters are left alone.
    pub fn clamped(mut self) -> Self {
        self.time_pressure = self.time_pressure.min(MAX_PRESSURE);
        self.skepticism = self.skepticism.min(MAX_SKEPTICISM);
        self.patience = self.patience.min(MAX_PATIENCE);
        self.engagement = self.engagement.min(MAX_ENGAGEMENT);
        self
    }
}

// ─────────────────────────────────────────────────────────────────
// Decision
// ─────────────────────────────────────────────────────────────────

/// Result of one tone decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneDecision {
    pub state: ToneState,
    /// Short behavioural instruction for the persona's next reply.
    pub action: String,
    pub pause_reply: bool,
    /// End the call now; `action` holds the closing line.
    pub cut_now: bool,
}
