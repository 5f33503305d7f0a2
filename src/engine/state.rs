//! Persona state types
//!
//! The authoritative per-conversation affect of the simulated persona.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::skepticism::{SkepticismLevel, SkepticismWindow};

pub const MAX_TIME_PRESSURE: u8 = 5;
pub const MAX_TRUST: u8 = 100;
pub const INITIAL_TRUST: u8 = 50;
pub const INITIAL_TIME_PRESSURE: u8 = 1;

// ─────────────────────────────────────────────────────────────────
// Relevancy
// ─────────────────────────────────────────────────────────────────

/// How useful the last representative utterance was: -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Relevancy {
    Irrelevant,
    #[default]
    Neutral,
    Relevant,
}

impl Relevancy {
    pub fn score(self) -> i32 {
        match self {
            Relevancy::Irrelevant => -1,
            Relevancy::Neutral => 0,
            Relevancy::Relevant => 1,
        }
    }

    /// Out-of-range scores clamp to the nearest end.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s < 0 => Relevancy::Irrelevant,
            0 => Relevancy::Neutral,
            _ => Relevancy::Relevant,
        }
    }
}

impl From<i64> for Relevancy {
    fn from(score: i64) -> Self {
        Relevancy::from_score(score)
    }
}

impl From<Relevancy> for i64 {
    fn from(r: Relevancy) -> Self {
        r.score() as i64
    }
}

// ─────────────────────────────────────────────────────────────────
// Mood
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Neutral,
    Engaged,
    Dismissive,
}

impl Mood {
    pub fn all() -> &'static [Mood] {
        &[Mood::Neutral, Mood::Engaged, Mood::Dismissive]
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Neutral => write!(f, "Neutral"),
            Mood::Engaged => write!(f, "Engaged"),
            Mood::Dismissive => write!(f, "Dismissive"),
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(Mood::Neutral),
            "engaged" => Ok(Mood::Engaged),
            "dismissive" => Ok(Mood::Dismissive),
            _ => Err(format!("Unknown mood '{}'", s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Stage
// ─────────────────────────────────────────────────────────────────

/// Coarse phase of the scripted call. Ordered, but a directive may move it either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Introduction,
    Discussion,
    ObjectionDiscussion,
    Closure,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Introduction,
            Stage::Discussion,
            Stage::ObjectionDiscussion,
            Stage::Closure,
        ]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Introduction => write!(f, "Introduction"),
            Stage::Discussion => write!(f, "Discussion"),
            Stage::ObjectionDiscussion => write!(f, "ObjectionDiscussion"),
            Stage::Closure => write!(f, "Closure"),
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "introduction" => Ok(Stage::Introduction),
            "discussion" => Ok(Stage::Discussion),
            "objectiondiscussion" => Ok(Stage::ObjectionDiscussion),
            "closure" => Ok(Stage::Closure),
            _ => Err(format!("Unknown conversation stage '{}'", s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona State
// ─────────────────────────────────────────────────────────────────

/// Live state of one simulated persona in one conversation.
///
/// Deserialized values are clamped into range on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPersonaState")]
pub struct PersonaState {
    pub mood: Mood,

    /// 0 (relaxed) to 5 (about to walk out)
    pub time_pressure: u8,

    pub stage: Stage,

    /// Simulated seconds since the call started. Never decreases.
    pub elapsed_secs: u64,

    /// 0 to 100
    pub trust: u8,

    pub(crate) skepticism_window: SkepticismWindow,

    /// Derived from the window and the persona baseline on every transition.
    pub(crate) skepticism: SkepticismLevel,

    /// Justification attached to the most recent transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Default for PersonaState {
    fn default() -> Self {
        Self::new(SkepticismLevel::default())
    }
}

impl PersonaState {
    /// Fresh state for a conversation with a persona of the given baseline.
    pub fn new(baseline: SkepticismLevel) -> Self {
        Self {
            mood: Mood::Neutral,
            time_pressure: INITIAL_TIME_PRESSURE,
            stage: Stage::Introduction,
            elapsed_secs: 0,
            trust: INITIAL_TRUST,
            skepticism_window: SkepticismWindow::new(),
            skepticism: baseline,
            note: None,
        }
    }

    pub fn skepticism(&self) -> SkepticismLevel {
        self.skepticism
    }

    pub fn skepticism_window(&self) -> &SkepticismWindow {
        &self.skepticism_window
    }

    /// Seconds left of the persona's consultation budget.
    pub fn remaining_secs(&self, budget_secs: u64) -> u64 {
        budget_secs.saturating_sub(self.elapsed_secs)
    }

    /// Re-derive skepticism from the window against `baseline`.
    ///
    /// Before the first turn the window is empty and the level is the baseline.
    pub fn rebase(&mut self, baseline: SkepticismLevel) {
        self.skepticism = if self.skepticism_window.is_empty() {
            baseline
        } else {
            self.skepticism_window.level(baseline)
        };
    }
}

/// Wire form of [`PersonaState`] before range checks.
#[derive(Deserialize)]
#[serde(default)]
struct RawPersonaState {
    mood: Mood,
    time_pressure: i64,
    stage: Stage,
    elapsed_secs: u64,
    trust: i64,
    skepticism_window: SkepticismWindow,
    skepticism: SkepticismLevel,
    note: Option<String>,
}

impl Default for RawPersonaState {
    fn default() -> Self {
        let state = PersonaState::default();
        Self {
            mood: state.mood,
            time_pressure: state.time_pressure as i64,
            stage: state.stage,
            elapsed_secs: state.elapsed_secs,
            trust: state.trust as i64,
            skepticism_window: state.skepticism_window,
            skepticism: state.skepticism,
            note: None,
        }
    }
}

impl From<RawPersonaState> for PersonaState {
    fn from(raw: RawPersonaState) -> Self {
        Self {
            mood: raw.mood,
            time_pressure: raw.time_pressure.clamp(0, MAX_TIME_PRESSURE as i64) as u8,
            stage: raw.stage,
            elapsed_secs: raw.elapsed_secs,
            trust: raw.trust.clamp(0, MAX_TRUST as i64) as u8,
            skepticism_window: raw.skepticism_window,
            skepticism: raw.skepticism,
            note: raw.note,
        }
    }
}
