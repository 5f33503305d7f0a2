//! Conversation transcripts
//!
//! An append-only sequence of turns. Accepts the speaker labels and field
//! names that front ends send (`role`/`speaker`, `content`/`text`) and
//! normalizes them on the way in.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Speaker
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Speaker {
    Representative,
    Persona,
    /// Any label we do not recognize, kept verbatim and ignored by scoring.
    Other(String),
}

impl Speaker {
    pub fn is_representative(&self) -> bool {
        matches!(self, Speaker::Representative)
    }

    pub fn label(&self) -> &str {
        match self {
            Speaker::Representative => "representative",
            Speaker::Persona => "persona",
            Speaker::Other(label) => label,
        }
    }
}

impl From<&str> for Speaker {
    fn from(label: &str) -> Self {
        match label.trim() {
            "rep" | "user" | "mr" | "MR" | "representative" => Speaker::Representative,
            "doctor" | "assistant" | "persona" => Speaker::Persona,
            other => Speaker::Other(other.to_string()),
        }
    }
}

impl From<String> for Speaker {
    fn from(label: String) -> Self {
        Speaker::from(label.as_str())
    }
}

impl From<Speaker> for String {
    fn from(speaker: Speaker) -> Self {
        speaker.label().to_string()
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────
// Turn
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Position in the transcript, reassigned on load.
    #[serde(default)]
    pub index: usize,

    #[serde(alias = "role")]
    pub speaker: Speaker,

    #[serde(alias = "content", default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Transcript
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>, timestamp: Option<String>) -> &Turn {
        let index = self.turns.len();
        self.turns.push(Turn {
            index,
            speaker,
            text: text.into(),
            timestamp,
        });
        &self.turns[index]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn representative_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.speaker.is_representative())
    }

    /// Most recent line spoken by `speaker`.
    pub fn last_from(&self, speaker: &Speaker) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| &t.speaker == speaker)
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(mut turns: Vec<Turn>) -> Self {
        for (index, turn) in turns.iter_mut().enumerate() {
            turn.index = index;
        }
        Self { turns }
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}
