//! Reply-generation collaborator boundary
//!
//! The collaborator writes the persona's next line and judges the last
//! representative utterance. Its output is untrusted: [`ReplyResult::parse`]
//! never fails, it falls back field by field.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::{Mood, PersonaState, Relevancy, Stage, TurnAssessment};
use crate::error::{Error, Result};
use crate::persona::Persona;
use crate::prompt;
use crate::tone::ToneDecision;
use crate::transcript::Transcript;

/// Reply used whenever the collaborator gives us nothing usable.
pub const FALLBACK_REPLY: &str = "Please clarify.";

// ─────────────────────────────────────────────────────────────────
// Reply Result
// ─────────────────────────────────────────────────────────────────

/// Validated collaborator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResult {
    pub doctor_reply: String,
    pub relevancy: Relevancy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_conversation_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_mood: Option<Mood>,
    #[serde(default)]
    pub signals: Vec<String>,
}

impl Default for ReplyResult {
    fn default() -> Self {
        Self::fallback()
    }
}

impl ReplyResult {
    /// Neutral result: ask for clarification, keep mood and stage.
    pub fn fallback() -> Self {
        Self {
            doctor_reply: FALLBACK_REPLY.to_string(),
            relevancy: Relevancy::Neutral,
            justification: None,
            next_conversation_stage: None,
            next_mood: None,
            signals: Vec::new(),
        }
    }

    /// Parse raw collaborator text. Accepts a bare JSON object or one wrapped
    /// in a Markdown code fence.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(strip_code_fence(raw)) {
            Ok(value @ Value::Object(_)) => Self::from_value(&value),
            Ok(_) => {
                warn!("Reply payload is not a JSON object, using fallback");
                Self::fallback()
            }
            Err(e) => {
                warn!(error = %e, "Reply payload is not valid JSON, using fallback");
                Self::fallback()
            }
        }
    }

    /// Pull each field out of a JSON object, defaulting anything missing or malformed.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let result = Self {
            doctor_reply: text("doctorReply").unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            relevancy: value.get("relevancy").map(parse_relevancy).unwrap_or_default(),
            justification: text("justification"),
            next_conversation_stage: text("nextConversationStage").and_then(|s| s.parse().ok()),
            next_mood: text("nextMood").and_then(|s| s.parse().ok()),
            signals: value
                .get("signals")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };
        debug!(
            relevancy = result.relevancy.score(),
            mood = ?result.next_mood,
            stage = ?result.next_conversation_stage,
            "Parsed reply result"
        );
        result
    }

    /// The part of the result the persona state machine consumes.
    pub fn assessment(&self) -> TurnAssessment {
        TurnAssessment {
            relevancy: self.relevancy,
            next_mood: self.next_mood,
            next_stage: self.next_conversation_stage,
            justification: self.justification.clone(),
        }
    }
}

fn parse_relevancy(value: &Value) -> Relevancy {
    let score = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    score.map(Relevancy::from_score).unwrap_or_default()
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

// ─────────────────────────────────────────────────────────────────
// Generator
// ─────────────────────────────────────────────────────────────────

/// Everything the collaborator is given for one reply.
#[derive(Debug, Clone, Copy)]
pub struct ReplyRequest<'a> {
    pub persona: &'a Persona,
    pub state: &'a PersonaState,
    pub remaining_secs: u64,
    pub transcript: &'a Transcript,
    pub last_rep: &'a str,
    /// Tone directive computed before the reply, if any.
    pub directive: Option<&'a ToneDecision>,
}

impl ReplyRequest<'_> {
    pub fn system_prompt(&self) -> String {
        prompt::system_prompt(self)
    }
}

/// Produces the raw text of the persona's reply.
pub trait ReplyGenerator {
    fn generate(&mut self, request: &ReplyRequest<'_>) -> Result<String>;
}

/// Replays canned collaborator outputs in order. Used for offline replays.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    replies: VecDeque<String>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl ReplyGenerator for ScriptedGenerator {
    fn generate(&mut self, _request: &ReplyRequest<'_>) -> Result<String> {
        self.replies
            .pop_front()
            .ok_or_else(|| Error::GeneratorFailed("script has no replies left".to_string()))
    }
}
