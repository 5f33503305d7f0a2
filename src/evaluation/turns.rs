//! Turn-level critique and highlights

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::transcript::{Transcript, Turn};

pub const PRAISE_SUGGESTION: &str = "Good. Add journal/source and safety note.";
pub const ISSUE_SUGGESTION: &str = "Avoid hype; lead with trial size, endpoint, and p-value.";
pub const HIGHLIGHT_CONFIDENCE: f32 = 0.9;
pub const DEFAULT_HIGHLIGHT_LIMIT: usize = 6;

const JUSTIFICATION: &str = "Analyzed based on persona preferences and communication style.";
const ALTERNATIVES: [&str; 3] = [
    "Provide specific trial data",
    "Mention patient outcomes",
    "Reference guidelines",
];

// ─────────────────────────────────────────────────────────────────
// Per-turn Feedback
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    fn critique_suffix(&self) -> &'static str {
        match self {
            Sentiment::Positive => " - Good use of evidence-based language.",
            Sentiment::Negative => " - Avoid vague marketing terms without proof.",
            Sentiment::Neutral => " - Neutral response, could be more specific.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFeedback {
    pub turn_index: usize,
    pub text: String,
    pub critique: String,
    pub sentiment: Sentiment,
    pub could_have_said: Vec<String>,
    pub justification: String,
}

/// Classify one representative line. Evidence wins over hype.
pub fn sentiment(lexicon: &Lexicon, text: &str) -> Sentiment {
    let signals = lexicon.scan(text);
    if signals.evidence || signals.substantiation {
        Sentiment::Positive
    } else if signals.hype {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn critique_turn(lexicon: &Lexicon, turn: &Turn) -> TurnFeedback {
    let sentiment = sentiment(lexicon, &turn.text);
    let could_have_said = match sentiment {
        Sentiment::Negative => ALTERNATIVES.iter().map(|s| s.to_string()).collect(),
        _ => Vec::new(),
    };
    TurnFeedback {
        turn_index: turn.index,
        text: turn.text.clone(),
        critique: format!("Message: '{}'{}", turn.text, sentiment.critique_suffix()),
        sentiment,
        could_have_said,
        justification: JUSTIFICATION.to_string(),
    }
}

/// Feedback for every representative turn, in order.
pub fn critique_all(lexicon: &Lexicon, transcript: &Transcript) -> Vec<TurnFeedback> {
    transcript
        .representative_turns()
        .map(|turn| critique_turn(lexicon, turn))
        .collect()
}

// ─────────────────────────────────────────────────────────────────
// Highlights
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Praise,
    Issue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    EvidenceGiven,
    VagueClaim,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub turn_index: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    pub issue_type: IssueType,
    pub suggestion: String,
    pub confidence: f32,
}

/// Up to `limit` notable representative turns; neutral turns are skipped.
pub fn highlights(lexicon: &Lexicon, transcript: &Transcript, limit: usize) -> Vec<Highlight> {
    transcript
        .representative_turns()
        .filter_map(|turn| {
            let signals = lexicon.scan(&turn.text);
            let (kind, issue_type, suggestion) = if signals.evidence {
                (HighlightKind::Praise, IssueType::EvidenceGiven, PRAISE_SUGGESTION)
            } else if signals.hype {
                (HighlightKind::Issue, IssueType::VagueClaim, ISSUE_SUGGESTION)
            } else {
                return None;
            };
            Some(Highlight {
                turn_index: turn.index,
                text: turn.text.clone(),
                kind,
                issue_type,
                suggestion: suggestion.to_string(),
                confidence: HIGHLIGHT_CONFIDENCE,
            })
        })
        .take(limit)
        .collect()
}
