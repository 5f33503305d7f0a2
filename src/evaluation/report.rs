//! Full evaluation of a transcript against one persona

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::compliance::{self, ComplianceReport, TurnViolation};
use super::scoring::{self, Scores};
use super::turns::{self, Highlight, TurnFeedback, DEFAULT_HIGHLIGHT_LIMIT};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::persona::{Persona, PersonaCatalog};
use crate::transcript::Transcript;

pub const SUMMARY: &str = "MR demonstrated improving evidence use with room to lead earlier with trials; \
maintain polite tone, avoid hype, and adapt quickly to doctor cues.";

pub const TOP_ACTIONS: [&str; 3] = [
    "Lead with primary endpoint and n-size when asked for evidence",
    "Avoid hype words; use verifiable numbers and sources",
    "Offer a 1-page summary and propose a concise follow-up",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub persona_id: String,
    /// The persona's description, for display next to the scores.
    pub persona: String,
    pub scores: Scores,
    pub compliance: ComplianceReport,
    pub turn_feedback: Vec<TurnFeedback>,
    pub highlights: Vec<Highlight>,
    pub top_actions: Vec<String>,
    pub compliance_violations: Vec<TurnViolation>,
    pub summary: String,
}

/// Scores finished transcripts. Holds no per-conversation state.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    lexicon: &'a Lexicon,
    highlight_limit: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            highlight_limit: DEFAULT_HIGHLIGHT_LIMIT,
        }
    }

    pub fn with_highlight_limit(mut self, limit: usize) -> Self {
        self.highlight_limit = limit;
        self
    }

    pub fn evaluate(
        &self,
        transcript: &Transcript,
        persona: &Persona,
        must_say: &[String],
        must_not_say: &[String],
    ) -> Evaluation {
        let report = compliance::check(transcript, must_say, must_not_say);
        let mut scores = scoring::score(self.lexicon, transcript);
        scores.compliance = report.score();

        debug!(
            persona = %persona.id,
            turns = transcript.len(),
            accuracy = scores.accuracy,
            empathy = scores.empathy,
            compliance = scores.compliance,
            "Evaluated transcript"
        );

        Evaluation {
            persona_id: persona.id.clone(),
            persona: persona.description.clone(),
            scores,
            turn_feedback: turns::critique_all(self.lexicon, transcript),
            highlights: turns::highlights(self.lexicon, transcript, self.highlight_limit),
            top_actions: TOP_ACTIONS.iter().map(|s| s.to_string()).collect(),
            compliance_violations: compliance::turn_violations(transcript, must_not_say),
            compliance: report,
            summary: SUMMARY.to_string(),
        }
    }

    /// Look the persona up first; an unknown id is an error, never a default.
    pub fn evaluate_for(
        &self,
        catalog: &PersonaCatalog,
        persona_id: &str,
        transcript: &Transcript,
        must_say: &[String],
        must_not_say: &[String],
    ) -> Result<Evaluation> {
        let persona = catalog.get(persona_id)?;
        Ok(self.evaluate(transcript, persona, must_say, must_not_say))
    }
}
