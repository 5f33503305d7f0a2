//! Lexical signal detection
//!
//! Classifies a single utterance into the signal categories both state
//! machines react to. Everything here is keyword matching over lower-cased
//! text; the phrase lists are plain data so they can be overridden from
//! configuration and asserted on exactly in tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Vocabulary
// ─────────────────────────────────────────────────────────────────

/// Marketing superlatives that erode the persona's patience.
pub const HYPE_PHRASES: &[&str] = &[
    "best",
    "revolutionary",
    "amazing",
    "unbelievable",
    "game-changing",
];

/// Clinical evidence vocabulary, grouped by family.
pub const EVIDENCE_PHRASES: &[&str] = &[
    // Statistical evidence
    "n=",
    "p=",
    "p-value",
    "confidence interval",
    "ci",
    "hazard ratio",
    "hr",
    "odds ratio",
    "or",
    // Clinical endpoints
    "primary endpoint",
    "secondary endpoint",
    "efficacy",
    "response rate",
    "remission rate",
    "progression-free survival",
    "pfs",
    "overall survival",
    "os",
    "disease-free survival",
    "dfs",
    // Trial design
    "randomized",
    "rct",
    "double-blind",
    "placebo-controlled",
    "phase",
    "multicenter",
    // Safety data
    "adverse events",
    "ae",
    "serious adverse events",
    "sae",
    "toxicity",
    "safety profile",
    // Biomarkers
    "biomarker",
    "genetic",
    "mutation",
    "expression",
    "receptor",
    "pathway",
    // Real-world evidence
    "real-world",
    "registry",
    "observational",
    "post-marketing",
    "surveillance",
    // Guidelines/standards
    "guidelines",
    "consensus",
    "recommendation",
    "standard of care",
    "treatment algorithm",
];

/// Markers of the representative repeating themselves.
pub const REPETITION_PHRASES: &[&str] = &["as i said", "like i mentioned", "again", "repeating"];

/// Words in the persona's own last line that signal it is short on time.
pub const DOCTOR_PRESSURE_CUES: &[&str] = &["quick", "time", "brief", "short"];

/// Trial-design words; paired with a statistic marker they count as hard data.
pub const TRIAL_WORDS: &[&str] = &["trial", "rct", "randomized"];

pub const STATISTIC_MARKERS: &[&str] = &["p=", "p-value", "p value", "%", "n="];

/// Patient-centred language rewarded by the empathy score.
pub const PATIENT_WORDS: &[&str] = &["patient", "safety", "concern", "understand"];

/// Words that mark a turn as substantiated in per-turn critique.
pub const SUBSTANTIATION_WORDS: &[&str] = &["evidence", "trial", "study", "data"];

/// Utterances with more whitespace-delimited tokens than this are monologues.
pub const MONOLOGUE_WORD_LIMIT: usize = 25;

// ─────────────────────────────────────────────────────────────────
// Match Mode
// ─────────────────────────────────────────────────────────────────

/// How a phrase is located inside an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Plain substring test: "or" matches inside "for".
    #[default]
    Substring,
    /// The phrase may not be glued to neighbouring letters or digits.
    WholeWord,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::WholeWord => write!(f, "whole-word"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "substring" => Ok(MatchMode::Substring),
            "whole-word" | "wholeword" => Ok(MatchMode::WholeWord),
            _ => Err(format!(
                "Unknown match mode '{}'. Valid: substring, whole-word",
                s
            )),
        }
    }
}

impl MatchMode {
    /// Test whether `phrase` occurs in `haystack`. Both must already be lower-cased.
    pub fn contains(&self, haystack: &str, phrase: &str) -> bool {
        if phrase.is_empty() {
            return false;
        }
        match self {
            MatchMode::Substring => haystack.contains(phrase),
            MatchMode::WholeWord => haystack.match_indices(phrase).any(|(start, _)| {
                let end = start + phrase.len();
                let open_ok = !phrase.starts_with(char::is_alphanumeric)
                    || !haystack[..start]
                        .chars()
                        .next_back()
                        .is_some_and(char::is_alphanumeric);
                let close_ok = !phrase.ends_with(char::is_alphanumeric)
                    || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
                open_ok && close_ok
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Signals
// ─────────────────────────────────────────────────────────────────

/// The dominant category of an utterance once priority is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Evidence,
    Hype,
    Monologue,
    Repetition,
    Plain,
}

/// Every signal detected in one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub hype: bool,
    pub evidence: bool,
    pub monologue: bool,
    pub repetition: bool,
    /// A trial word and a statistic marker both appear.
    pub trial_with_statistic: bool,
    pub patient_language: bool,
    pub substantiation: bool,
    pub word_count: usize,
}

impl Signals {
    /// Resolve simultaneous signals: evidence > hype > monologue > repetition.
    pub fn primary(&self) -> SignalKind {
        if self.evidence {
            SignalKind::Evidence
        } else if self.hype {
            SignalKind::Hype
        } else if self.monologue {
            SignalKind::Monologue
        } else if self.repetition {
            SignalKind::Repetition
        } else {
            SignalKind::Plain
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Lexicon
// ─────────────────────────────────────────────────────────────────

/// The phrase lists and matching rule used by the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub match_mode: MatchMode,
    pub hype: Vec<String>,
    pub evidence: Vec<String>,
    pub repetition: Vec<String>,
    pub pressure_cues: Vec<String>,
    pub trial_words: Vec<String>,
    pub statistic_markers: Vec<String>,
    pub patient_words: Vec<String>,
    pub substantiation_words: Vec<String>,
    pub monologue_word_limit: usize,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            hype: owned(HYPE_PHRASES),
            evidence: owned(EVIDENCE_PHRASES),
            repetition: owned(REPETITION_PHRASES),
            pressure_cues: owned(DOCTOR_PRESSURE_CUES),
            trial_words: owned(TRIAL_WORDS),
            statistic_markers: owned(STATISTIC_MARKERS),
            patient_words: owned(PATIENT_WORDS),
            substantiation_words: owned(SUBSTANTIATION_WORDS),
            monologue_word_limit: MONOLOGUE_WORD_LIMIT,
        }
    }
}

impl Lexicon {
    /// Lower-case every phrase so user-supplied lists match like the defaults.
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.hype,
            &mut self.evidence,
            &mut self.repetition,
            &mut self.pressure_cues,
            &mut self.trial_words,
            &mut self.statistic_markers,
            &mut self.patient_words,
            &mut self.substantiation_words,
        ] {
            for phrase in list.iter_mut() {
                *phrase = phrase.to_lowercase();
            }
        }
        self
    }

    /// True when any phrase of `list` occurs in the already lower-cased text.
    pub fn contains_any(&self, lowered: &str, list: &[String]) -> bool {
        list.iter().any(|p| self.match_mode.contains(lowered, p))
    }

    /// The phrases of `list` found in `text`, in list order. Case-insensitive.
    pub fn hits<'a>(&self, text: &str, list: &'a [String]) -> Vec<&'a str> {
        let lowered = text.to_lowercase();
        list.iter()
            .filter(|p| self.match_mode.contains(&lowered, &p.to_lowercase()))
            .map(String::as_str)
            .collect()
    }

    pub fn is_hype(&self, text: &str) -> bool {
        self.contains_any(&text.to_lowercase(), &self.hype)
    }

    pub fn is_evidence(&self, text: &str) -> bool {
        self.contains_any(&text.to_lowercase(), &self.evidence)
    }

    pub fn is_monologue(&self, text: &str) -> bool {
        word_count(text) > self.monologue_word_limit
    }

    /// Whether the persona's own previous line asked for brevity.
    pub fn has_pressure_cue(&self, persona_line: &str) -> bool {
        self.contains_any(&persona_line.to_lowercase(), &self.pressure_cues)
    }

    /// Run every detector over one utterance.
    pub fn scan(&self, text: &str) -> Signals {
        let lowered = text.to_lowercase();
        let words = word_count(text);
        Signals {
            hype: self.contains_any(&lowered, &self.hype),
            evidence: self.contains_any(&lowered, &self.evidence),
            monologue: words > self.monologue_word_limit,
            repetition: self.contains_any(&lowered, &self.repetition),
            trial_with_statistic: self.contains_any(&lowered, &self.trial_words)
                && self.contains_any(&lowered, &self.statistic_markers),
            patient_language: self.contains_any(&lowered, &self.patient_words),
            substantiation: self.contains_any(&lowered, &self.substantiation_words),
            word_count: words,
        }
    }
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
