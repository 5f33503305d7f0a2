//! Required and forbidden phrase checks

use serde::{Deserialize, Serialize};

use crate::transcript::Transcript;

const PENALTY_PER_MISS: u32 = 10;

/// Which required phrases were said, which were not, and which forbidden ones were.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub must_say_mentioned: Vec<String>,
    pub must_say_missed: Vec<String>,
    pub must_not_say_violations: Vec<String>,
}

impl ComplianceReport {
    /// 100 minus 10 per missed required phrase and per violation, floored at 0.
    pub fn score(&self) -> u8 {
        let misses = (self.must_say_missed.len() + self.must_not_say_violations.len()) as u32;
        100u32.saturating_sub(misses.saturating_mul(PENALTY_PER_MISS)) as u8
    }
}

/// A forbidden phrase found in one representative turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnViolation {
    pub turn_index: usize,
    pub text: String,
    pub rule: String,
    pub explain: String,
}

/// Check the whole conversation, both speakers, against the phrase lists.
pub fn check(transcript: &Transcript, must_say: &[String], must_not_say: &[String]) -> ComplianceReport {
    let full_text = transcript
        .turns()
        .iter()
        .map(|t| t.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let present = |phrase: &String| full_text.contains(&phrase.to_lowercase());

    let (mentioned, missed): (Vec<String>, Vec<String>) =
        must_say.iter().cloned().partition(|p| present(p));

    ComplianceReport {
        must_say_mentioned: mentioned,
        must_say_missed: missed,
        must_not_say_violations: must_not_say.iter().filter(|p| present(p)).cloned().collect(),
    }
}

/// Every (representative turn, forbidden phrase) pair where the phrase occurs.
pub fn turn_violations(transcript: &Transcript, must_not_say: &[String]) -> Vec<TurnViolation> {
    let mut violations = Vec::new();
    for turn in transcript.representative_turns() {
        let lowered = turn.text.to_lowercase();
        for phrase in must_not_say {
            if lowered.contains(&phrase.to_lowercase()) {
                violations.push(TurnViolation {
                    turn_index: turn.index,
                    text: turn.text.clone(),
                    rule: "must_not_say".to_string(),
                    explain: format!("Contains prohibited phrase: '{}'.", phrase),
                });
            }
        }
    }
    violations
}
