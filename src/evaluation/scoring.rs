//! Aggregate performance scores

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::transcript::Transcript;

const BASE_ACCURACY: i32 = 70;
const BASE_EMPATHY: i32 = 60;
const BASE_COMPLIANCE: i32 = 80;
const BASE_ADAPTABILITY: i32 = 65;

const TRIAL_BONUS: i32 = 15;
const EMPATHY_BONUS: i32 = 15;
const HYPE_PENALTY: i32 = 10;

/// Four dimensions, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub accuracy: u8,
    pub empathy: u8,
    pub compliance: u8,
    pub adaptability: u8,
}

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

/// Score the representative's side of the conversation.
///
/// `compliance` here is the heuristic value; callers overwrite it with the
/// phrase-check score.
pub fn score(lexicon: &Lexicon, transcript: &Transcript) -> Scores {
    let rep_text = transcript
        .representative_turns()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let signals = lexicon.scan(&rep_text);

    let mut accuracy = BASE_ACCURACY;
    let mut empathy = BASE_EMPATHY;
    let mut compliance = BASE_COMPLIANCE;

    if signals.trial_with_statistic {
        accuracy += TRIAL_BONUS;
    }
    if signals.patient_language {
        empathy += EMPATHY_BONUS;
    }
    if signals.hype {
        accuracy -= HYPE_PENALTY;
        compliance -= HYPE_PENALTY;
    }

    Scores {
        accuracy: clamp_score(accuracy),
        empathy: clamp_score(empathy),
        compliance: clamp_score(compliance),
        adaptability: clamp_score(BASE_ADAPTABILITY),
    }
}
