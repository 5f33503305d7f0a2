//! Quick tone path
//!
//! A lighter decision over the persona's coarse mood, used when only mood,
//! time pressure and skepticism are tracked. Unlike the full path it reads the
//! persona's previous line for a request to keep things brief.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::{MAX_PRESSURE, MAX_SKEPTICISM};
use crate::engine::Mood;
use crate::lexicon::Lexicon;

pub const CLOSING_ACTION: &str =
    "Be brief and firm; ask for RCT size and primary endpoint; consider moving to closure.";
pub const EVIDENCE_ACTION: &str =
    "Acknowledge evidence; ask one follow-up about endpoint or safety, keep it concise.";
pub const HYPE_ACTION: &str =
    "Request specific evidence: trial size, outcomes, and p-value; avoid marketing language.";
pub const DEFAULT_ACTION: &str =
    "Maintain professional tone; request relevant, evidence-based points.";

/// Actions are cut to this many characters.
pub const MAX_ACTION_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickToneState {
    pub mood: Mood,
    pub time_pressure: u8,
    pub skepticism: u8,
}

impl Default for QuickToneState {
    fn default() -> Self {
        Self {
            mood: Mood::Neutral,
            time_pressure: 3,
            skepticism: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickDecision {
    pub mood: Mood,
    pub time_pressure: u8,
    pub skepticism: u8,
    pub action: String,
    /// Always false on this path.
    pub pause_reply: bool,
}

/// Decide tone from the latest exchange without counters or hard stops.
pub fn decide_quick(
    lexicon: &Lexicon,
    state: &QuickToneState,
    last_persona: &str,
    last_rep: &str,
) -> QuickDecision {
    let signals = lexicon.scan(last_rep);
    let mut mood = state.mood;
    let mut time_pressure = state.time_pressure as i32;
    let mut skepticism = state.skepticism as i32;

    if signals.hype {
        skepticism += 2;
        time_pressure += 1;
        mood = Mood::Dismissive;
    }

    if signals.trial_with_statistic {
        skepticism -= 1;
        if mood != Mood::Dismissive {
            mood = Mood::Engaged;
        }
    }

    if signals.monologue && (time_pressure >= 3 || lexicon.has_pressure_cue(last_persona)) {
        time_pressure += 1;
    }

    let time_pressure = time_pressure.clamp(0, MAX_PRESSURE as i32) as u8;
    let skepticism = skepticism.clamp(0, MAX_SKEPTICISM as i32) as u8;

    let action = if mood == Mood::Dismissive || time_pressure >= 4 {
        CLOSING_ACTION
    } else if signals.trial_with_statistic {
        EVIDENCE_ACTION
    } else if signals.hype {
        HYPE_ACTION
    } else {
        DEFAULT_ACTION
    };

    debug!(%mood, time_pressure, skepticism, "Quick tone decision");

    QuickDecision {
        mood,
        time_pressure,
        skepticism,
        action: action.chars().take(MAX_ACTION_CHARS).collect(),
        pause_reply: false,
    }
}
