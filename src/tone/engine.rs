//! Full tone decision path
//!
//! Runs before a reply is generated: classifies the representative's latest
//! utterance, moves the bounded quantities and picks a directive. Three hard
//! stop triggers can end the call outright.

use tracing::{debug, info};

use super::state::{ToneDecision, ToneMood, ToneState, MAX_ENGAGEMENT, MAX_PRESSURE, MAX_SKEPTICISM};
use crate::lexicon::{Lexicon, SignalKind};

pub const EVIDENCE_DIRECTIVE: &str =
    "Good. Now tell me about the clinical significance and practical implications.";
pub const HYPE_DIRECTIVE: &str = "I need specifics, not marketing. What's the actual data?";
pub const MONOLOGUE_DIRECTIVE: &str = "I need the key points, not a presentation. Bottom line?";
pub const REPETITION_DIRECTIVE: &str = "I heard you the first time. What else do you have?";
pub const BUSY_DIRECTIVE: &str = "I have patients waiting. What's the key point?";
pub const DEFAULT_DIRECTIVE: &str = "Continue, but be concise.";

/// Closing lines, chosen by `hype_count % 4` on a hard stop.
pub const CLOSING_LINES: [&str; 4] = [
    "I'm ending this call. Send me the data sheet.",
    "I don't have time for this. Email me the trial results.",
    "I have patients waiting. This conversation is over.",
    "Send me the evidence, not the sales pitch. Goodbye.",
];

const HYPE_LIMIT: u32 = 3;
const MONOLOGUE_LIMIT: u32 = 2;
const BUSY_PRESSURE: u8 = 4;
const LOW_PATIENCE: u8 = 1;

/// Why a call was cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardStop {
    /// Accumulated hype reached the limit.
    HypeLimit,
    /// Repeated monologues while the persona is already pressed for time.
    MonologueUnderPressure,
    /// Hype arriving when patience is exhausted.
    HypeOnLowPatience,
}

impl HardStop {
    /// Triggers caused by history alone skip classification of the current utterance.
    fn skips_classification(&self) -> bool {
        !matches!(self, HardStop::HypeOnLowPatience)
    }
}

/// The tone decision engine, bound to one lexicon.
#[derive(Debug, Clone, Copy)]
pub struct ToneEngine<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> ToneEngine<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Check the hard stop triggers in precedence order.
    pub fn hard_stop(&self, state: &ToneState, last_rep: &str) -> Option<HardStop> {
        if state.hype_count >= HYPE_LIMIT {
            Some(HardStop::HypeLimit)
        } else if state.monologue_count >= MONOLOGUE_LIMIT && state.time_pressure >= BUSY_PRESSURE {
            Some(HardStop::MonologueUnderPressure)
        } else if state.patience <= LOW_PATIENCE && self.lexicon.is_hype(last_rep) {
            Some(HardStop::HypeOnLowPatience)
        } else {
            None
        }
    }

    /// Decide the persona's next tone.
    ///
    /// The full path does not look at the persona's previous line; it is taken
    /// so both decision paths share one call shape.
    pub fn decide(&self, state: &ToneState, _last_persona: &str, last_rep: &str) -> ToneDecision {
        let mut next = state.clone().clamped();
        let stop = self.hard_stop(&next, last_rep);

        let (action, pause_reply) = match stop {
            Some(reason) if reason.skips_classification() => (String::new(), false),
            _ => self.classify(&mut next, last_rep),
        };

        match stop {
            Some(reason) => {
                let closing = CLOSING_LINES[(next.hype_count % CLOSING_LINES.len() as u32) as usize];
                next.mood = ToneMood::Dismissive;
                next.time_pressure = MAX_PRESSURE;
                next.patience = 0;
                info!(
                    ?reason,
                    hype_count = next.hype_count,
                    monologue_count = next.monologue_count,
                    "Hard stop, ending call"
                );
                ToneDecision {
                    state: next,
                    action: closing.to_string(),
                    pause_reply: false,
                    cut_now: true,
                }
            }
            None => ToneDecision {
                state: next,
                action,
                pause_reply,
                cut_now: false,
            },
        }
    }

    fn classify(&self, next: &mut ToneState, last_rep: &str) -> (String, bool) {
        let signals = self.lexicon.scan(last_rep);
        let kind = signals.primary();
        debug!(?kind, words = signals.word_count, "Classified utterance");

        match kind {
            SignalKind::Evidence => {
                next.evidence_count = next.evidence_count.saturating_add(1);
                next.mood = ToneMood::Engaged;
                next.time_pressure = next.time_pressure.saturating_sub(2).max(1);
                next.skepticism = next.skepticism.saturating_sub(1).max(1);
                next.engagement = (next.engagement + 2).min(MAX_ENGAGEMENT);
                (EVIDENCE_DIRECTIVE.to_string(), false)
            }
            SignalKind::Hype => {
                next.hype_count = next.hype_count.saturating_add(1);
                next.patience = next.patience.saturating_sub(2);
                next.mood = ToneMood::Annoyed;
                next.time_pressure = (next.time_pressure + 1).min(MAX_PRESSURE);
                next.skepticism = (next.skepticism + 1).min(MAX_SKEPTICISM);
                next.engagement = next.engagement.saturating_sub(1).max(1);
                (HYPE_DIRECTIVE.to_string(), false)
            }
            SignalKind::Monologue => {
                next.monologue_count = next.monologue_count.saturating_add(1);
                next.patience = next.patience.saturating_sub(1);
                next.mood = ToneMood::Impatient;
                next.time_pressure = (next.time_pressure + 1).min(MAX_PRESSURE);
                (MONOLOGUE_DIRECTIVE.to_string(), false)
            }
            SignalKind::Repetition => {
                next.patience = next.patience.saturating_sub(1);
                next.mood = ToneMood::Frustrated;
                next.time_pressure = (next.time_pressure + 1).min(MAX_PRESSURE);
                (REPETITION_DIRECTIVE.to_string(), false)
            }
            SignalKind::Plain if next.time_pressure >= BUSY_PRESSURE => {
                next.mood = ToneMood::Busy;
                (BUSY_DIRECTIVE.to_string(), true)
            }
            SignalKind::Plain => {
                next.mood = ToneMood::Neutral;
                (DEFAULT_DIRECTIVE.to_string(), false)
            }
        }
    }
}
