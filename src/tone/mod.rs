//! Tone decision engine
//!
//! Produces a short directive for the persona *before* a reply is generated.
//! Independent of the persona state machine; both read the same lexicon.

pub mod engine;
pub mod quick;
pub mod state;

pub use engine::{HardStop, ToneEngine, CLOSING_LINES};
pub use quick::{decide_quick, QuickDecision, QuickToneState};
pub use state::{ToneDecision, ToneMood, ToneState};
