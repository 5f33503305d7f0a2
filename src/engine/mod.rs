//! Persona state machine
//!
//! Authoritative affect, trust, time pressure and skepticism of one simulated
//! persona, updated once per representative turn after a reply exists.

pub mod skepticism;
pub mod state;
pub mod transition;

pub use skepticism::{SkepticismLevel, SkepticismWindow, SKEPTICISM_WINDOW};
pub use state::{Mood, PersonaState, Relevancy, Stage};
pub use transition::{advance, fallback_mood, TurnAssessment};
