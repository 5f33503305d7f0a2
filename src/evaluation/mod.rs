//! Post-hoc evaluation of a representative's performance
//!
//! Works on a finished (or snapshot) transcript and never touches live
//! conversation state. Identical inputs always give identical output.

pub mod compliance;
pub mod report;
pub mod scoring;
pub mod turns;

pub use compliance::{ComplianceReport, TurnViolation};
pub use report::{Evaluation, Evaluator, SUMMARY, TOP_ACTIONS};
pub use scoring::Scores;
pub use turns::{Highlight, HighlightKind, IssueType, Sentiment, TurnFeedback};
