//! RepCoach - persona-driven doctor simulator for medical rep training
//!
//! The library is organised around one shared lexical detector feeding two
//! independent state machines and an evaluator:
//!
//! - [`lexicon`]: phrase lists and the signal detector
//! - [`engine`]: persona state machine with its skepticism tracker
//! - [`tone`]: tone decision engine (full and quick paths)
//! - [`evaluation`]: turn critique, compliance and transcript scoring
//! - [`session`]: conversation service over a transcript store
//!
//! The core modules never fail; [`error::Error`] belongs to the layers
//! around them (config, catalog, stores, collaborator).

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod lexicon;
pub mod logging;
pub mod persona;
pub mod prompt;
pub mod reply;
pub mod session;
pub mod tone;
pub mod transcript;

pub use error::{Error, ErrorCode, Result};
