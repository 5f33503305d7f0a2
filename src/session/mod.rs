//! Conversation sessions
//!
//! A session ties a persona, its live state machines and the growing
//! transcript together under one id, persisted through a [`TranscriptStore`].

pub mod file;
pub mod script;
pub mod service;
pub mod store;

pub use file::FileTranscriptStore;
pub use script::{ConversationScript, ScriptedTurn};
pub use service::{ConversationService, TurnOutcome};
pub use store::{validate_session_id, MemoryTranscriptStore, TranscriptStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{PersonaState, SkepticismLevel};
use crate::tone::ToneState;
use crate::transcript::Transcript;

/// Everything persisted for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub persona_id: String,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub transcript: Transcript,
    pub state: PersonaState,
    #[serde(default)]
    pub tone: ToneState,
    /// Set once the tone engine cut the call.
    #[serde(default)]
    pub ended: bool,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>, persona_id: impl Into<String>, baseline: SkepticismLevel) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            persona_id: persona_id.into(),
            started_at: now,
            updated_at: now,
            transcript: Transcript::new(),
            state: PersonaState::new(baseline),
            tone: ToneState::default(),
            ended: false,
        }
    }
}
