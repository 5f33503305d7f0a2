//! Transcript store capability and its in-memory implementation

use std::collections::HashMap;

use parking_lot::RwLock;

use super::SessionRecord;
use crate::error::{Error, Result};

/// Session-keyed persistence for conversation records.
///
/// The store does not serialize turns of one conversation; callers do.
pub trait TranscriptStore: Send + Sync {
    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    fn put(&self, session_id: &str, record: &SessionRecord) -> Result<()>;
}

/// Reject ids that could not safely be used as a file name.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    let valid = !session_id.is_empty()
        && session_id.len() <= 128
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::SessionIdInvalid {
            session_id: session_id.to_string(),
        })
    }
}

/// Process-local store. Records are cloned in and out.
#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    records: RwLock<HashMap<String, SessionRecord>>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl TranscriptStore for MemoryTranscriptStore {
    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        validate_session_id(session_id)?;
        Ok(self.records.read().get(session_id).cloned())
    }

    fn put(&self, session_id: &str, record: &SessionRecord) -> Result<()> {
        validate_session_id(session_id)?;
        self.records
            .write()
            .insert(session_id.to_string(), record.clone());
        Ok(())
    }
}
