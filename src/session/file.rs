//! JSON-file transcript store: one pretty-printed file per session.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::store::{validate_session_id, TranscriptStore};
use super::SessionRecord;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    dir: PathBuf,
}

impl FileTranscriptStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }
}

impl TranscriptStore for FileTranscriptStore {
    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        validate_session_id(session_id)?;
        let path = self.path_for(session_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| Error::IoRead {
            path: path.clone(),
            source,
        })?;
        let record = serde_json::from_str(&content).map_err(|e| Error::TranscriptCorrupt {
            session_id: session_id.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(record))
    }

    fn put(&self, session_id: &str, record: &SessionRecord) -> Result<()> {
        validate_session_id(session_id)?;
        fs::create_dir_all(&self.dir).map_err(|source| Error::IoWrite {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(session_id);
        let content = serde_json::to_string_pretty(record)?;

        // atomic replace
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|source| Error::IoWrite {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| Error::IoWrite {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), turns = record.transcript.len(), "Saved session");
        Ok(())
    }
}
