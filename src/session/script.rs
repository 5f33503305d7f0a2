//! Scripted conversations for offline replays

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reply::ScriptedGenerator;

/// A whole conversation prepared ahead of time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationScript {
    pub turns: Vec<ScriptedTurn>,
}

/// One representative line and the collaborator output that answers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTurn {
    pub rep: String,

    /// Collaborator payload, either a JSON object or its raw text.
    /// Missing means the collaborator failed on this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<Value>,

    /// Simulated seconds for this turn; the service default otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<i64>,
}

impl ScriptedTurn {
    /// The reply as the raw text a live collaborator would return.
    pub fn raw_reply(&self) -> Option<String> {
        match &self.reply {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// A generator holding exactly this turn's reply.
    pub fn generator(&self) -> ScriptedGenerator {
        ScriptedGenerator::new(self.raw_reply())
    }
}
