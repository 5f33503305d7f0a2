//! Conversation lifecycle: start, take turns, end with an evaluation.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::script::ConversationScript;
use super::store::{validate_session_id, TranscriptStore};
use super::SessionRecord;
use crate::engine::{advance, PersonaState};
use crate::error::{Error, Result};
use crate::evaluation::{Evaluation, Evaluator};
use crate::lexicon::Lexicon;
use crate::persona::PersonaCatalog;
use crate::reply::{ReplyGenerator, ReplyRequest, ReplyResult};
use crate::tone::{ToneDecision, ToneEngine};
use crate::transcript::Speaker;

/// Simulated seconds a turn takes when the caller does not say.
pub const DEFAULT_TURN_SECONDS: i64 = 30;

/// What one representative turn produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub session_id: String,
    pub reply: ReplyResult,
    pub state: PersonaState,
    /// Tone decision made before the reply was generated.
    pub tone: ToneDecision,
    pub remaining_secs: u64,
    pub turns: usize,
}

/// Drives conversations over a persona catalog and a transcript store.
pub struct ConversationService<'a> {
    catalog: &'a PersonaCatalog,
    store: &'a dyn TranscriptStore,
    lexicon: &'a Lexicon,
    turn_seconds: i64,
    highlight_limit: Option<usize>,
}

impl<'a> ConversationService<'a> {
    pub fn new(catalog: &'a PersonaCatalog, store: &'a dyn TranscriptStore, lexicon: &'a Lexicon) -> Self {
        Self {
            catalog,
            store,
            lexicon,
            turn_seconds: DEFAULT_TURN_SECONDS,
            highlight_limit: None,
        }
    }

    pub fn with_turn_seconds(mut self, seconds: i64) -> Self {
        self.turn_seconds = seconds;
        self
    }

    pub fn with_highlight_limit(mut self, limit: usize) -> Self {
        self.highlight_limit = Some(limit);
        self
    }

    /// Open a conversation with a persona. A fresh UUID is issued unless `session_id` is given.
    ///
    /// An id that is already stored is refused rather than overwritten.
    pub fn start(&self, persona_id: &str, session_id: Option<String>) -> Result<SessionRecord> {
        let persona = self.catalog.get(persona_id)?;
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        validate_session_id(&session_id)?;
        if self.store.get(&session_id)?.is_some() {
            return Err(Error::session_exists(session_id));
        }

        let record = SessionRecord::new(&session_id, &persona.id, persona.skepticism_level);
        self.store.put(&session_id, &record)?;

        info!(session = %session_id, persona = %persona.id, "Conversation started");
        Ok(record)
    }

    /// Load a stored session.
    pub fn session(&self, session_id: &str) -> Result<SessionRecord> {
        self.store
            .get(session_id)?
            .ok_or_else(|| Error::session_not_found(session_id))
    }

    /// Process one representative utterance end to end.
    ///
    /// A failing generator does not fail the turn: the persona asks for
    /// clarification and the state machine sees a neutral assessment.
    /// Once the doctor has cut the call the session only accepts `end`.
    pub fn take_turn(
        &self,
        session_id: &str,
        rep_text: &str,
        generator: &mut dyn ReplyGenerator,
        time_delta: Option<i64>,
    ) -> Result<TurnOutcome> {
        let mut record = self.session(session_id)?;
        if record.ended {
            return Err(Error::session_ended(session_id));
        }
        let persona = self.catalog.get(&record.persona_id)?;
        record.state.rebase(persona.skepticism_level);

        let last_persona = record
            .transcript
            .last_from(&Speaker::Persona)
            .map(|t| t.text.clone())
            .unwrap_or_default();

        record
            .transcript
            .push(Speaker::Representative, rep_text, Some(Utc::now().to_rfc3339()));

        let tone = ToneEngine::new(self.lexicon).decide(&record.tone, &last_persona, rep_text);
        let remaining = record.state.remaining_secs(persona.available_time_secs);

        let request = ReplyRequest {
            persona,
            state: &record.state,
            remaining_secs: remaining,
            transcript: &record.transcript,
            last_rep: rep_text,
            directive: Some(&tone),
        };
        let reply = match generator.generate(&request) {
            Ok(raw) => ReplyResult::parse(&raw),
            Err(e) => {
                warn!(session = %session_id, error = %e, "Reply generation failed, using fallback");
                ReplyResult::fallback()
            }
        };

        record
            .transcript
            .push(Speaker::Persona, reply.doctor_reply.clone(), Some(Utc::now().to_rfc3339()));

        let delta = time_delta.unwrap_or(self.turn_seconds);
        record.state = advance(&record.state, &reply.assessment(), delta, persona.skepticism_level);
        record.tone = tone.state.clone();
        record.ended |= tone.cut_now;
        record.updated_at = Utc::now();

        self.store.put(session_id, &record)?;

        debug!(
            session = %session_id,
            turns = record.transcript.len(),
            cut = tone.cut_now,
            "Turn recorded"
        );

        Ok(TurnOutcome {
            session_id: record.session_id.clone(),
            remaining_secs: record.state.remaining_secs(persona.available_time_secs),
            turns: record.transcript.len(),
            state: record.state,
            reply,
            tone,
        })
    }

    /// Feed a prepared script through `take_turn`, one generator per line.
    ///
    /// Stops after the turn on which the tone engine cuts the call.
    pub fn replay(&self, session_id: &str, script: &ConversationScript) -> Result<Vec<TurnOutcome>> {
        let mut outcomes = Vec::with_capacity(script.turns.len());
        for line in &script.turns {
            let mut generator = line.generator();
            let outcome = self.take_turn(session_id, &line.rep, &mut generator, line.seconds)?;
            let cut = outcome.tone.cut_now;
            outcomes.push(outcome);
            if cut {
                info!(session = %session_id, turns = outcomes.len(), "Call cut short by the doctor");
                break;
            }
        }
        Ok(outcomes)
    }

    /// Evaluate the stored transcript of a session.
    pub fn end(&self, session_id: &str, must_say: &[String], must_not_say: &[String]) -> Result<Evaluation> {
        let record = self.session(session_id)?;
        let mut evaluator = Evaluator::new(self.lexicon);
        if let Some(limit) = self.highlight_limit {
            evaluator = evaluator.with_highlight_limit(limit);
        }
        let evaluation = evaluator.evaluate_for(
            self.catalog,
            &record.persona_id,
            &record.transcript,
            must_say,
            must_not_say,
        )?;

        info!(
            session = %session_id,
            accuracy = evaluation.scores.accuracy,
            compliance = evaluation.scores.compliance,
            "Conversation evaluated"
        );
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Mood, Relevancy, SkepticismLevel, Stage};
    use crate::error::ErrorCode;
    use crate::reply::ScriptedGenerator;
    use crate::session::MemoryTranscriptStore;

    struct Fixture {
        catalog: PersonaCatalog,
        store: MemoryTranscriptStore,
        lexicon: Lexicon,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: PersonaCatalog::bundled().unwrap(),
                store: MemoryTranscriptStore::new(),
                lexicon: Lexicon::default(),
            }
        }

        fn service(&self) -> ConversationService<'_> {
            ConversationService::new(&self.catalog, &self.store, &self.lexicon)
        }
    }

    #[test]
    fn test_start_unknown_persona() {
        let fx = Fixture::new();
        let err = fx.service().start("doc_999", None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PersonaNotFound);
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_start_initial_state() {
        let fx = Fixture::new();
        let record = fx.service().start("doc_001", None).unwrap();
        assert!(Uuid::parse_str(&record.session_id).is_ok());
        assert_eq!(record.state.skepticism(), SkepticismLevel::High);
        assert_eq!(record.state.trust, 50);
        assert!(record.transcript.is_empty());
        assert!(fx.store.get(&record.session_id).unwrap().is_some());
    }

    #[test]
    fn test_turn_applies_reply() {
        let fx = Fixture::new();
        let service = fx.service();
        service.start("doc_002", Some("s-1".to_string())).unwrap();

        let mut generator = ScriptedGenerator::new([
            r#"{"doctorReply": "Which trial?", "relevancy": 1, "nextMood": "Engaged", "nextConversationStage": "Discussion"}"#,
        ]);
        let outcome = service
            .take_turn("s-1", "We have phase 3 data", &mut generator, None)
            .unwrap();

        assert_eq!(outcome.reply.doctor_reply, "Which trial?");
        assert_eq!(outcome.state.trust, 60);
        assert_eq!(outcome.state.time_pressure, 1);
        assert_eq!(outcome.state.mood, Mood::Engaged);
        assert_eq!(outcome.state.stage, Stage::Discussion);
        assert_eq!(outcome.state.elapsed_secs, 30);
        assert_eq!(outcome.remaining_secs, 90);
        assert_eq!(outcome.turns, 2);
        assert_eq!(outcome.tone.state.evidence_count, 1);

        let stored = service.session("s-1").unwrap();
        assert_eq!(stored.transcript.len(), 2);
        assert_eq!(stored.state, outcome.state);
        assert_eq!(stored.transcript.turns()[1].text, "Which trial?");
    }

    #[test]
    fn test_generator_failure_falls_back() {
        let fx = Fixture::new();
        let service = fx.service();
        service.start("doc_003", Some("s-2".to_string())).unwrap();

        let mut empty = ScriptedGenerator::default();
        let outcome = service.take_turn("s-2", "Hello, thanks", &mut empty, Some(15)).unwrap();
        assert_eq!(outcome.reply.doctor_reply, "Please clarify.");
        assert_eq!(outcome.reply.relevancy, Relevancy::Neutral);
        assert_eq!(outcome.state.mood, Mood::Neutral);
        assert_eq!(outcome.state.stage, Stage::Introduction);
        assert_eq!(outcome.state.elapsed_secs, 15);
    }

    #[test]
    fn test_turn_on_missing_session() {
        let fx = Fixture::new();
        let mut generator = ScriptedGenerator::default();
        let err = fx
            .service()
            .take_turn("ghost", "hi", &mut generator, None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }

    #[test]
    fn test_hype_run_ends_call_and_evaluates() {
        let fx = Fixture::new();
        let service = fx.service();
        service.start("doc_001", Some("s-3".to_string())).unwrap();

        let mut generator = ScriptedGenerator::new(vec![r#"{"doctorReply": "Hm.", "relevancy": -1}"#; 3]);
        let mut last = None;
        for _ in 0..3 {
            last = Some(
                service
                    .take_turn("s-3", "This is the best, revolutionary treatment!", &mut generator, None)
                    .unwrap(),
            );
        }
        let last = last.unwrap();
        assert!(last.tone.cut_now);
        assert!(service.session("s-3").unwrap().ended);
        assert_eq!(last.state.trust, 20);

        let evaluation = service
            .end("s-3", &["indication".to_string()], &["revolutionary".to_string()])
            .unwrap();
        assert_eq!(evaluation.scores.compliance, 80);
        assert_eq!(evaluation.compliance_violations.len(), 3);
        assert!(evaluation.highlights.iter().all(|h| h.turn_index % 2 == 0));
    }

    #[test]
    fn test_start_refuses_existing_id() {
        let fx = Fixture::new();
        let service = fx.service();
        service.start("doc_001", Some("s-5".to_string())).unwrap();
        let mut generator = ScriptedGenerator::new([r#"{"doctorReply": "Go on."}"#]);
        service.take_turn("s-5", "Hello, thanks", &mut generator, None).unwrap();

        let err = service.start("doc_002", Some("s-5".to_string())).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionExists);

        let stored = service.session("s-5").unwrap();
        assert_eq!(stored.persona_id, "doc_001");
        assert_eq!(stored.transcript.len(), 2);
    }

    #[test]
    fn test_no_turns_after_cut() {
        let fx = Fixture::new();
        let service = fx.service();
        service.start("doc_001", Some("s-6".to_string())).unwrap();

        let mut generator = ScriptedGenerator::new(vec![r#"{"doctorReply": "Hm."}"#; 4]);
        for _ in 0..3 {
            service
                .take_turn("s-6", "This is the best, revolutionary treatment!", &mut generator, None)
                .unwrap();
        }
        let err = service
            .take_turn("s-6", "One more thing", &mut generator, None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionEnded);
        assert_eq!(service.session("s-6").unwrap().transcript.len(), 6);

        // Evaluation still works on an ended session
        assert!(service.end("s-6", &[], &[]).is_ok());
    }

    #[test]
    fn test_replay_stops_at_cut() {
        let fx = Fixture::new();
        let service = fx.service();
        service.start("doc_005", Some("s-4".to_string())).unwrap();

        let script: ConversationScript = serde_json::from_str(
            r#"{"turns": [
                {"rep": "The best option!", "reply": {"doctorReply": "Really?", "relevancy": -1}},
                {"rep": "Truly amazing results!", "reply": {"doctorReply": "Hm.", "relevancy": -1}},
                {"rep": "An unbelievable drug!", "reply": {"doctorReply": "Thanks.", "relevancy": -1}},
                {"rep": "One more thing", "reply": {"doctorReply": "No."}}
            ]}"#,
        )
        .unwrap();

        let outcomes = service.replay("s-4", &script).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[2].tone.cut_now);
        assert_eq!(service.session("s-4").unwrap().transcript.len(), 6);
    }
}
