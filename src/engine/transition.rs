//! The persona state transition
//!
//! Applied exactly once per representative turn, after a reply exists.

use tracing::trace;

use super::skepticism::SkepticismLevel;
use super::state::{Mood, PersonaState, Relevancy, Stage, MAX_TIME_PRESSURE, MAX_TRUST};

/// Trust moves this much per unit of relevancy.
const TRUST_STEP: i32 = 10;

/// Time pressure at or above this forces the persona to disengage.
const DISMISSIVE_PRESSURE: u8 = 4;

/// What the reply collaborator concluded about the last turn, already validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnAssessment {
    pub relevancy: Relevancy,
    pub next_mood: Option<Mood>,
    pub next_stage: Option<Stage>,
    pub justification: Option<String>,
}

impl TurnAssessment {
    pub fn with_relevancy(relevancy: Relevancy) -> Self {
        Self {
            relevancy,
            ..Self::default()
        }
    }
}

/// Mood to use when the collaborator does not supply a valid one.
pub fn fallback_mood(current: Mood, relevancy: Relevancy, time_pressure: u8) -> Mood {
    if time_pressure >= DISMISSIVE_PRESSURE {
        return Mood::Dismissive;
    }
    match relevancy {
        Relevancy::Relevant => Mood::Engaged,
        Relevancy::Irrelevant => Mood::Dismissive,
        Relevancy::Neutral => current,
    }
}

/// Compute the state that follows `state` after one assessed turn.
///
/// Total over its inputs: negative `time_delta` counts as zero and every
/// bounded quantity is clamped.
pub fn advance(
    state: &PersonaState,
    assessment: &TurnAssessment,
    time_delta: i64,
    baseline: SkepticismLevel,
) -> PersonaState {
    let relevancy = assessment.relevancy;
    let score = relevancy.score();

    let trust = (state.trust as i32 + score * TRUST_STEP).clamp(0, MAX_TRUST as i32) as u8;

    // the very first turn never moves time pressure
    let time_pressure = if state.elapsed_secs == 0 {
        state.time_pressure.min(MAX_TIME_PRESSURE)
    } else {
        let step = if relevancy == Relevancy::Relevant { -1 } else { 1 };
        (state.time_pressure as i32 + step).clamp(0, MAX_TIME_PRESSURE as i32) as u8
    };

    let mut skepticism_window = state.skepticism_window.clone();
    skepticism_window.update(relevancy);
    let skepticism = skepticism_window.level(baseline);

    let mood = assessment
        .next_mood
        .unwrap_or_else(|| fallback_mood(state.mood, relevancy, time_pressure));
    let stage = assessment.next_stage.unwrap_or(state.stage);

    let elapsed_secs = state.elapsed_secs.saturating_add(time_delta.max(0) as u64);

    trace!(
        relevancy = score,
        trust,
        time_pressure,
        %skepticism,
        %mood,
        %stage,
        elapsed_secs,
        "Persona state advanced"
    );

    PersonaState {
        mood,
        time_pressure,
        stage,
        elapsed_secs,
        trust,
        skepticism_window,
        skepticism,
        note: assessment.justification.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(elapsed: u64) -> PersonaState {
        let mut state = PersonaState::new(SkepticismLevel::Medium);
        state.elapsed_secs = elapsed;
        state
    }

    #[test]
    fn test_trust_moves_by_ten_and_clamps() {
        let state = started(0);
        let up = advance(&state, &TurnAssessment::with_relevancy(Relevancy::Relevant), 30, SkepticismLevel::Medium);
        assert_eq!(up.trust, 60);

        let mut low = started(30);
        low.trust = 5;
        let down = advance(&low, &TurnAssessment::with_relevancy(Relevancy::Irrelevant), 30, SkepticismLevel::Medium);
        assert_eq!(down.trust, 0);

        let mut high = started(30);
        high.trust = 95;
        let capped = advance(&high, &TurnAssessment::with_relevancy(Relevancy::Relevant), 30, SkepticismLevel::Medium);
        assert_eq!(capped.trust, 100);
    }

    #[test]
    fn test_first_turn_leaves_time_pressure() {
        for relevancy in [Relevancy::Irrelevant, Relevancy::Neutral, Relevancy::Relevant] {
            let next = advance(&started(0), &TurnAssessment::with_relevancy(relevancy), 30, SkepticismLevel::Medium);
            assert_eq!(next.time_pressure, 1, "relevancy {relevancy:?}");
        }
    }

    #[test]
    fn test_time_pressure_after_first_turn() {
        let state = started(30);
        let relevant = advance(&state, &TurnAssessment::with_relevancy(Relevancy::Relevant), 30, SkepticismLevel::Medium);
        assert_eq!(relevant.time_pressure, 0);
        let neutral = advance(&state, &TurnAssessment::with_relevancy(Relevancy::Neutral), 30, SkepticismLevel::Medium);
        assert_eq!(neutral.time_pressure, 2);

        let mut floor = started(30);
        floor.time_pressure = 0;
        let stays = advance(&floor, &TurnAssessment::with_relevancy(Relevancy::Relevant), 30, SkepticismLevel::Medium);
        assert_eq!(stays.time_pressure, 0);

        let mut ceiling = started(30);
        ceiling.time_pressure = 5;
        let stays = advance(&ceiling, &TurnAssessment::with_relevancy(Relevancy::Irrelevant), 30, SkepticismLevel::Medium);
        assert_eq!(stays.time_pressure, 5);
    }

    #[test]
    fn test_fallback_mood_rules() {
        assert_eq!(fallback_mood(Mood::Engaged, Relevancy::Relevant, 4), Mood::Dismissive);
        assert_eq!(fallback_mood(Mood::Neutral, Relevancy::Relevant, 3), Mood::Engaged);
        assert_eq!(fallback_mood(Mood::Engaged, Relevancy::Irrelevant, 0), Mood::Dismissive);
        assert_eq!(fallback_mood(Mood::Engaged, Relevancy::Neutral, 2), Mood::Engaged);
    }

    #[test]
    fn test_collaborator_mood_overrides_fallback() {
        let mut state = started(30);
        state.time_pressure = 5;
        let assessment = TurnAssessment {
            relevancy: Relevancy::Irrelevant,
            next_mood: Some(Mood::Engaged),
            ..TurnAssessment::default()
        };
        let next = advance(&state, &assessment, 30, SkepticismLevel::High);
        assert_eq!(next.mood, Mood::Engaged);
    }

    #[test]
    fn test_stage_only_moves_on_suggestion() {
        let state = started(30);
        let same = advance(&state, &TurnAssessment::default(), 30, SkepticismLevel::Medium);
        assert_eq!(same.stage, Stage::Introduction);

        let assessment = TurnAssessment {
            next_stage: Some(Stage::Closure),
            ..TurnAssessment::default()
        };
        let moved = advance(&state, &assessment, 30, SkepticismLevel::Medium);
        assert_eq!(moved.stage, Stage::Closure);
    }

    #[test]
    fn test_negative_delta_never_rewinds_clock() {
        let state = started(90);
        let next = advance(&state, &TurnAssessment::default(), -45, SkepticismLevel::Medium);
        assert_eq!(next.elapsed_secs, 90);
        let next = advance(&next, &TurnAssessment::default(), 15, SkepticismLevel::Medium);
        assert_eq!(next.elapsed_secs, 105);
    }

    #[test]
    fn test_skepticism_recomputed_from_window() {
        let mut state = PersonaState::new(SkepticismLevel::Medium);
        let relevant = TurnAssessment::with_relevancy(Relevancy::Relevant);
        state = advance(&state, &relevant, 30, SkepticismLevel::Medium);
        assert_eq!(state.skepticism(), SkepticismLevel::High);
        state = advance(&state, &relevant, 30, SkepticismLevel::Medium);
        assert_eq!(state.skepticism(), SkepticismLevel::Medium);
        state = advance(&state, &relevant, 30, SkepticismLevel::Medium);
        assert_eq!(state.skepticism(), SkepticismLevel::Low);
        assert_eq!(state.skepticism_window().len(), 3);
    }

    #[test]
    fn test_note_follows_justification() {
        let assessment = TurnAssessment {
            justification: Some("Cited the trial".to_string()),
            ..TurnAssessment::default()
        };
        let noted = advance(&started(0), &assessment, 30, SkepticismLevel::Low);
        assert_eq!(noted.note.as_deref(), Some("Cited the trial"));

        let cleared = advance(&noted, &TurnAssessment::default(), 30, SkepticismLevel::Low);
        assert!(cleared.note.is_none());
    }

    #[test]
    fn test_bounds_hold_over_long_sequence() {
        let mut state = PersonaState::new(SkepticismLevel::High);
        let pattern = [Relevancy::Irrelevant, Relevancy::Irrelevant, Relevancy::Relevant, Relevancy::Neutral];
        let mut last_elapsed = 0;
        for i in 0..40 {
            let relevancy = pattern[i % pattern.len()];
            state = advance(&state, &TurnAssessment::with_relevancy(relevancy), (i as i64 % 3) - 1, SkepticismLevel::High);
            assert!(state.trust <= 100);
            assert!(state.time_pressure <= 5);
            assert!(state.elapsed_secs >= last_elapsed);
            assert!(state.skepticism_window().len() <= 5);
            last_elapsed = state.elapsed_secs;
        }
    }
}
