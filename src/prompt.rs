//! System prompt rendering for the reply-generation collaborator
//!
//! Deterministic: turns without a timestamp are rendered without one rather
//! than stamped with the wall clock.

use crate::reply::ReplyRequest;
use crate::transcript::Speaker;

fn join(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Render the full instruction for one reply.
pub fn system_prompt(request: &ReplyRequest<'_>) -> String {
    let persona = request.persona;
    let state = request.state;
    let mut out = String::new();

    out.push_str(
        "You are a medical doctor engaged in a professional sales consultation with a \
         medical representative (the \"rep\").\n\n\
         You have a fixed persona that defines your professional traits. Your behavioral \
         state (mood, stage of the conversation) changes depending on how the rep \
         interacts with you.\n\n---\n\n",
    );

    out.push_str(&format!(
        "### Doctor Persona (fixed):\n\n\
         - ID: {id}\n\
         - Description: {description}\n\
         - Communication style: {communication}\n\
         - Decision factors: {factors}\n\
         - Knowledge level: {knowledge}\n\
         - Consultation style: {consultation}\n\
         - Typical objections: {objections}\n\
         - Preferred evidence: {evidence}\n\
         - Gender: {gender}\n\
         - Available consultation time: {time} seconds\n\
         - Baseline skepticism level: {baseline}\n\
         - Behavioral triggers:\n\
         \x20   - Positive: {positive}\n\
         \x20   - Negative: {negative}\n",
        id = persona.id,
        description = persona.description,
        communication = persona.communication_style,
        factors = join(&persona.decision_factors),
        knowledge = persona.knowledge_level,
        consultation = persona.consultation_style,
        objections = join(&persona.typical_objections),
        evidence = join(&persona.preferred_evidence),
        gender = persona.gender.as_deref().unwrap_or("Not specified"),
        time = persona.available_time_secs,
        baseline = persona.skepticism_level,
        positive = join(&persona.triggers.positive),
        negative = join(&persona.triggers.negative),
    ));

    out.push_str(&format!(
        "\n---\n\n### Dynamic State (subject to change):\n\n\
         - Mood: {}\n\
         - Current skepticism level: {}\n\
         - Current Stage: {}\n\
         - Time pressure level: {}\n\
         - Remaining time: {} seconds\n",
        state.mood,
        state.skepticism(),
        state.stage,
        state.time_pressure,
        request.remaining_secs
    ));

    if let Some(decision) = request.directive {
        out.push_str(&format!("- Tone directive: {}\n", decision.action));
        if decision.cut_now {
            out.push_str("- End the call now, using the directive as your reply.\n");
        }
    }

    out.push_str("\n---\n\n### Conversation Transcript (chronological):\n\n");
    for turn in request.transcript.turns() {
        let who = match turn.speaker {
            Speaker::Representative => "Rep",
            Speaker::Persona => "Doctor",
            Speaker::Other(ref label) => label.as_str(),
        };
        let line = match &turn.timestamp {
            Some(ts) => format!("[{}] {}: {}\n", ts, who, turn.text),
            None => format!("{}: {}\n", who, turn.text),
        };
        out.push_str(&line);
    }

    out.push_str(&format!("\n---\n\n### Last Rep Message:\n{}\n\n", request.last_rep));
    out.push_str("Always base your reply and analysis only on this message.\n\n---\n\n");

    out.push_str(
        "### Your tasks:\n\n\
         1. Generate a reply as the doctor that aligns with your persona, mood, and current skepticism level.\n\
         2. Evaluate the relevancy of the last rep message (-1, 0, 1).\n\
         3. Determine the next conversation stage: Introduction | Discussion | ObjectionDiscussion | Closure.\n\
         4. Optionally update mood (\"Neutral\" | \"Engaged\" | \"Dismissive\").\n\
         5. Provide a short justification and list any behavior signals you are expressing.\n\n\
         Constraints: If time pressure > 3 and message is irrelevant, lean to Closure.\n\n\
         Return ONLY JSON:\n\
         {\n  \"doctorReply\": \"<your response>\",\n  \"relevancy\": -1 | 0 | 1,\n  \
         \"justification\": \"<brief>\",\n  \
         \"nextConversationStage\": \"Introduction\" | \"Discussion\" | \"ObjectionDiscussion\" | \"Closure\",\n  \
         \"nextMood\": \"Neutral\" | \"Engaged\" | \"Dismissive\",\n  \
         \"signals\": [\"asks for data\"]\n}\n",
    );

    out
}
