//! Prompt construction for the health assistant
//!
//! Building the prompt is a pure function of its inputs, so the exact
//! text sent to the model can be asserted in tests without any service
//! in the loop.

use crate::models::ScoredChunk;

/// Join the chunk texts in their ranked order, separated by blank lines.
/// The ranking produced by the index is preserved as-is.
#[must_use]
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(ScoredChunk::text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full prompt for the generation model.
///
/// The question and profile are included verbatim; the retrieved chunks
/// are folded in as the assistant's own knowledge. Works with zero
/// chunks, in which case the knowledge section is simply empty.
#[must_use]
pub fn build_assistant_prompt(
    question: &str,
    user_name: &str,
    user_profile: &str,
    chunks: &[ScoredChunk],
) -> String {
    let context = format_context(chunks);

    format!(
        r#"You are a highly knowledgeable and empathetic personal health assistant specializing in the unique health needs of a programmer named {user_name}.
Your goal is to provide clear, actionable, and science-backed advice tailored to {user_name}'s concerns.

{user_name}'s Question:
"{question}"

What You Know About the User:
{user_profile}

Additional Knowledge:
You have access to the following knowledge base, which you should treat as your own expertise:
{context}

Guidelines:
- Provide answers in a clear, concise, and engaging manner.
- Focus on practical, real-world solutions that fit into a programmer's lifestyle.
- Address health concerns related to prolonged sitting, screen time, stress, diet, sleep, and productivity.
- If the question is beyond your expertise, encourage the user to seek medical advice rather than speculating.
- Use an encouraging and supportive tone, but don't sugarcoat important health risks."#
    )
}
