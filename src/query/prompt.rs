//! Prompt templates.

use super::Action;

/// Exact reply the model gives when the document does not contain the answer.
pub const NO_ANSWER: &str = "The answer does not appear in the provided document.";

/// System prompt shared by every action.
pub const SYSTEM_PROMPT: &str = "You are DocMind, an AI assistant that answers questions strictly using the provided document text. Do not use outside knowledge.

Rules:
- Only use information from the provided document
- If the answer cannot be found in the document, you MUST respond exactly: \"The answer does not appear in the provided document.\"
- When possible, quote or reference specific passages from the document
- Be concise and direct";

/// User turn for `action` over `text`.
///
/// `question` is only read for [`Action::Ask`].
#[must_use]
pub fn build_prompt(text: &str, question: Option<&str>, action: Action) -> String {
    let instruction = match action {
        Action::Summarize => "Provide a concise summary of this document in 3-5 paragraphs.".to_string(),
        Action::Takeaways => {
            "List the 5-7 key takeaways from this document as bullet points.".to_string()
        }
        Action::Eli5 => {
            "Explain this document in simple terms that a 5-year-old could understand.".to_string()
        }
        Action::Arguments => {
            "Identify and list the main arguments or claims made in this document.".to_string()
        }
        Action::Ask => format!("Question: {}", question.unwrap_or_default()),
    };
    format!("<document>\n{text}\n</document>\n\n{instruction}")
}
