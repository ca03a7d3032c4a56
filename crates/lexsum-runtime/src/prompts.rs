//! Prompt text for classification and summarisation requests.
//!
//! Prompts are fixed data; the builders below only attach the document text.
//! Two summary shapes exist:
//! 1. Structured brief (JSON with ten fixed keys) used by default
//! 2. Legacy free-text brief with a leading disclaimer, kept for
//!    compatibility with downstream scripts that expect prose

use crate::providers::ChatMessage;
use lexsum_core::Document;

/// Character budget for the classification excerpt. Screening only needs the
/// opening of a document, and clipping bounds the token cost of the check.
pub const MAX_CLASSIFY_CHARS: usize = 12_000;

/// System prompt for the legal-or-not screening request.
///
/// The reply shape mirrors the offline detectors so one result type covers
/// every strategy.
pub const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are a legal-document screening assistant.
Decide whether the text provided is a legal document: a contract, policy, statute, terms of service, licence, or a similar instrument.

Respond with exactly one JSON object and nothing else, using these keys:
{"is_legal": <boolean>, "type": "<short document type, e.g. contract>", "confidence": <number between 0 and 1>, "reason": "<one short sentence>"}
"#;

/// System prompt for the structured ten-key brief.
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a Legal Document Summariser.
Produce a concise, structured brief for a lay reader and a lawyer.

Return JSON with these keys:
- title
- parties
- purpose
- key_terms
- obligations
- risks
- dates_deadlines
- termination
- governing_law
- red_flags
Keep it faithful, neutral, and quote clauses when necessary.
"#;

/// System prompt for the legacy free-text brief.
pub const LEGACY_SYSTEM_PROMPT: &str = r#"You are an expert legal document summarizer. Your role is to provide clear, concise, and objective summaries of legal documents based solely on the content provided. Do not add any external information, interpretations, legal advice, or opinions—stick strictly to summarizing what's in the document. Always include a disclaimer at the top: "This is an AI-generated summary and not legal advice. Consult a qualified attorney for professional guidance."

For each summary, structure your output as follows:

1. *Overview*: A high-level summary of the document's purpose, type (e.g., contract, agreement, will), parties involved, and effective dates in 2-4 sentences.

2. *Key Provisions*: Bullet points listing the main clauses, obligations, rights, and responsibilities of each party. Include any conditions, timelines, or contingencies.

3. *Financial Aspects*: If applicable, summarize payments, fees, penalties, or economic terms.

4. *Risks and Liabilities*: Highlight any disclaimers, limitations of liability, dispute resolution mechanisms, or potential risks mentioned.

5. *Termination and Amendments*: Details on how the document can end, be changed, or renewed.

6. *Other Notable Clauses*: Any unique or miscellaneous sections (e.g., governing law, confidentiality, non-compete).

7. *Full Summary Length*: Aim for a total summary of 300-600 words unless specified otherwise. Use neutral, professional language.

If the document is too long or complex, focus on key sections. If the input is not a legal document, politely decline and explain why.
"#;

/// Directive appended to the system message for the relaxed retry.
pub const JSON_RETRY_DIRECTIVE: &str =
    "Return strictly valid minified JSON only. No prose, no code fences.";

/// Framing line placed before the document in structured summary requests.
const SUMMARISE_TASK_FRAMING: &str = "Summarise the following legal text:";

/// Messages for a classification request.
///
/// The document is clipped to [`MAX_CLASSIFY_CHARS`] characters.
pub fn classification_messages(doc: &Document) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(CLASSIFY_SYSTEM_PROMPT),
        ChatMessage::user(doc.excerpt(MAX_CLASSIFY_CHARS)),
    ]
}

/// Messages for the structured summary request. The full document is sent.
pub fn summary_messages(doc: &Document) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(format!("{}\n\n{}", SUMMARISE_TASK_FRAMING, doc.text())),
    ]
}

/// Messages for the legacy free-text brief. The document is sent bare; the
/// system prompt carries all the instructions.
pub fn legacy_messages(doc: &Document) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(LEGACY_SYSTEM_PROMPT),
        ChatMessage::user(doc.text()),
    ]
}

/// Append the strict-JSON directive for the relaxed retry.
///
/// The directive lands on the existing system message; a system message is
/// inserted when the conversation has none.
pub fn with_json_retry_directive(mut messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    match messages.iter_mut().find(|m| m.role == "system") {
        Some(system) => {
            system.content.push_str("\n\n");
            system.content.push_str(JSON_RETRY_DIRECTIVE);
        }
        None => messages.insert(0, ChatMessage::system(JSON_RETRY_DIRECTIVE)),
    }
    messages
}
