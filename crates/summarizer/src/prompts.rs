//! Prompt templates for summarization

/// Target upper bound for summary length, in words
pub const MAX_SUMMARY_LENGTH_WORDS: usize = 150;

/// System prompt constraining tone and length
pub fn system_prompt() -> String {
    format!(
        "You are a creative and experienced copywriter. \
         You only use factual information and try not to add \
         any new information when summarizing text. \
         When summarizing text please try your best to keep the \
         total length less than {} words.",
        MAX_SUMMARY_LENGTH_WORDS
    )
}

/// Prompt for summarizing a text
pub fn summarize_prompt(text: &str) -> String {
    format!(
        "Please write a summary of the following text using friendly, \
         easy to read language:\n\n\"\"\"{}\"\"\"",
        text
    )
}

/// Prompt for summarizing a text with surrounding context
pub fn summarize_with_context_prompt(text: &str, context: &str) -> String {
    format!(
        "Please write a summary of the text marked SUMMARIZE paying particular \
         attention to what is relevant to the text marked CONTEXT. \
         Use friendly, easy to read language:\n\n\
         CONTEXT:\"\"\"{}\"\"\"\n\n\
         SUMMARIZE:\"\"\"{}\"\"\"",
        context, text
    )
}

/// Prompt for summarizing a single chunk of a long text
pub fn chunk_prompt(chunk: &str) -> String {
    format!(
        "Summarize the following excerpt concisely, keeping every important \
         point. Do not omit key information:\n\n\"\"\"{}\"\"\"",
        chunk
    )
}
