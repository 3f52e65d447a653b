/// System prompt for the reformatting model (non-negotiable constraints)
pub const SYSTEM_PROMPT: &str = "\
You are a text formatting assistant. Your task is to reformat transcribed text into logical paragraph flow.
CRITICAL RULES:
1. DO NOT CHANGE, ADD, OR REMOVE ANY WORDS - including repeated words
2. PRESERVE ALL WORDS EXACTLY - even if a word appears twice in a row
3. Only modify punctuation and line breaks
4. Format into natural paragraphs
5. Output ONLY the reformatted text with no preamble or explanation
6. Do not add any commentary, apologies, or meta-text";

/// Prompt used when a truncated response needs to be continued
pub const CONTINUATION_PROMPT: &str = "\
Continue reformatting from where you left off. Remember:
1. DO NOT CHANGE, ADD, OR REMOVE ANY WORDS - including repeated words
2. PRESERVE ALL WORDS EXACTLY
3. Only modify punctuation and line breaks
4. Output ONLY the reformatted text with no preamble or explanation";

/// Build the user prompt for one chunk of transcript text
pub fn build_reformat_prompt(chunk_text: &str) -> String {
    format!(
        "Please reformat the following transcribed text into a logical paragraph flow. \
         DO NOT CHANGE ANY WORD. Only modify punctuation and line breaks:\n\n{chunk_text}"
    )
}
