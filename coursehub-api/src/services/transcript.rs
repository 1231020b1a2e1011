//! Transcript preparation for question answering
//!
//! Truncation keeps prompts inside the model context window; token counts
//! are estimated at four characters per token.

/// Token budget for the transcript part of a prompt
pub const MAX_TRANSCRIPT_TOKENS: usize = 30_000;

/// Estimated characters per token
pub const CHARS_PER_TOKEN: usize = 4;

/// Maximum accepted question length, in characters
pub const MAX_QUESTION_CHARS: usize = 2000;

/// Shorten a transcript to `max_tokens`
///
/// Cuts after the last sentence end (`". "`) when one falls in the final
/// fifth of the window, otherwise cuts hard and appends `...`. Lengths are
/// counted in characters, never splitting a UTF-8 code point.
pub fn truncate_transcript(transcript: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens * CHARS_PER_TOKEN;

    let cut = match transcript.char_indices().nth(max_chars) {
        Some((byte_index, _)) => byte_index,
        None => return transcript.to_string(),
    };
    let truncated = &transcript[..cut];

    if let Some(last_sentence) = truncated.rfind(". ") {
        let sentence_chars = truncated[..last_sentence].chars().count();
        if sentence_chars * 5 > max_chars * 4 {
            return truncated[..=last_sentence].to_string();
        }
    }

    format!("{}...", truncated)
}

/// Tutor prompt grounding the answer in the transcript
pub fn build_prompt(transcript: &str, question: &str) -> String {
    format!(
        "You are an AI tutor helping students learn from an educational video.
You are given the complete transcript of the video and a student's question.
Your task is to answer strictly based on the transcript content.

TRANSCRIPT:
{transcript}

STUDENT QUESTION:
{question}

GUIDELINES:
1. Use ONLY the information from the transcript. Do not invent or guess facts not in it.
2. If the transcript lacks enough detail to answer, respond exactly with:
   \"The transcript does not contain enough information to answer this question.\"
3. Support your answer with specific details, examples, or direct quotes from the transcript whenever possible.
4. Keep explanations clear, concise, and in simple language suitable for learning.
5. If the question is unrelated to the video's topic, politely say so and invite a relevant question.
6. Write the answer in short paragraphs of two to four sentences.
7. Do not use headings, lists, or bullet points.
8. Do not include external knowledge, personal opinions, or unrelated commentary.

ANSWER:",
        transcript = transcript,
        question = question.trim(),
    )
}

/// Size figures reported for a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptStats {
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
}

impl TranscriptStats {
    pub fn of(transcript: &str) -> Self {
        Self {
            character_count: transcript.chars().count(),
            word_count: transcript.split_whitespace().count(),
            line_count: transcript.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }
}
