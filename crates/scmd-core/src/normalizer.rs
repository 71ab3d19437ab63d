//! Query normalization.
//!
//! Two different reductions are applied to a raw query:
//!
//! - [`normalize_query`] strips conversational filler ("show me", "how do i",
//!   ...) and produces the pattern handed to the keyword predicate.
//! - [`keyword_set`] reduces text to the words that count for scoring, dropping
//!   stopwords and very short words.

/// Filler phrases removed from queries, matched on whole tokens.
const FILLER_PHRASES: &[&str] = &[
    "provide me with",
    "how do i",
    "show me",
    "give me",
    "find me",
    "how to",
    "what is",
    "what are",
    "can you",
    "i need",
    "i want",
    "looking for",
    "search for",
    "please",
    "provide",
    "examples",
    "example",
    "commands",
    "command",
    "for",
];

/// Words that never count towards a score.
const STOPWORDS: &[&str] = &[
    "show", "me", "give", "provide", "with", "find", "how", "to", "do", "i", "a", "the", "is",
    "are", "can", "you", "please", "need", "want", "looking", "for", "search", "example",
    "examples", "command", "commands", "what", "where", "when", "why", "which",
];

/// Words shorter than this are ignored when scoring.
pub const MIN_KEYWORD_LEN: usize = 3;

/// A query in the three shapes the orchestrator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// The query as typed; used for embedding and chat.
    pub raw: String,
    /// Pattern for the keyword predicate: the cleaned query, or the raw query
    /// when cleaning left nothing.
    pub pattern: String,
    /// Words used for scoring.
    pub keywords: Vec<String>,
}

impl NormalizedQuery {
    pub fn new(raw: &str) -> Self {
        let cleaned = normalize_query(raw);
        let pattern = if cleaned.is_empty() {
            raw.trim().to_string()
        } else {
            cleaned
        };
        let keywords = keyword_set(&pattern);
        Self {
            raw: raw.to_string(),
            pattern,
            keywords,
        }
    }
}

/// Lower-case, collapse whitespace and strip filler phrases.
///
/// Idempotent: stripping repeats until nothing changes, so filler that only
/// appears after an inner phrase is removed is caught as well.
pub fn normalize_query(raw: &str) -> String {
    let mut tokens: Vec<String> = raw
        .split_whitespace()
        .map(|t| t.to_lowercase().trim_end_matches(['?', '!']).to_string())
        .filter(|t| !t.is_empty())
        .collect();

    loop {
        let stripped = strip_fillers(&tokens);
        if stripped.len() == tokens.len() {
            break;
        }
        tokens = stripped;
    }

    tokens.join(" ")
}

fn strip_fillers(tokens: &[String]) -> Vec<String> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut i = 0;

    'tokens: while i < tokens.len() {
        for phrase in FILLER_PHRASES {
            let words: Vec<&str> = phrase.split(' ').collect();
            let end = i + words.len();
            if end <= tokens.len() && tokens[i..end].iter().zip(&words).all(|(t, w)| t == w) {
                i = end;
                continue 'tokens;
            }
        }
        kept.push(tokens[i].clone());
        i += 1;
    }

    kept
}

/// Scoring words of `text`, in order. Commas separate words like whitespace.
pub fn keyword_set(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
