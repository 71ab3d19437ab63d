//! Word-overlap scoring of candidate records.

use scmd_protocols::{CommandRecord, CommandScore};

/// Score one record: the share of `keywords` found as whole words in
/// `key + " " + data`, as an integer percentage.
pub fn score_record(record: CommandRecord, keywords: &[String]) -> CommandScore {
    let total_words = keywords.len();
    let padded = format!(" {} {} ", record.key, record.data).to_lowercase();

    let match_count = keywords
        .iter()
        .filter(|kw| padded.contains(&format!(" {} ", kw.to_lowercase())))
        .count();

    let score = if total_words > 0 {
        (match_count * 100 / total_words) as u32
    } else {
        0
    };

    CommandScore {
        record,
        score,
        match_count,
        total_words,
    }
}

/// Score all records and sort by descending score. Ties keep input order.
pub fn score_commands(records: Vec<CommandRecord>, keywords: &[String]) -> Vec<CommandScore> {
    let mut scored: Vec<CommandScore> = records
        .into_iter()
        .map(|r| score_record(r, keywords))
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

pub fn filter_by_min_score(scores: Vec<CommandScore>, threshold: u32) -> Vec<CommandScore> {
    scores.into_iter().filter(|s| s.score >= threshold).collect()
}

/// The first `n` entries; the input unchanged when it is not longer than `n`.
pub fn top_n(mut scores: Vec<CommandScore>, n: usize) -> Vec<CommandScore> {
    scores.truncate(n);
    scores
}

pub fn has_any_at_least(scores: &[CommandScore], threshold: u32) -> bool {
    scores.iter().any(|s| s.score >= threshold)
}

/// Strip scores back to records.
pub fn into_records(scores: Vec<CommandScore>) -> Vec<CommandRecord> {
    scores.into_iter().map(|s| s.record).collect()
}

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod tests;
