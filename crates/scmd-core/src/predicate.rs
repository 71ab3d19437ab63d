//! Keyword predicate construction.
//!
//! `pattern = clause ("," clause)*`, `clause = word (whitespace word)*`.
//! Clauses are OR-ed, the words of a clause AND-ed.

use scmd_protocols::KeywordPredicate;

/// Build the store predicate for `pattern`. A blank pattern matches everything.
pub fn build_predicate(pattern: &str) -> KeywordPredicate {
    KeywordPredicate::from_clauses(pattern.split(',').map(|clause| clause.split_whitespace()))
}
