//! Keyword matching criteria handed to a [`CommandStore`](crate::CommandStore).
//!
//! A predicate is a disjunction of clauses; a clause is a conjunction of words.
//! A word matches when it is a case-insensitive substring of `key + " " + data`.
//! A predicate without clauses matches every record.

/// Compiled keyword predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordPredicate {
    clauses: Vec<Vec<String>>,
}

impl KeywordPredicate {
    /// A predicate that matches everything.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Build from raw clauses. Words are lower-cased, blank words and empty
    /// clauses are dropped.
    pub fn from_clauses<I, C, S>(clauses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let clauses = clauses
            .into_iter()
            .map(|clause| {
                clause
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|clause| !clause.is_empty())
            .collect();
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Vec<String>] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Reference evaluation of the predicate. Stores that compile the predicate
    /// to a query language must agree with this.
    pub fn matches(&self, key: &str, data: &str) -> bool {
        if self.is_match_all() {
            return true;
        }
        let haystack = format!("{} {}", key, data).to_lowercase();
        self.clauses
            .iter()
            .any(|clause| clause.iter().all(|word| haystack.contains(word.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all() {
        let p = KeywordPredicate::match_all();
        assert!(p.is_match_all());
        assert!(p.matches("anything", "at all"));
    }

    #[test]
    fn test_from_clauses_drops_empty() {
        let p = KeywordPredicate::from_clauses(vec![vec!["Docker", " "], vec![]]);
        assert_eq!(p.clauses(), &[vec!["docker".to_string()]]);
    }

    #[test]
    fn test_and_within_clause() {
        let p = KeywordPredicate::from_clauses(vec![vec!["docker", "containers"]]);
        assert!(p.matches("docker ps -a", "list all containers"));
        assert!(!p.matches("docker images", "list images"));
    }

    #[test]
    fn test_or_across_clauses() {
        let p = KeywordPredicate::from_clauses(vec![vec!["git"], vec!["kubectl"]]);
        assert!(p.matches("kubectl get pods", "list pods"));
        assert!(p.matches("git log", "history"));
        assert!(!p.matches("ls", "list files"));
    }

    #[test]
    fn test_substring_and_case_insensitive() {
        let p = KeywordPredicate::from_clauses(vec![vec!["CONTAIN"]]);
        assert!(p.matches("docker ps", "List all Containers"));
    }
}
