//! Hybrid search orchestration.
//!
//! One request runs sequentially through these stages:
//!
//! 1. keyword search on the normalized query and scoring of the hits;
//! 2. early return when a hit clears the high threshold, or when AI is off;
//! 3. provider attempts (only the preferred provider when one is configured,
//!    otherwise every provider in priority order), each trying vector search
//!    plus chat and then keyword context plus chat;
//! 4. a context-free chat as last resort, whose failure is reported inside the
//!    answer text;
//! 5. re-scoring of the accumulated records, dropping those scoring 0.

use std::sync::Arc;

use tracing::{debug, info, warn};

use scmd_config::{PreferredProvider, SearchConfig};
use scmd_protocols::{
    AiProvider, ChatAnswer, CommandRecord, CommandScore, CommandStore, ProviderError,
    SearchError, StoreError,
};

use crate::normalizer::NormalizedQuery;
use crate::predicate::build_predicate;
use crate::registry::ProviderRegistry;
use crate::scoring::{
    filter_by_min_score, has_any_at_least, into_records, score_commands, top_n,
};
use crate::vector::similar_records;

/// Result of one search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub records: Vec<CommandRecord>,
    /// Chat answer, or a formatted error message; empty when no provider was asked.
    pub answer: String,
    pub tokens: u32,
}

impl SearchOutcome {
    fn records_only(records: Vec<CommandRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn has_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}

/// Outcome of one provider's vector-then-keyword sequence.
struct Attempt {
    records: Vec<CommandRecord>,
    answer: Option<ChatAnswer>,
    failure: String,
}

/// Answer text shown when no provider could answer at all.
pub fn provider_error_answer(err: &SearchError) -> String {
    format!(
        "⚠️ **AI Provider Error**\n\n```text\n{}\n```\n\nPlease check your configuration, model name, and API keys.",
        err
    )
}

/// The search orchestrator.
pub struct SmartSearch {
    store: Arc<dyn CommandStore>,
    registry: Arc<ProviderRegistry>,
    settings: SearchConfig,
    preferred: PreferredProvider,
}

impl SmartSearch {
    pub fn new(
        store: Arc<dyn CommandStore>,
        registry: Arc<ProviderRegistry>,
        settings: SearchConfig,
        preferred: PreferredProvider,
    ) -> Self {
        Self {
            store,
            registry,
            settings,
            preferred,
        }
    }

    pub fn store(&self) -> &Arc<dyn CommandStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Run a search. With `use_ai` false no provider is ever called.
    pub async fn search(&self, raw: &str, use_ai: bool) -> Result<SearchOutcome, SearchError> {
        let query = NormalizedQuery::new(raw);
        debug!("Search pattern {:?}, keywords {:?}", query.pattern, query.keywords);

        let scored = self.keyword_stage(&query).await?;

        if has_any_at_least(&scored, self.settings.high_threshold) {
            let best = top_n(
                filter_by_min_score(scored, self.settings.high_threshold),
                self.settings.result_cap,
            );
            info!("High-confidence keyword match: {} results", best.len());
            return Ok(SearchOutcome::records_only(into_records(best)));
        }

        if !use_ai {
            let best = top_n(
                filter_by_min_score(scored, self.settings.low_threshold),
                self.settings.result_cap,
            );
            return Ok(SearchOutcome::records_only(into_records(best)));
        }

        let mut accumulated = Vec::new();
        let mut answer = None;

        if let Some(kind) = self.preferred.kind() {
            let provider = self.registry.get(kind).ok_or_else(|| {
                SearchError::PreferredProviderUnavailable {
                    provider: kind,
                    reason: "not configured".to_string(),
                }
            })?;
            let attempt = self.attempt(provider.as_ref(), &query, &scored).await;
            match attempt.answer {
                Some(a) => {
                    accumulated = attempt.records;
                    answer = Some(a);
                }
                None => {
                    return Err(SearchError::PreferredProviderUnavailable {
                        provider: kind,
                        reason: attempt.failure,
                    });
                }
            }
        } else {
            for provider in self.registry.in_priority_order() {
                let attempt = self.attempt(provider.as_ref(), &query, &scored).await;
                if !attempt.records.is_empty() {
                    accumulated = attempt.records;
                }
                if attempt.answer.is_some() {
                    answer = attempt.answer;
                    break;
                }
                warn!("AI provider {} gave no answer: {}", provider.kind(), attempt.failure);
            }
        }

        let answer = match answer {
            Some(a) => a,
            None => match self.ask_any(&query.raw, &[]).await {
                Ok(a) => a,
                Err(e) => {
                    warn!("Last-resort chat failed: {}", e);
                    ChatAnswer::new(provider_error_answer(&e), 0)
                }
            },
        };

        let records = into_records(filter_by_min_score(
            score_commands(accumulated, &query.keywords),
            1,
        ));

        Ok(SearchOutcome {
            records,
            answer: answer.text,
            tokens: answer.tokens,
        })
    }

    /// Produce a fresh answer for `raw`, skipping the high-confidence shortcut.
    /// The store is not modified.
    pub async fn regenerate(&self, raw: &str) -> Result<SearchOutcome, SearchError> {
        let query = NormalizedQuery::new(raw);
        let scored = self.keyword_stage(&query).await?;
        let context = self.keyword_context(&scored);

        let answer = self.ask_any(&query.raw, &context).await?;
        Ok(SearchOutcome {
            records: context,
            answer: answer.text,
            tokens: answer.tokens,
        })
    }

    async fn keyword_stage(&self, query: &NormalizedQuery) -> Result<Vec<CommandScore>, StoreError> {
        let predicate = build_predicate(&query.pattern);
        let hits = self.store.search(&predicate).await?;
        debug!("Keyword search returned {} records", hits.len());
        Ok(score_commands(hits, &query.keywords))
    }

    /// Top keyword hits with a non-zero score.
    fn keyword_context(&self, scored: &[CommandScore]) -> Vec<CommandRecord> {
        into_records(top_n(
            filter_by_min_score(scored.to_vec(), 1),
            self.settings.context_cap,
        ))
    }

    async fn attempt(
        &self,
        provider: &dyn AiProvider,
        query: &NormalizedQuery,
        scored: &[CommandScore],
    ) -> Attempt {
        let kind = provider.kind();
        if !self.registry.is_available(kind) {
            return Attempt {
                records: Vec::new(),
                answer: None,
                failure: format!("{} is not available", kind),
            };
        }

        let mut records = Vec::new();
        let mut failure = String::from("no usable answer");

        match self.vector_candidates(provider, query).await {
            Ok(relevant) if !relevant.is_empty() => {
                records = relevant;
                match chat_non_empty(provider, &query.raw, &records).await {
                    Ok(answer) => {
                        info!("Answered by {} with {} vector matches", kind, records.len());
                        return Attempt {
                            records,
                            answer: Some(answer),
                            failure,
                        };
                    }
                    Err(e) => {
                        warn!("{} chat with vector context failed: {}", kind, e);
                        failure = e.to_string();
                    }
                }
            }
            Ok(_) => debug!("No relevant vector matches from {}", kind),
            Err(e) => {
                warn!("{} vector stage failed: {}", kind, e);
                failure = e;
            }
        }

        if !scored.is_empty() {
            let context = self.keyword_context(scored);
            match chat_non_empty(provider, &query.raw, &context).await {
                Ok(answer) => {
                    info!("Answered by {} with {} keyword matches", kind, context.len());
                    return Attempt {
                        records: context,
                        answer: Some(answer),
                        failure,
                    };
                }
                Err(e) => {
                    warn!("{} chat with keyword context failed: {}", kind, e);
                    failure = e.to_string();
                }
            }
        }

        Attempt {
            records,
            answer: None,
            failure,
        }
    }

    /// Embed the raw query, look up neighbours and keep those sharing a keyword.
    async fn vector_candidates(
        &self,
        provider: &dyn AiProvider,
        query: &NormalizedQuery,
    ) -> Result<Vec<CommandRecord>, String> {
        let embedding = provider.embed(&query.raw).await.map_err(|e| e.to_string())?;
        let hits = similar_records(self.store.as_ref(), &embedding, self.settings.vector_limit)
            .await
            .map_err(|e| e.to_string())?;
        Ok(into_records(filter_by_min_score(
            score_commands(hits, &query.keywords),
            1,
        )))
    }

    /// Chat with the preferred provider, or the first available provider that answers.
    async fn ask_any(
        &self,
        question: &str,
        context: &[CommandRecord],
    ) -> Result<ChatAnswer, SearchError> {
        if let Some(kind) = self.preferred.kind() {
            let provider = self
                .registry
                .get(kind)
                .filter(|_| self.registry.is_available(kind))
                .ok_or_else(|| SearchError::PreferredProviderUnavailable {
                    provider: kind,
                    reason: "not available".to_string(),
                })?;
            return chat_non_empty(provider.as_ref(), question, context)
                .await
                .map_err(|e| SearchError::PreferredProviderUnavailable {
                    provider: kind,
                    reason: e.to_string(),
                });
        }

        let mut failures = Vec::new();
        for provider in self.registry.available() {
            match chat_non_empty(provider.as_ref(), question, context).await {
                Ok(answer) => return Ok(answer),
                Err(e) => failures.push(format!("{}: {}", provider.kind(), e)),
            }
        }

        if failures.is_empty() {
            Err(SearchError::NoProviderAvailable)
        } else {
            Err(SearchError::ProvidersFailed(failures.join("; ")))
        }
    }
}

async fn chat_non_empty(
    provider: &dyn AiProvider,
    question: &str,
    context: &[CommandRecord],
) -> Result<ChatAnswer, ProviderError> {
    let answer = provider.chat(question, context).await?;
    if answer.text.trim().is_empty() {
        return Err(ProviderError::DecodeFailed("empty answer".to_string()));
    }
    Ok(answer)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
