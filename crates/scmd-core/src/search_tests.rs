use super::*;
use std::sync::atomic::Ordering;

use scmd_protocols::{Embedding, ProviderKind};

use crate::testing::{MemoryStore, StubProvider};

async fn smart_search(
    store: Arc<MemoryStore>,
    providers: Vec<Arc<dyn AiProvider>>,
    preferred: PreferredProvider,
) -> SmartSearch {
    let registry = ProviderRegistry::initialize(providers).await.unwrap();
    SmartSearch::new(store, Arc::new(registry), SearchConfig::default(), preferred)
}

fn docker_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_records(&[
        ("git status", "show working tree status"),
        ("docker ps -a", "list all containers"),
    ]))
}

/// A record that matches "git rebas commit" by substring but scores 33.
fn rebase_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_records(&[(
        "git rebase -i HEAD~3",
        "interactive rebasing of commits",
    )]))
}

#[tokio::test]
async fn test_high_confidence_match_skips_providers() {
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama).with_answer("unused"));
    let gemini = Arc::new(StubProvider::new(ProviderKind::Gemini).with_answer("unused"));
    let search = smart_search(
        docker_store(),
        vec![ollama.clone(), gemini.clone()],
        PreferredProvider::None,
    )
    .await;

    let outcome = search.search("show me docker containers", true).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].key, "docker ps -a");
    assert!(!outcome.has_answer());
    assert_eq!(outcome.tokens, 0);
    assert_eq!(ollama.calls(), 0);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn test_docker_query_scores_100() {
    let query = NormalizedQuery::new("show me docker containers");
    assert_eq!(query.keywords, vec!["docker", "containers"]);

    let record = CommandRecord::new(1, "docker ps -a", "list all containers");
    let scored = score_commands(vec![record], &query.keywords);
    assert_eq!(scored[0].score, 100);
}

#[tokio::test]
async fn test_no_ai_mode_uses_low_threshold() {
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama).with_answer("unused"));
    let search = smart_search(rebase_store(), vec![ollama.clone()], PreferredProvider::None).await;

    let outcome = search.search("git rebas commit", false).await.unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert!(!outcome.has_answer());
    assert_eq!(ollama.calls(), 0);

    // Same record at 20% stays below the low threshold.
    let outcome = search
        .search("git rebas commit inter head", false)
        .await
        .unwrap();
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn test_preferred_provider_is_strict() {
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama));
    let gemini = Arc::new(
        StubProvider::new(ProviderKind::Gemini)
            .with_embedding(vec![1.0, 0.0, 0.0, 0.0])
            .with_answer("git rebase -i"),
    );
    let search = smart_search(
        rebase_store(),
        vec![ollama.clone(), gemini.clone()],
        PreferredProvider::Ollama,
    )
    .await;

    let result = search.search("git rebas commit", true).await;

    assert!(matches!(
        result,
        Err(SearchError::PreferredProviderUnavailable {
            provider: ProviderKind::Ollama,
            ..
        })
    ));
    assert!(ollama.calls() > 0);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn test_preferred_provider_unreachable() {
    let gemini = Arc::new(StubProvider::unreachable(ProviderKind::Gemini));
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama).with_answer("ls"));
    let search = smart_search(
        rebase_store(),
        vec![ollama.clone(), gemini.clone()],
        PreferredProvider::Gemini,
    )
    .await;

    let err = search.search("git rebas commit", true).await.unwrap_err();
    assert!(err.to_string().contains("gemini"));
    assert_eq!(ollama.calls(), 0);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn test_fallback_to_second_provider() {
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama));
    let gemini = Arc::new(StubProvider::new(ProviderKind::Gemini).with_answer("git rebase -i HEAD~3"));
    let search = smart_search(
        rebase_store(),
        vec![ollama.clone(), gemini.clone()],
        PreferredProvider::None,
    )
    .await;

    let outcome = search.search("git rebas commit", true).await.unwrap();

    assert_eq!(outcome.answer, "git rebase -i HEAD~3");
    assert_eq!(outcome.tokens, 42);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(ollama.chats.load(Ordering::SeqCst), 1);
    assert_eq!(gemini.chats.load(Ordering::SeqCst), 1);
    assert_eq!(gemini.chat_contexts()[0].len(), 1);
}

#[tokio::test]
async fn test_vector_matches_become_context() {
    let store = Arc::new(MemoryStore::new());
    store.push(
        CommandRecord::new(1, "tar -xzf archive.tar.gz", "extract a tarball")
            .with_embedding(Embedding::new(vec![1.0, 0.0, 0.0, 0.0])),
    );
    store.push(
        CommandRecord::new(2, "ls -la", "list files")
            .with_embedding(Embedding::new(vec![0.0, 1.0, 0.0, 0.0])),
    );
    let ollama = Arc::new(
        StubProvider::new(ProviderKind::Ollama)
            .with_embedding(vec![1.0, 0.0, 0.0, 0.0])
            .with_answer("tar -xzf file.tar.gz"),
    );
    let search = smart_search(store, vec![ollama.clone()], PreferredProvider::None).await;

    let outcome = search.search("unpack tarball", true).await.unwrap();

    assert_eq!(outcome.answer, "tar -xzf file.tar.gz");
    let ids: Vec<i64> = outcome.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1]);
    let contexts = ollama.chat_contexts();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0][0].id, 1);
}

#[tokio::test]
async fn test_keyword_context_retried_after_vector_chat_fails() {
    let store = Arc::new(MemoryStore::new());
    store.push(
        CommandRecord::new(1, "git rebase -i HEAD~3", "interactive rebasing of commits")
            .with_embedding(Embedding::new(vec![1.0, 0.0, 0.0, 0.0])),
    );
    let ollama = Arc::new(
        StubProvider::new(ProviderKind::Ollama)
            .with_embedding(vec![1.0, 0.0, 0.0, 0.0])
            .with_answer("kw")
            .failing_chats(1),
    );
    let search = smart_search(store, vec![ollama.clone()], PreferredProvider::None).await;

    let outcome = search.search("Show me git rebas commit?", true).await.unwrap();

    assert_eq!(outcome.answer, "kw");
    let ids: Vec<i64> = outcome.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1]);
    // The raw query is embedded, not the keyword list.
    assert_eq!(ollama.embed_inputs(), vec!["Show me git rebas commit?".to_string()]);
    let sizes: Vec<usize> = ollama.chat_contexts().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1, 1]);
    assert_eq!(ollama.chats.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unrelated_records_are_not_returned() {
    let store = Arc::new(MemoryStore::new());
    store.push(
        CommandRecord::new(1, "ls -la", "list files")
            .with_embedding(Embedding::new(vec![1.0, 0.0, 0.0, 0.0])),
    );
    let ollama = Arc::new(
        StubProvider::new(ProviderKind::Ollama)
            .with_embedding(vec![1.0, 0.0, 0.0, 0.0])
            .with_answer("Use systemctl restart nginx"),
    );
    let search = smart_search(store, vec![ollama.clone()], PreferredProvider::None).await;

    let outcome = search.search("restart nginx", true).await.unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.answer, "Use systemctl restart nginx");
    // Only the context-free last-resort chat reached the provider.
    assert_eq!(ollama.chat_contexts(), vec![Vec::<CommandRecord>::new()]);
}

#[tokio::test]
async fn test_no_provider_yields_error_answer() {
    let store = Arc::new(MemoryStore::with_records(&[("ls", "list files")]));
    let search = smart_search(
        store,
        vec![
            Arc::new(StubProvider::unreachable(ProviderKind::Ollama)),
            Arc::new(StubProvider::unreachable(ProviderKind::Gemini)),
        ],
        PreferredProvider::None,
    )
    .await;

    let outcome = search.search("frobnicate the widget", true).await.unwrap();

    assert!(outcome.records.is_empty());
    assert!(outcome.answer.contains("AI Provider Error"));
    assert!(outcome.answer.contains("no AI provider available"));
}

#[tokio::test]
async fn test_failing_providers_reported_in_answer() {
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama));
    let search = smart_search(
        Arc::new(MemoryStore::new()),
        vec![ollama.clone()],
        PreferredProvider::None,
    )
    .await;

    let outcome = search.search("restart nginx", true).await.unwrap();
    assert!(outcome.answer.contains("all AI providers failed"));
    assert!(outcome.answer.contains("stub chat failure"));
}

#[tokio::test]
async fn test_store_unavailable_is_fatal() {
    let store = Arc::new(MemoryStore::new());
    store.set_offline(true);
    let search = smart_search(store, vec![], PreferredProvider::None).await;

    let err = search.search("docker", true).await.unwrap_err();
    assert!(err.is_store_error());
}

#[tokio::test]
async fn test_regenerate_bypasses_short_circuit() {
    let ollama = Arc::new(StubProvider::new(ProviderKind::Ollama).with_answer("docker ps --all"));
    let search = smart_search(docker_store(), vec![ollama.clone()], PreferredProvider::None).await;

    let outcome = search.regenerate("show me docker containers").await.unwrap();

    assert_eq!(outcome.answer, "docker ps --all");
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(ollama.chats.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_regenerate_without_provider_errors() {
    let search = smart_search(docker_store(), vec![], PreferredProvider::None).await;
    let err = search.regenerate("docker").await.unwrap_err();
    assert!(matches!(err, SearchError::NoProviderAvailable));
}
