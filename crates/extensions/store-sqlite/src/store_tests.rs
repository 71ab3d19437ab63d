use super::*;

async fn seeded() -> SqliteCommandStore {
    let store = SqliteCommandStore::in_memory().await.unwrap();
    for (key, data) in [
        ("docker ps -a", "list all containers"),
        ("docker images", "list local images"),
        ("kubectl get pods", "List Pods in the current namespace"),
        ("git log --oneline", "compact history"),
    ] {
        store.insert(NewCommand::new(key, data)).await.unwrap();
    }
    store
}

fn keys(records: &[CommandRecord]) -> Vec<&str> {
    records.iter().map(|r| r.key.as_str()).collect()
}

#[tokio::test]
async fn test_insert_assigns_sequential_ids() {
    let store = SqliteCommandStore::in_memory().await.unwrap();
    let first = store.insert(NewCommand::new("ls", "list")).await.unwrap();
    let second = store.insert(NewCommand::new("pwd", "cwd")).await.unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(store.next_id().await.unwrap(), 3);
}

#[tokio::test]
async fn test_insert_with_explicit_id() {
    let store = seeded().await;
    let id = store
        .insert(NewCommand::new("echo hi", "greet").with_id(42))
        .await
        .unwrap();
    assert_eq!(id, 42);
    assert_eq!(store.next_id().await.unwrap(), 43);

    // A colliding explicit id is reported, not silently replaced.
    let result = store.insert(NewCommand::new("echo again", "x").with_id(42)).await;
    assert!(matches!(result, Err(StoreError::Query(_))));
}

#[tokio::test]
async fn test_empty_store_next_id() {
    let store = SqliteCommandStore::in_memory().await.unwrap();
    assert_eq!(store.next_id().await.unwrap(), 1);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_match_all_ordered_by_id() {
    let store = seeded().await;
    let records = store.search(&KeywordPredicate::match_all()).await.unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_search_and_within_clause() {
    let store = seeded().await;
    let predicate = KeywordPredicate::from_clauses(vec![vec!["docker", "contain"]]);
    let records = store.search(&predicate).await.unwrap();
    assert_eq!(keys(&records), vec!["docker ps -a"]);
}

#[tokio::test]
async fn test_search_or_across_clauses() {
    let store = seeded().await;
    let predicate = KeywordPredicate::from_clauses(vec![vec!["images"], vec!["history"]]);
    let records = store.search(&predicate).await.unwrap();
    assert_eq!(keys(&records), vec!["docker images", "git log --oneline"]);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let store = seeded().await;
    let predicate = KeywordPredicate::from_clauses(vec![vec!["PODS"]]);
    let records = store.search(&predicate).await.unwrap();
    assert_eq!(keys(&records), vec!["kubectl get pods"]);
}

#[tokio::test]
async fn test_search_agrees_with_reference_semantics() {
    let store = seeded().await;
    store
        .insert(NewCommand::new("Über-tool --run", "Ärger vermeiden 100%_done"))
        .await
        .unwrap();
    let all = store.search(&KeywordPredicate::match_all()).await.unwrap();

    for pattern in [
        vec![vec!["über"]],
        vec![vec!["ärger", "100%"]],
        vec![vec!["_done"], vec!["git"]],
        vec![vec!["list", "namespace"]],
        vec![vec!["nothing-here"]],
    ] {
        let predicate = KeywordPredicate::from_clauses(pattern);
        let expected: Vec<i64> = all
            .iter()
            .filter(|r| predicate.matches(&r.key, &r.data))
            .map(|r| r.id)
            .collect();
        let actual: Vec<i64> = store
            .search(&predicate)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(actual, expected, "predicate {:?}", predicate);
    }
}

#[tokio::test]
async fn test_exists() {
    let store = seeded().await;
    assert!(store.exists("docker images").await.unwrap());
    assert!(!store.exists("docker image").await.unwrap());
}

#[tokio::test]
async fn test_embedding_roundtrip_and_stats() {
    let store = seeded().await;
    store
        .update_embedding(2, &Embedding::new(vec![0.5, 0.25, 0.0]))
        .await
        .unwrap();

    let records = store
        .search(&KeywordPredicate::from_clauses(vec![vec!["images"]]))
        .await
        .unwrap();
    assert_eq!(
        records[0].embedding.as_ref().map(|e| e.as_slice().to_vec()),
        Some(vec![0.5, 0.25, 0.0])
    );

    let stats = store.embedding_stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.with_embedding, 1);

    let missing = store.missing_embeddings().await.unwrap();
    let ids: Vec<i64> = missing.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn test_update_embedding_unknown_id() {
    let store = seeded().await;
    let result = store.update_embedding(99, &Embedding::new(vec![1.0])).await;
    assert!(matches!(result, Err(StoreError::Query(_))));
}

#[tokio::test]
async fn test_nearest_orders_by_distance() {
    let store = seeded().await;
    store.update_embedding(1, &Embedding::new(vec![1.0, 0.0])).await.unwrap();
    store.update_embedding(2, &Embedding::new(vec![0.0, 1.0])).await.unwrap();
    store.update_embedding(3, &Embedding::new(vec![0.7, 0.7])).await.unwrap();

    let hits = store.nearest(&Embedding::new(vec![1.0, 0.1]), 2).await.unwrap();
    let ids: Vec<i64> = hits.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_nearest_without_embeddings_is_empty() {
    let store = seeded().await;
    let hits = store.nearest(&Embedding::new(vec![1.0]), 10).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_recent_newest_first() {
    let store = seeded().await;
    let recent = store.recent(2).await.unwrap();
    assert_eq!(keys(&recent), vec!["git log --oneline", "kubectl get pods"]);
}

#[tokio::test]
async fn test_open_file_backed_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("scmd.db");
    {
        let store = SqliteCommandStore::open(&path).await.unwrap();
        store.insert(NewCommand::new("ls", "list")).await.unwrap();
    }
    let reopened = SqliteCommandStore::open(&path).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 1);
    assert!(reopened.exists("ls").await.unwrap());
}

#[tokio::test]
async fn test_get_by_id() {
    let store = seeded().await;
    store
        .update_embedding(2, &Embedding::new(vec![0.5, -1.0]))
        .await
        .unwrap();

    let record = store.get(2).await.unwrap().unwrap();
    assert_eq!(record.key, "docker images");
    assert_eq!(record.data, "list local images");
    assert_eq!(record.embedding, Some(Embedding::new(vec![0.5, -1.0])));

    assert!(store.get(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_by_id() {
    let store = seeded().await;

    assert!(store.delete(1).await.unwrap());
    assert!(store.get(1).await.unwrap().is_none());
    assert!(!store.exists("docker ps -a").await.unwrap());
    assert_eq!(store.count().await.unwrap(), 3);

    // Deleting again reports that nothing matched.
    assert!(!store.delete(1).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 3);
}
