//! In-memory store and recording provider stubs for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use scmd_protocols::{
    AiProvider, ChatAnswer, CommandRecord, CommandStore, Embedding, EmbeddingStats,
    KeywordPredicate, NewCommand, ProviderError, ProviderKind, StoreError,
};

pub const TEST_DIMENSION: usize = 4;

/// Store backed by a vector, evaluating predicates with [`KeywordPredicate::matches`].
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<CommandRecord>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(pairs: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.lock();
            for (i, (key, data)) in pairs.iter().enumerate() {
                records.push(CommandRecord::new(i as i64 + 1, *key, *data));
            }
        }
        store
    }

    pub fn push(&self, record: CommandRecord) {
        self.records.lock().push(record);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<CommandRecord> {
        self.records.lock().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommandStore for MemoryStore {
    async fn search(&self, predicate: &KeywordPredicate) -> Result<Vec<CommandRecord>, StoreError> {
        self.check()?;
        let mut hits: Vec<CommandRecord> = self
            .records
            .lock()
            .iter()
            .filter(|r| predicate.matches(&r.key, &r.data))
            .cloned()
            .collect();
        hits.sort_by_key(|r| r.id);
        Ok(hits)
    }

    async fn nearest(
        &self,
        query: &Embedding,
        limit: usize,
    ) -> Result<Vec<CommandRecord>, StoreError> {
        self.check()?;
        let mut hits: Vec<(f32, CommandRecord)> = self
            .records
            .lock()
            .iter()
            .filter_map(|r| {
                r.embedding
                    .as_ref()
                    .map(|e| (e.cosine_distance(query), r.clone()))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        Ok(hits.into_iter().take(limit).map(|(_, r)| r).collect())
    }

    async fn insert(&self, command: NewCommand) -> Result<i64, StoreError> {
        self.check()?;
        let mut records = self.records.lock();
        let id = match command.id {
            Some(id) => id,
            None => records.iter().map(|r| r.id).max().unwrap_or(0) + 1,
        };
        records.push(CommandRecord {
            id,
            key: command.key,
            data: command.data,
            embedding: command.embedding,
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<CommandRecord>, StoreError> {
        self.check()?;
        Ok(self.records.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn update_embedding(&self, id: i64, embedding: &Embedding) -> Result<(), StoreError> {
        self.check()?;
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::Query(format!("no record {}", id)))?;
        record.embedding = Some(embedding.clone());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.records.lock().iter().any(|r| r.key == key))
    }

    async fn next_id(&self) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.records.lock().iter().map(|r| r.id).max().unwrap_or(0) + 1)
    }

    async fn missing_embeddings(&self) -> Result<Vec<CommandRecord>, StoreError> {
        self.check()?;
        let mut missing: Vec<CommandRecord> = self
            .records
            .lock()
            .iter()
            .filter(|r| r.embedding.is_none())
            .cloned()
            .collect();
        missing.sort_by_key(|r| r.id);
        Ok(missing)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CommandRecord>, StoreError> {
        self.check()?;
        let mut records = self.records.lock().clone();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records.truncate(limit);
        Ok(records)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.records.lock().len() as u64)
    }

    async fn embedding_stats(&self) -> Result<EmbeddingStats, StoreError> {
        self.check()?;
        let records = self.records.lock();
        Ok(EmbeddingStats {
            total: records.len() as u64,
            with_embedding: records.iter().filter(|r| r.embedding.is_some()).count() as u64,
        })
    }
}

/// Provider stub that records every call it receives.
pub struct StubProvider {
    kind: ProviderKind,
    reachable: AtomicBool,
    embedding: Option<Vec<f32>>,
    answer: Option<String>,
    failing_chats: AtomicUsize,
    pub probes: AtomicUsize,
    pub embeds: AtomicUsize,
    pub chats: AtomicUsize,
    contexts: Mutex<Vec<Vec<CommandRecord>>>,
    embed_inputs: Mutex<Vec<String>>,
}

impl StubProvider {
    /// Reachable, but every embed and chat call fails until configured.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            reachable: AtomicBool::new(true),
            embedding: None,
            answer: None,
            failing_chats: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            embeds: AtomicUsize::new(0),
            chats: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
            embed_inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(kind: ProviderKind) -> Self {
        Self {
            reachable: AtomicBool::new(false),
            ..Self::new(kind)
        }
    }

    pub fn with_embedding(mut self, vector: Vec<f32>) -> Self {
        self.embedding = Some(vector);
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = Some(answer.to_string());
        self
    }

    /// The first `n` chat calls fail even when an answer is configured.
    pub fn failing_chats(self, n: usize) -> Self {
        self.failing_chats.store(n, Ordering::SeqCst);
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Embed plus chat calls.
    pub fn calls(&self) -> usize {
        self.embeds.load(Ordering::SeqCst) + self.chats.load(Ordering::SeqCst)
    }

    pub fn chat_contexts(&self) -> Vec<Vec<CommandRecord>> {
        self.contexts.lock().clone()
    }

    /// Texts passed to `embed`, in call order.
    pub fn embed_inputs(&self) -> Vec<String> {
        self.embed_inputs.lock().clone()
    }
}

#[async_trait]
impl AiProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        "stub"
    }

    async fn probe(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.reachable.load(Ordering::SeqCst)
    }

    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        self.embeds.fetch_add(1, Ordering::SeqCst);
        self.embed_inputs.lock().push(text.to_string());
        match &self.embedding {
            Some(v) => Ok(Embedding::normalized(v.clone(), TEST_DIMENSION)),
            None => Err(ProviderError::RequestFailed("stub embed failure".to_string())),
        }
    }

    async fn chat(
        &self,
        _question: &str,
        context: &[CommandRecord],
    ) -> Result<ChatAnswer, ProviderError> {
        self.chats.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().push(context.to_vec());
        let failing = self
            .failing_chats
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ProviderError::RequestFailed("stub chat failure".to_string()));
        }
        match &self.answer {
            Some(text) => Ok(ChatAnswer::new(text.clone(), 42)),
            None => Err(ProviderError::Unavailable("stub chat failure".to_string())),
        }
    }
}
