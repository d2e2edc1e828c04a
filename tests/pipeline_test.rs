//! End-to-end pipeline behavior with in-memory service doubles.
//!
//! These tests wire [`Assistant::from_services`] with counting stubs so
//! the embed -> retrieve -> generate flow, the no-context short circuit
//! and the uniform error mapping can all be checked without network.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use fitrag::embeddings::Embedder;
use fitrag::errors::FitRagError;
use fitrag::index::VectorIndex;
use fitrag::index::DEFAULT_TOP_K;
use fitrag::llm::TextGenerator;
use fitrag::models::ChunkMetadata;
use fitrag::models::ChunkRecord;
use fitrag::models::ScoredChunk;
use fitrag::rag::AskRequest;
use fitrag::rag::Assistant;
use fitrag::rag::QueryOutcome;
use fitrag::rag::NO_CONTEXT_MESSAGE;
use fitrag::rag::PIPELINE_ERROR_MESSAGE;
use fitrag::Result;

struct StubEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.1, 0.2, 0.3])
    }
}

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(FitRagError::Embedding("embedding service down".to_string()))
    }
}

struct StubIndex {
    chunks: Vec<ScoredChunk>,
    calls: AtomicUsize,
    last_top_k: AtomicUsize,
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_top_k.store(top_k, Ordering::SeqCst);
        Ok(self.chunks.clone())
    }

    async fn upsert(&self, records: &[ChunkRecord], _namespace: Option<&str>) -> Result<usize> {
        Ok(records.len())
    }
}

struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn query(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<ScoredChunk>> {
        Err(FitRagError::Retrieval("index unavailable".to_string()))
    }

    async fn upsert(&self, _records: &[ChunkRecord], _namespace: Option<&str>) -> Result<usize> {
        Err(FitRagError::Retrieval("index unavailable".to_string()))
    }
}

struct RecordingGenerator {
    answer: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(FitRagError::Generation("llm unavailable".to_string()))
    }
}

fn stub_embedder() -> Arc<StubEmbedder> {
    Arc::new(StubEmbedder {
        calls: AtomicUsize::new(0),
    })
}

fn stub_index(chunks: Vec<ScoredChunk>) -> Arc<StubIndex> {
    Arc::new(StubIndex {
        chunks,
        calls: AtomicUsize::new(0),
        last_top_k: AtomicUsize::new(0),
    })
}

fn recording_generator(answer: &str) -> Arc<RecordingGenerator> {
    Arc::new(RecordingGenerator {
        answer: answer.to_string(),
        calls: AtomicUsize::new(0),
        prompts: Mutex::new(Vec::new()),
    })
}

fn chunk(id: &str, score: f32, text: &str) -> ScoredChunk {
    ScoredChunk {
        id: id.to_string(),
        score,
        metadata: ChunkMetadata::from_text(text),
    }
}

#[tokio::test]
async fn test_answer_is_generator_output_unmodified() -> Result<()> {
    let chunks = vec![
        chunk("id-1/1/1", 0.91, "Stretch your wrists hourly."),
        chunk("id-1/1/2", 0.84, "Blink more during screen work."),
    ];
    // Leading and trailing whitespace must survive untouched
    let raw_answer = "  Here is what helps:\n- stretch\n- blink  \n";
    let generator = recording_generator(raw_answer);
    let assistant = Assistant::from_services(
        stub_embedder(),
        stub_index(chunks),
        generator.clone(),
    );

    match assistant.ask("How do I avoid wrist pain?").await? {
        QueryOutcome::Answered(response) => {
            assert_eq!(response.answer, raw_answer);
            assert_eq!(response.sources.len(), 2);
            assert_eq!(response.question, "How do I avoid wrist pain?");
        }
        QueryOutcome::NoMatches => panic!("expected an answer"),
    }

    let answer = assistant
        .process_query("How do I avoid wrist pain?", None, None)
        .await;
    assert_eq!(answer, raw_answer);

    Ok(())
}

#[tokio::test]
async fn test_no_matches_short_circuits_generation() -> Result<()> {
    let embedder = stub_embedder();
    let index = stub_index(Vec::new());
    let generator = recording_generator("should never be returned");
    let assistant = Assistant::from_services(embedder.clone(), index.clone(), generator.clone());

    match assistant.ask("Anything about quantum kettlebells?").await? {
        QueryOutcome::NoMatches => {}
        QueryOutcome::Answered(_) => panic!("expected no matches"),
    }

    let answer = assistant
        .process_query("Anything about quantum kettlebells?", None, None)
        .await;
    assert_eq!(answer, NO_CONTEXT_MESSAGE);

    // Both calls embedded and queried, neither generated
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(index.calls.load(Ordering::SeqCst), 2);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_embedding_failure_maps_to_generic_message() {
    let index = stub_index(vec![chunk("id-1/1/1", 0.9, "irrelevant")]);
    let generator = recording_generator("unreachable");
    let assistant =
        Assistant::from_services(Arc::new(FailingEmbedder), index.clone(), generator.clone());

    let answer = assistant.process_query("Does sleep matter?", None, None).await;
    assert_eq!(answer, PIPELINE_ERROR_MESSAGE);

    // The failure stopped the pipeline before retrieval and generation
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_retrieval_failure_maps_to_generic_message() {
    let generator = recording_generator("unreachable");
    let assistant = Assistant::from_services(
        stub_embedder(),
        Arc::new(FailingIndex),
        generator.clone(),
    );

    let answer = assistant.process_query("Does sleep matter?", None, None).await;
    assert_eq!(answer, PIPELINE_ERROR_MESSAGE);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generation_failure_maps_to_generic_message() {
    let chunks = vec![chunk("id-1/1/1", 0.9, "Sleep 7 to 9 hours.")];
    let assistant = Assistant::from_services(
        stub_embedder(),
        stub_index(chunks),
        Arc::new(FailingGenerator),
    );

    let answer = assistant.process_query("Does sleep matter?", None, None).await;
    assert_eq!(answer, PIPELINE_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_ask_with_options_propagates_errors() {
    let assistant = Assistant::from_services(
        stub_embedder(),
        Arc::new(FailingIndex),
        recording_generator("unreachable"),
    );

    let result = assistant
        .ask_with_options(AskRequest::new("Does sleep matter?"))
        .await;
    assert!(matches!(result, Err(FitRagError::Retrieval(_))));
}

#[tokio::test]
async fn test_chunk_order_is_preserved_into_prompt() -> Result<()> {
    let chunks = vec![
        chunk("id-1/1/1", 0.93, "First fact about hydration."),
        chunk("id-1/1/2", 0.88, "Second fact about caffeine."),
        chunk("id-1/1/3", 0.71, "Third fact about naps."),
    ];
    let generator = recording_generator("ok");
    let assistant = Assistant::from_services(
        stub_embedder(),
        stub_index(chunks),
        generator.clone(),
    );

    match assistant.ask("What should I drink?").await? {
        QueryOutcome::Answered(response) => {
            let ids: Vec<&str> = response.sources.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["id-1/1/1", "id-1/1/2", "id-1/1/3"]);
        }
        QueryOutcome::NoMatches => panic!("expected an answer"),
    }

    let prompt = generator.last_prompt();
    assert!(prompt.contains(
        "First fact about hydration.\n\nSecond fact about caffeine.\n\nThird fact about naps."
    ));

    Ok(())
}

#[tokio::test]
async fn test_query_without_name_addresses_the_default_user() {
    let chunks = vec![chunk("id-1/1/1", 0.9, "Take walking breaks.")];
    let generator = recording_generator("ok");
    let assistant = Assistant::from_services(
        stub_embedder(),
        stub_index(chunks),
        generator.clone(),
    );

    let _ = assistant.process_query("Should I take breaks?", None, None).await;

    let prompt = generator.last_prompt();
    assert!(prompt.contains("a programmer named User."));
    assert!(prompt.contains("User's Question:"));
    assert!(prompt.contains("\"Should I take breaks?\""));
}

#[tokio::test]
async fn test_personalized_query_flows_into_prompt() {
    let chunks = vec![
        chunk("id-1/4/10", 0.95, "Teenagers need more sleep than adults."),
        chunk("id-1/4/11", 0.90, "Screen time before bed delays sleep onset."),
        chunk("id-1/4/12", 0.82, "Consistent wake times stabilize energy."),
    ];
    let generator = recording_generator("ok");
    let assistant = Assistant::from_services(
        stub_embedder(),
        stub_index(chunks),
        generator.clone(),
    );

    let _ = assistant
        .process_query(
            "How much should I sleep?",
            Some("Kaloyan"),
            Some("16 year old, student"),
        )
        .await;

    let prompt = generator.last_prompt();
    assert!(prompt.contains("a programmer named Kaloyan."));
    assert!(prompt.contains("Kaloyan's Question:\n\"How much should I sleep?\""));
    assert!(prompt.contains("What You Know About the User:\n16 year old, student"));
    let first = prompt.find("Teenagers need more sleep").unwrap();
    let second = prompt.find("Screen time before bed").unwrap();
    let third = prompt.find("Consistent wake times").unwrap();
    assert!(first < second && second < third);
}

#[tokio::test]
async fn test_top_k_override_reaches_the_index() -> Result<()> {
    let index = stub_index(vec![chunk("id-1/1/1", 0.9, "fact")]);
    let generator = recording_generator("ok");
    let assistant = Assistant::from_services(stub_embedder(), index.clone(), generator);

    assistant
        .ask_with_options(AskRequest::new("breaks?"))
        .await?;
    assert_eq!(index.last_top_k.load(Ordering::SeqCst), DEFAULT_TOP_K);

    let mut request = AskRequest::new("breaks?");
    request.top_k = Some(3);
    assistant.ask_with_options(request).await?;
    assert_eq!(index.last_top_k.load(Ordering::SeqCst), 3);

    Ok(())
}

#[tokio::test]
async fn test_search_skips_generation() -> Result<()> {
    let chunks = vec![
        chunk("id-1/1/1", 0.9, "fact one"),
        chunk("id-1/1/2", 0.8, "fact two"),
    ];
    let generator = recording_generator("unused");
    let assistant = Assistant::from_services(
        stub_embedder(),
        stub_index(chunks),
        generator.clone(),
    );

    let results = assistant.search("facts?", 5).await?;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text(), "fact one");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

    Ok(())
}
