//! End-to-end pipeline runs against scripted services.

use std::sync::Arc;

use qa_agent::{
    testing::TraceEvent, CheckpointStore, MemoryCheckpointStore, Node, Pipeline, RecordingTracer,
    RunId, ScriptedModel, SearchHit, Stage, StageOutput, StaticSearcher,
};

const RIYADH_ANSWER: &str = "Riyadh is the capital and largest city of Saudi Arabia.";

/// Model that classifies via the verify prompt and answers via the answer prompt.
fn model(verdict: &str) -> ScriptedModel {
    ScriptedModel::new()
        .when("Respond with ONLY", verdict)
        .when("Search Results:", RIYADH_ANSWER)
}

fn riyadh_hits() -> Vec<SearchHit> {
    vec![
        SearchHit::new(
            "https://en.wikipedia.org/wiki/Riyadh",
            "Riyadh - Wikipedia",
            "Riyadh is the capital of Saudi Arabia.",
        ),
        SearchHit::new(
            "https://www.britannica.com/place/Riyadh",
            "Riyadh | Britannica",
            "Riyadh, city, capital of Saudi Arabia.",
        ),
    ]
}

#[tokio::test]
async fn test_in_scope_question_runs_all_three_stages() {
    let llm = model("true");
    let searcher = StaticSearcher::new().with_hits(riyadh_hits());
    let pipeline = Pipeline::new(llm.clone(), searcher.clone());

    let state = pipeline
        .run("What is the capital of Saudi Arabia?")
        .await
        .unwrap();

    assert!(state.in_scope());
    assert_eq!(
        state.executed_stages(),
        vec![Stage::Verify, Stage::Search, Stage::Answer]
    );
    assert!(state.search_payload().contains("Source: https://en.wikipedia.org/wiki/Riyadh"));
    assert!(state.final_answer().contains("Riyadh"));

    // Verify prompt, then answer prompt containing the full payload.
    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains(state.search_payload()));
    assert_eq!(searcher.requests().len(), 1);
}

#[tokio::test]
async fn test_out_of_scope_question_is_refused_without_search() {
    let llm = model("false");
    let searcher = StaticSearcher::new().with_hits(riyadh_hits());
    let pipeline = Pipeline::new(llm.clone(), searcher.clone());

    let state = pipeline.run("What is the capital of England?").await.unwrap();

    assert!(!state.in_scope());
    assert_eq!(state.search_payload(), "");
    assert!(state.final_answer().contains("I can only answer questions about Saudi Arabia"));
    assert!(searcher.requests().is_empty());
    assert_eq!(llm.prompts().len(), 1);

    let search = state.record(Stage::Search).unwrap();
    assert_eq!(
        search.output(),
        &StageOutput::Text("Skipped - not a Saudi Arabia question".into())
    );
    assert_eq!(search.reasoning(), "Question verification failed");
    assert!(state.is_complete());
}

#[tokio::test]
async fn test_verify_failure_ends_the_run() {
    let llm = ScriptedModel::new().with_failure("service unavailable");
    let searcher = StaticSearcher::new();
    let tracer = Arc::new(RecordingTracer::new());
    let checkpoints = Arc::new(MemoryCheckpointStore::new());
    let pipeline = Pipeline::new(llm, searcher.clone())
        .with_tracer(tracer.clone())
        .with_checkpoints(checkpoints.clone());

    let run_id = RunId::new();
    let err = pipeline
        .run_with_id(run_id, "What is the capital of Saudi Arabia?")
        .await
        .unwrap_err();

    assert_eq!(err.failed_stage(), Some(Stage::Verify));
    assert!(searcher.requests().is_empty());
    assert!(checkpoints.is_empty());
    assert_eq!(
        tracer.events(),
        vec![TraceEvent::Failed {
            run_id,
            stage: Some(Stage::Verify)
        }]
    );
}

#[tokio::test]
async fn test_answer_failure_keeps_earlier_checkpoint() {
    let llm = ScriptedModel::new()
        .with_response("true")
        .with_failure("timeout");
    let checkpoints = Arc::new(MemoryCheckpointStore::new());
    let pipeline = Pipeline::new(llm, StaticSearcher::new().with_hits(riyadh_hits()))
        .with_checkpoints(checkpoints.clone());

    let run_id = RunId::new();
    let err = pipeline
        .run_with_id(run_id, "Tell me about Riyadh")
        .await
        .unwrap_err();
    assert_eq!(err.failed_stage(), Some(Stage::Answer));

    let checkpoint = checkpoints.load(run_id).await.unwrap().unwrap();
    assert_eq!(checkpoint.next, Node::Answer);
    assert!(checkpoint.state.has_run(Stage::Search));
    assert!(!checkpoint.state.has_run(Stage::Answer));
}

#[tokio::test]
async fn test_search_failure_still_produces_an_answer() {
    let llm = ScriptedModel::new()
        .when("Respond with ONLY", "true")
        .when(
            "Search Results:",
            "I could not find current sources, but Riyadh is Saudi Arabia's capital.",
        );
    let pipeline = Pipeline::new(llm.clone(), StaticSearcher::new().with_failure("quota exceeded"));

    let state = pipeline.run("What is the capital of Saudi Arabia?").await.unwrap();

    assert!(state.search_payload().starts_with("Search failed: "));
    assert!(!state.final_answer().is_empty());
    assert!(state.record(Stage::Search).unwrap().output().mentions("error"));
    assert!(llm.prompts()[1].contains("Search failed: "));
}

#[tokio::test]
async fn test_concurrent_runs_do_not_share_checkpoints() {
    let checkpoints = Arc::new(MemoryCheckpointStore::new());
    let tracer = Arc::new(RecordingTracer::new());
    let pipeline = Pipeline::new(model("true"), StaticSearcher::new().with_hits(riyadh_hits()))
        .with_checkpoints(checkpoints.clone())
        .with_tracer(tracer.clone());

    let (first, second) = (RunId::new(), RunId::new());
    let (a, b) = tokio::join!(
        pipeline.run_with_id(first, "What is the capital of Saudi Arabia?"),
        pipeline.run_with_id(second, "How big is Riyadh?"),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(checkpoints.len(), 2);
    let first_cp = checkpoints.load(first).await.unwrap().unwrap();
    let second_cp = checkpoints.load(second).await.unwrap().unwrap();
    assert_eq!(first_cp.next, Node::Done);
    assert_eq!(first_cp.state.question(), "What is the capital of Saudi Arabia?");
    assert_eq!(second_cp.state.question(), "How big is Riyadh?");

    assert_eq!(
        tracer.stages_for(first),
        vec![Stage::Verify, Stage::Search, Stage::Answer]
    );
    assert_eq!(tracer.stages_for(second).len(), 3);
}

#[tokio::test]
async fn test_finished_state_round_trips_through_json() {
    let pipeline = Pipeline::new(model("true"), StaticSearcher::new().with_hits(riyadh_hits()));
    let state = pipeline.run("Tell me about Riyadh").await.unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let at = |key: &str| json.find(&format!("\"{}\":{{", key)).unwrap();
    assert!(at("verify") < at("search"));
    assert!(at("search") < at("answer"));

    let restored: qa_agent::PipelineState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
    assert_eq!(
        restored.executed_stages(),
        vec![Stage::Verify, Stage::Search, Stage::Answer]
    );
}
