pub mod checkpoint;
pub mod llm;
pub mod searcher;
pub mod tracer;
