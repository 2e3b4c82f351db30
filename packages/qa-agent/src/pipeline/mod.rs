//! Pipeline engine: prompts, stage implementations, and the graph driver.

pub mod graph;
pub mod nodes;
pub mod prompts;

pub use graph::{route_after_verify, Node, Pipeline, Route};
pub use nodes::{answer, preview, search, skip_search, verify};
pub use prompts::{format_answer_prompt, format_verify_prompt, parse_verdict, Verdict};
