pub mod run;
pub mod scope;
pub mod search;
pub mod stage;
pub mod state;

pub use run::RunId;
pub use scope::TopicScope;
pub use search::{format_hits, SearchDepth, SearchHit, SearchRequest};
pub use stage::{Stage, StageOutput, StageRecord};
pub use state::PipelineState;
