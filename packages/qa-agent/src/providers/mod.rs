//! HTTP implementations of the service traits.

pub mod openai;
pub mod tavily;

pub use openai::OpenAiChatModel;
pub use tavily::TavilySearcher;
