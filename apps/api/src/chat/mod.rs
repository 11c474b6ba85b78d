// Chat pipeline: history windowing, persona selection, and the proxy that
// forwards one chat turn to the upstream LLM.
// All upstream calls go through llm_client.

pub mod endpoint;
pub mod handlers;
pub mod prompts;
pub mod proxy;
pub mod window;

pub use endpoint::ChatEndpoint;
