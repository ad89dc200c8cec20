// Prompt Proxy: templates requests for the completion model and normalizes its replies.
// All LLM calls go through llm_client. No direct HTTP calls to the provider here.

pub mod handlers;
pub mod normalize;
pub mod prompts;
