mod llm_client_factory;
mod openai_client;
mod scaffold_llm_client;

pub use llm_client_factory::{LlmClientFactory, LlmClientFactoryError};
pub use openai_client::OpenAiClient;
pub use scaffold_llm_client::ScaffoldLlmClient;
