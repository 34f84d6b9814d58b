pub mod adapter;
pub mod llm;
pub mod ollama;

pub use adapter::{is_error_text, ModelAdapter, ModelInput, ModelResponse, ERROR_MARKER};
pub use llm::{
    AnthropicProvider, GeminiProvider, LLMProvider, Message, MockLLMProvider, OpenAIProvider,
};
pub use ollama::OllamaProvider;
