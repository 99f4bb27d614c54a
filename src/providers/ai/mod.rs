//! AI/LLM provider implementations.
//!
//! The digest only needs single-shot completions, so the surface is one trait
//! and one HTTP client that speaks the OpenAI chat completions protocol. The
//! same client talks to a local Ollama server.
//!
//! # Example
//!
//! ```rust,no_run
//! use inbox_digest::providers::ai::{
//!     CompletionRequest, LlmProvider, Message, OpenAiCompatibleProvider,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ollama = OpenAiCompatibleProvider::ollama(None, "llama3.2");
//!
//! let request = CompletionRequest::new(vec![Message::user("Resume estos correos")])
//!     .with_system_prompt("Eres un asistente que resume correos.");
//!
//! let response = ollama.complete(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

mod openai;
mod traits;

pub use openai::{OpenAiCompatibleProvider, OLLAMA_BASE_URL, OPENAI_BASE_URL};
pub use traits::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, LlmResult,
    Message, Role,
};
