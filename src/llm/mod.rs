//! # Completion client
//!
//! Wraps the external chat-completions endpoint:
//! - `types`: request/response wire types
//! - `transport`: the HTTP and backoff seams (`ChatTransport`, `Sleeper`)
//! - `send`: the retrying [`CompletionClient`]
//! - `errors`: [`CompletionError`] and retry classification
//!
//! ```text
//! PromptRequest → build_prompt → CompletionClient::complete → text
//! ```

pub mod errors;
pub mod send;
pub mod transport;
pub mod types;

pub use errors::CompletionError;
pub use send::{parse_completion, CompletionClient};
pub use transport::{ChatTransport, HttpTransport, Sleeper, TokioSleeper};
pub use types::{CompletionResult, LLMRequest, Message, RawResponse};

#[cfg(test)]
mod tests;
