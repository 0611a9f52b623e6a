//! Public exports for building task prompts.

pub mod builder;
pub mod schema;
pub mod templates;

pub use builder::build_prompt;
pub use schema::PromptRequest;
