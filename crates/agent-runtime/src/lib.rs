//! # agent-runtime
//!
//! Runtime providers for the meeting agent system.
//!
//! ## Providers
//!
//! - **OpenAI-compatible** (default): hosted chat-completions APIs
//!   (OpenRouter, OpenAI, vLLM, ...) selected via `LLM_MODEL`,
//!   `LLM_BASE_URL`, and `LLM_API_KEY`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env();
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
