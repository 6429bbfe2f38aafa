//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction and an extensible
//! tool system with schema-validated inputs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │         │                                                    │
//! │         └──▶ AgentEvent stream (text, tool calls, state)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between OpenAI-compatible APIs,
//! local inference, or any other provider without changing agent logic. Tool
//! inputs are typed records whose JSON Schema (via `schemars`) is shown to
//! the model and enforced on the way back in; a validation failure is fed
//! back to the model for correction rather than aborting the run.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use event::AgentEvent;
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, RunReport, ToolInvocation};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema, parse_input};
