//! Claude provider implementation
//!
//! This module provides a client for the Anthropic Messages API with
//! streaming responses.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

// Re-export commonly used types
pub use client::{ClaudeClient, ANTHROPIC_VERSION, DEFAULT_BASE_URL};
