// Environment configuration
pub mod config;

// Terminal rendering
pub mod console;

// LLM abstraction layer, tools and the agent loop
pub mod llm;
