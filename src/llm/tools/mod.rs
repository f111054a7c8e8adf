//! Tool execution framework
//!
//! Tools implement [`Tool`] directly or, more commonly, [`TypedTool`] with a
//! `serde` + `schemars` input struct. A [`ToolRegistry`] holds them in
//! registration order and the [`Dispatcher`] executes model-issued calls
//! against it.

pub mod builtin;
pub mod declaration;
pub mod executor;
pub mod registry;
pub mod tool;

// Re-export commonly used types
pub use builtin::default_registry;
pub use declaration::{create_tool_declaration, input_schema};
pub use executor::{Dispatcher, ToolExecutor};
pub use registry::{RegistryError, ToolRegistry};
pub use tool::{Tool, ToolError, TypedTool, TypedToolAdapter};
