//! Ordered, immutable-after-startup collection of tools

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::tool::{Tool, TypedTool, TypedToolAdapter};
use crate::llm::core::types::ToolDeclaration;

/// Start-up configuration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two tools share a name
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// A tool's input schema could not be generated
    #[error("Failed to generate schema for tool {name}: {source}")]
    Schema {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Registry of the tools the model may call
///
/// Tools keep their registration order, which is also the order their
/// declarations are sent to the model.
///
/// # Example
///
/// ```ignore
/// let mut registry = ToolRegistry::new();
/// registry.register_typed(ReadFile::new(workdir.clone()))?;
/// registry.register_typed(Bash::new(workdir))?;
///
/// let registry = Arc::new(registry);
/// let declarations = registry.declarations();
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool object
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] if the name is taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register a typed tool, deriving its schema from the input type
    pub fn register_typed<T: TypedTool>(&mut self, tool: T) -> Result<(), RegistryError> {
        let adapter = TypedToolAdapter::new(tool).map_err(|source| RegistryError::Schema {
            name: T::NAME.to_string(),
            source,
        })?;
        self.register(Arc::new(adapter))
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Declarations in registration order
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(|t| t.declaration().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tools::tool::ToolError;
    use async_trait::async_trait;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct AddArgs {
        a: i64,
        b: i64,
    }

    struct Add;

    #[async_trait]
    impl TypedTool for Add {
        type Input = AddArgs;
        const NAME: &'static str = "add";
        const DESCRIPTION: &'static str = "Add two integers.";

        async fn call(&self, input: AddArgs) -> Result<String, ToolError> {
            Ok((input.a + input.b).to_string())
        }
    }

    struct Named(ToolDeclaration);

    #[async_trait]
    impl Tool for Named {
        fn declaration(&self) -> &ToolDeclaration {
            &self.0
        }

        async fn execute(&self, _input: serde_json::Value) -> Result<String, ToolError> {
            Ok(self.0.name.clone())
        }
    }

    fn named(name: &str) -> Arc<dyn Tool> {
        Arc::new(Named(ToolDeclaration {
            name: name.to_string(),
            description: format!("The {} tool", name),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }))
    }

    #[test]
    fn test_lookup_returns_registered_tool() {
        let mut registry = ToolRegistry::new();
        for name in ["read_file", "list_files", "bash"] {
            registry.register(named(name)).unwrap();
        }

        for name in ["read_file", "list_files", "bash"] {
            let tool = registry.get(name).expect("registered tool");
            assert_eq!(tool.name(), name);
            assert_eq!(tool.declaration().description, format!("The {} tool", name));
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let mut registry = ToolRegistry::new();
        registry.register(named("bash")).unwrap();

        assert!(registry.get("rm_rf").is_none());
        assert!(!registry.contains("rm_rf"));
        assert!(ToolRegistry::new().get("bash").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(named("bash")).unwrap();

        let err = registry.register(named("bash")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTool(ref n) if n == "bash"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_declarations_keep_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(named("zeta")).unwrap();
        registry.register(named("alpha")).unwrap();
        registry.register_typed(Add).unwrap();

        assert_eq!(registry.names(), vec!["zeta", "alpha", "add"]);
        let names: Vec<String> = registry.declarations().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "add"]);
    }

    #[tokio::test]
    async fn test_typed_registration_executes() {
        let mut registry = ToolRegistry::new();
        registry.register_typed(Add).unwrap();

        let tool = registry.get("add").unwrap();
        let result = tool.execute(serde_json::json!({"a": 5, "b": 3})).await;
        assert_eq!(result, Ok("8".to_string()));
    }
}
