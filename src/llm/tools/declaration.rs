//! Tool declaration helpers using JSON Schema generation

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;

use crate::llm::core::types::ToolDeclaration;

/// Generate the input schema for `T`
///
/// Subschemas are inlined so the model sees a single flat object, optional
/// fields are left out of `required` without being typed as `null`, and the
/// `$schema`/`title` keys are dropped.
///
/// # Errors
///
/// Fails only if the derived schema cannot be represented as JSON, which is a
/// defect in the `JsonSchema` impl rather than a runtime condition.
pub fn input_schema<T: JsonSchema>() -> Result<serde_json::Value, serde_json::Error> {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.option_nullable = false;
        s.option_add_null_type = false;
        s.meta_schema = None;
    });
    let schema = settings.into_generator().into_root_schema_for::<T>();

    let mut value = serde_json::to_value(&schema)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("title");
    }
    Ok(value)
}

/// Create a tool declaration from a type that implements JsonSchema
///
/// # Example
///
/// ```ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct ReadFileInput {
///     /// The relative path of a file in the working directory.
///     path: String,
/// }
///
/// let decl = create_tool_declaration::<ReadFileInput>(
///     "read_file",
///     "Read the contents of a given relative file path.",
/// )?;
/// ```
pub fn create_tool_declaration<T: JsonSchema>(
    name: impl Into<String>,
    description: impl Into<String>,
) -> Result<ToolDeclaration, serde_json::Error> {
    Ok(ToolDeclaration {
        name: name.into(),
        description: description.into(),
        input_schema: input_schema::<T>()?,
    })
}
