//! Built-in host-side tools
//!
//! Every tool holds the working directory it was registered with; relative
//! paths in tool input resolve against it and spawned processes run in it.

mod bash;
mod code_search;
mod edit_file;
mod list_files;
mod read_file;

pub use bash::{Bash, BashInput};
pub use code_search::{CodeSearch, CodeSearchInput};
pub use edit_file::{EditFile, EditFileInput};
pub use list_files::{ListFiles, ListFilesInput};
pub use read_file::{ReadFile, ReadFileInput};

use std::path::{Path, PathBuf};

use super::registry::{RegistryError, ToolRegistry};

/// Upper bound on lines returned by line-oriented tools
pub const MAX_OUTPUT_LINES: usize = 50;

/// Keep the first `limit` lines of `text`, noting how many there were
///
/// Text with at most `limit` lines is returned unchanged.
pub fn truncate_lines(text: &str, limit: usize, unit: &str) -> String {
    let total = text.lines().count();
    if total <= limit {
        return text.to_string();
    }

    tracing::debug!(total, limit, unit, "truncating tool output");
    let kept: Vec<&str> = text.lines().take(limit).collect();
    format!(
        "{}\n... (showing first {} of {} {})",
        kept.join("\n"),
        limit,
        total,
        unit
    )
}

/// Resolve a tool-supplied path against the working directory
pub(crate) fn resolve(workdir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    }
}

/// Registry holding the five built-in tools, rooted at `workdir`
///
/// # Errors
///
/// Fails only on a schema generation defect or a duplicate name.
pub fn default_registry(workdir: impl Into<PathBuf>) -> Result<ToolRegistry, RegistryError> {
    let workdir = workdir.into();

    let mut registry = ToolRegistry::new();
    registry.register_typed(ReadFile::new(workdir.clone()))?;
    registry.register_typed(ListFiles::new(workdir.clone()))?;
    registry.register_typed(Bash::new(workdir.clone()))?;
    registry.register_typed(EditFile::new(workdir.clone()))?;
    registry.register_typed(CodeSearch::new(workdir))?;
    Ok(registry)
}
