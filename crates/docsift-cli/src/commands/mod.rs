//! Command implementations.

mod extract;
mod prompt;

pub use extract::execute_extract;
pub use prompt::execute_prompt;

use crate::error::Result;
use docsift_extractor::Template;
use std::fs;
use std::path::Path;

/// Load a template definition from a TOML file.
pub(crate) fn load_template(path: &Path) -> Result<Template> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}
