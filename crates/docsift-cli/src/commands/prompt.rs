//! Prompt command implementation.

use crate::cli::PromptArgs;
use crate::error::Result;
use docsift_extractor::build_template_prompt;

/// Execute the prompt command: print the prompt the template would send.
pub fn execute_prompt(args: PromptArgs) -> Result<()> {
    let template = super::load_template(&args.template)?;
    println!("{}", build_template_prompt(&template));
    Ok(())
}
