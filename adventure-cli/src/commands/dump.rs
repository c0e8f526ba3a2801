//! CLI command for printing a parsed story

use std::path::Path;

use adventure::ParseOptions;
use adventure::story::{load_story_file_with, to_json, write_string};

use super::DumpFormat;

pub fn execute(source: &Path, format: DumpFormat, options: &ParseOptions) -> anyhow::Result<()> {
    let tree = load_story_file_with(source, options)?;
    let output = match format {
        DumpFormat::Json => to_json(&tree)? + "\n",
        DumpFormat::Lines => write_string(&tree)?,
    };
    print!("{output}");
    Ok(())
}
