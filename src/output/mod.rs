use anyhow::Result;
use std::path::Path;

use crate::batch::BatchResponse;
use crate::cli::OutputFormat;

pub mod formatters;

pub use formatters::*;

fn render(response: &BatchResponse, format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format_as_text(response),
        OutputFormat::Json => format_as_json(response)?,
    })
}

/// Save batch results to file
pub async fn save_to_file(response: &BatchResponse, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(response, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print batch results to console
pub fn print_to_console(response: &BatchResponse, format: &OutputFormat) -> Result<()> {
    println!("{}", render(response, format)?);
    Ok(())
}
