//! The `studybuddy extract` command.

use std::path::PathBuf;

use anyhow::Result;

use studybuddy_extract::Extractor;
use studybuddy_providers::config::load_config_from;

pub async fn execute(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    anyhow::ensure!(file.exists(), "file not found: {}", file.display());

    let text = Extractor::new(config.ocr).extract(&file).await?;
    println!("{text}");
    Ok(())
}
