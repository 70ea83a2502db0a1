//! The `studybuddy init` command.

use std::path::Path;

use anyhow::{Context, Result};

use studybuddy_providers::config::LOCAL_CONFIG_FILE;

pub fn execute() -> Result<()> {
    write_config(Path::new(LOCAL_CONFIG_FILE))?;

    println!("\nNext steps:");
    println!("  1. Start Ollama and run: ollama pull llama3.2");
    println!("     (or set default_provider = \"openai\" and export OPENAI_API_KEY)");
    println!("  2. Run: studybuddy --file notes.pdf");
    Ok(())
}

fn write_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studybuddy configuration

default_provider = "ollama"
default_model = "llama3.2"
temperature = 0.7
max_tokens = 300
# rules | llm | none
recognizer = "rules"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[quiz]
max_questions = 10
min_entities = 5
fallback_sample = 10
related_terms = 3

[ocr]
tesseract = "tesseract"
pdftoppm = "pdftoppm"
language = "eng"
dpi = 200
timeout_secs = 120
"#;
