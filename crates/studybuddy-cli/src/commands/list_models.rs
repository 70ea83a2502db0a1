//! The `studybuddy list-models` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studybuddy_core::traits::ModelInfo;
use studybuddy_providers::config::load_config_from;
use studybuddy_providers::ollama::OllamaProvider;
use studybuddy_providers::{create_provider, ProviderConfig};

pub async fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut providers: Vec<(String, ProviderConfig)> = config
        .providers
        .iter()
        .map(|(name, pconfig)| (name.clone(), pconfig.clone()))
        .collect();
    if !config.providers.contains_key(&config.default_provider) {
        if let Some(pconfig) = config.default_provider_config() {
            providers.push((config.default_provider.clone(), pconfig));
        }
    }
    providers.sort_by(|a, b| a.0.cmp(&b.0));

    let mut table = Table::new();
    table.set_header(vec!["Provider", "Model", "Name", "Context"]);
    let mut found_any = false;

    for (name, pconfig) in &providers {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let models = match pconfig {
            // Ollama only knows its models at runtime.
            ProviderConfig::Ollama { base_url } => {
                match OllamaProvider::new(base_url)?.list_models_async().await {
                    Ok(models) => models,
                    Err(e) => {
                        eprintln!("{name}: {e:#}");
                        continue;
                    }
                }
            }
            _ => create_provider(name, pconfig)?.available_models(),
        };

        for model in &models {
            found_any = true;
            table.add_row(row(name, model));
        }
    }

    if found_any {
        println!("{table}");
    } else {
        println!("No models found. Run `studybuddy init` to create a config file.");
    }
    Ok(())
}

fn row(provider: &str, model: &ModelInfo) -> Vec<Cell> {
    let context = if model.max_context > 0 {
        format!("{}K", model.max_context / 1000)
    } else {
        "-".to_string()
    };
    vec![
        Cell::new(provider),
        Cell::new(&model.id),
        Cell::new(&model.name),
        Cell::new(context),
    ]
}
