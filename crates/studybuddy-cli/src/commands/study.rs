//! The `studybuddy study` command: the interactive quiz flow.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use studybuddy_core::console::Console;
use studybuddy_core::engine::{ProgressReporter, StudyPipeline, StudyPlan};
use studybuddy_core::entities::{EntityExtractor, LlmRecognizer, RuleBasedRecognizer};
use studybuddy_core::graph::{render_json, render_table};
use studybuddy_core::model::{
    Entity, MaterialSource, QuestionOrigin, QuizQuestion, StudyMaterial,
};
use studybuddy_core::question::QuestionGenerator;
use studybuddy_core::quiz::run_quiz;
use studybuddy_core::settings::RecognizerKind;
use studybuddy_core::traits::{EntityRecognizer, LlmProvider};
use studybuddy_extract::Extractor;
use studybuddy_providers::config::{load_config_from, StudyBuddyConfig};
use studybuddy_providers::create_provider;

#[derive(Args, Debug, Clone, Default)]
pub struct StudyArgs {
    /// Study this file instead of choosing at the menu
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Skip the generative model; questions use the placeholder
    #[arg(long)]
    pub offline: bool,

    /// Number of questions to generate
    #[arg(long)]
    pub questions: Option<usize>,

    /// Seed for term sampling, distractors and option order
    #[arg(long)]
    pub seed: Option<u64>,

    /// How to print the knowledge graph
    #[arg(long, value_enum, default_value_t = GraphFormat::Text)]
    pub graph_format: GraphFormat,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    #[default]
    Text,
    Json,
}

/// Progress lines on stderr so they stay out of the quiz transcript.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_entities_extracted(&self, entities: &[Entity]) {
        eprintln!("  Found {} terms", entities.len());
    }

    fn on_question_start(&self, index: usize, total: usize, entity: &Entity) {
        eprintln!("  [{}/{}] {entity}", index + 1, total);
    }

    fn on_question_complete(&self, _: usize, question: &QuizQuestion) {
        if question.origin == QuestionOrigin::Placeholder {
            eprintln!("        (placeholder)");
        }
    }

    fn on_plan_ready(&self, plan: &StudyPlan, elapsed: Duration) {
        eprintln!(
            "  Ready: {} questions, {} placeholders ({:.1}s)",
            plan.questions.len(),
            plan.placeholder_count(),
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(args: StudyArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(n) = args.questions {
        config.quiz.max_questions = n;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    run(&config, &args, &mut console, &ConsoleReporter).await
}

async fn run<R: BufRead, W: Write>(
    config: &StudyBuddyConfig,
    args: &StudyArgs,
    console: &mut Console<R, W>,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    console.say("=== AI Study Buddy ===")?;
    let provider = if args.offline {
        console.say("Offline mode: questions will use the placeholder.")?;
        None
    } else {
        load_provider(config, console).await?
    };

    let extractor = Extractor::new(config.ocr.clone());
    let material = match &args.file {
        Some(path) => read_file(path, &extractor, console).await?,
        None => choose_material(&extractor, console).await?,
    };
    let Some(material) = material else {
        return Ok(());
    };

    console.say("Generating meaningful quiz and knowledge graph...")?;
    let pipeline = build_pipeline(config, provider);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let plan = pipeline.prepare(&material, &mut rng, progress).await;

    run_quiz(console, &plan.questions)?;

    console.say("")?;
    console.say("Knowledge Graph (Sample):")?;
    match args.graph_format {
        GraphFormat::Text => console.say(render_table(&plan.graph).to_string())?,
        GraphFormat::Json => console.say(render_json(&plan.graph)?)?,
    }
    Ok(())
}

/// Create the default provider and check that it answers.
async fn load_provider<R: BufRead, W: Write>(
    config: &StudyBuddyConfig,
    console: &mut Console<R, W>,
) -> Result<Option<Arc<dyn LlmProvider>>> {
    let Some(pconfig) = config.default_provider_config() else {
        console.say(format!(
            "Error loading AI models: provider '{}' is not configured",
            config.default_provider
        ))?;
        return Ok(None);
    };

    let provider: Arc<dyn LlmProvider> =
        Arc::from(create_provider(&config.default_provider, &pconfig)?);
    match provider.ping().await {
        Ok(()) => {
            console.say("AI models loaded successfully!")?;
            Ok(Some(provider))
        }
        Err(e) => {
            console.say(format!("Error loading AI models: {e:#}"))?;
            Ok(None)
        }
    }
}

fn build_pipeline(
    config: &StudyBuddyConfig,
    provider: Option<Arc<dyn LlmProvider>>,
) -> StudyPipeline {
    let options = config.generation_options();
    let recognizer: Option<Box<dyn EntityRecognizer>> = match (config.recognizer, &provider) {
        (RecognizerKind::None, _) => None,
        (RecognizerKind::Llm, Some(provider)) => Some(Box::new(LlmRecognizer::new(
            Arc::clone(provider),
            options.model.clone(),
            options.max_tokens,
        ))),
        (RecognizerKind::Llm, None) => {
            tracing::warn!("no generative model loaded, using rule-based term recognition");
            Some(Box::new(RuleBasedRecognizer::new()))
        }
        (RecognizerKind::Rules, _) => Some(Box::new(RuleBasedRecognizer::new())),
    };

    StudyPipeline::new(
        EntityExtractor::new(recognizer, &config.quiz),
        QuestionGenerator::new(provider, options),
        config.quiz.clone(),
    )
}

/// The paste-or-upload menu. `None` means the flow ended with a message.
async fn choose_material<R: BufRead, W: Write>(
    extractor: &Extractor,
    console: &mut Console<R, W>,
) -> Result<Option<StudyMaterial>> {
    let choice = console
        .prompt("Do you want to (1) Paste text or (2) Upload file? ")?
        .unwrap_or_default();

    match choice.trim() {
        "1" => {
            console.say("Paste your text here (finish with an empty line):")?;
            let text = console.read_block()?;
            match StudyMaterial::new(text, MaterialSource::Pasted) {
                Ok(material) => Ok(Some(material)),
                Err(e) => {
                    console.say(format!("Nothing to study: {e}."))?;
                    Ok(None)
                }
            }
        }
        "2" => {
            let raw = console
                .prompt("Enter full path (txt, java, docx, pptx, pdf, jpg/png): ")?
                .unwrap_or_default();
            let path = PathBuf::from(unquote(&raw));
            read_file(&path, extractor, console).await
        }
        _ => {
            console.say("Invalid choice!")?;
            Ok(None)
        }
    }
}

async fn read_file<R: BufRead, W: Write>(
    path: &Path,
    extractor: &Extractor,
    console: &mut Console<R, W>,
) -> Result<Option<StudyMaterial>> {
    if !path.exists() {
        console.say("File not found!")?;
        return Ok(None);
    }

    let text = extractor.extract_text(path).await;
    match StudyMaterial::new(text, MaterialSource::File(path.to_path_buf())) {
        Ok(material) => Ok(Some(material)),
        Err(_) => {
            console.say("Could not read any text from the file.")?;
            Ok(None)
        }
    }
}

/// Strip whitespace and the quotes a file manager adds when dragging a path.
fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(|c: char| c == '"' || c == '\'')
}
