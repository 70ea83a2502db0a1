//! Study pipeline orchestrator.
//!
//! Runs the stages in order for one piece of material: entity extraction,
//! knowledge graph sampling, then one question per leading entity.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::EntityExtractor;
use crate::graph::build_knowledge_graph;
use crate::model::{Entity, KnowledgeGraph, QuestionOrigin, QuizQuestion, StudyMaterial};
use crate::question::QuestionGenerator;
use crate::settings::QuizSettings;

/// Everything the presentation stage needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlan {
    pub entities: Vec<Entity>,
    pub questions: Vec<QuizQuestion>,
    pub graph: KnowledgeGraph,
}

impl StudyPlan {
    /// Number of questions that fell back to the placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.origin == QuestionOrigin::Placeholder)
            .count()
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_entities_extracted(&self, entities: &[Entity]);
    fn on_question_start(&self, index: usize, total: usize, entity: &Entity);
    fn on_question_complete(&self, index: usize, question: &QuizQuestion);
    fn on_plan_ready(&self, plan: &StudyPlan, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_entities_extracted(&self, _: &[Entity]) {}
    fn on_question_start(&self, _: usize, _: usize, _: &Entity) {}
    fn on_question_complete(&self, _: usize, _: &QuizQuestion) {}
    fn on_plan_ready(&self, _: &StudyPlan, _: Duration) {}
}

/// The loaded model handles plus the run limits.
pub struct StudyPipeline {
    extractor: EntityExtractor,
    generator: QuestionGenerator,
    settings: QuizSettings,
}

impl StudyPipeline {
    pub fn new(
        extractor: EntityExtractor,
        generator: QuestionGenerator,
        settings: QuizSettings,
    ) -> Self {
        Self {
            extractor,
            generator,
            settings,
        }
    }

    pub fn generator(&self) -> &QuestionGenerator {
        &self.generator
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    /// Build the quiz and graph for `material`.
    pub async fn prepare<R: Rng + ?Sized>(
        &self,
        material: &StudyMaterial,
        rng: &mut R,
        progress: &dyn ProgressReporter,
    ) -> StudyPlan {
        let start = Instant::now();
        let text = material.text();
        tracing::debug!(source = ?material.source(), chars = text.len(), "preparing study plan");

        let entities = self.extractor.extract(text, rng).await;
        progress.on_entities_extracted(&entities);

        let graph = build_knowledge_graph(&entities, self.settings.related_terms, rng);

        let selected = &entities[..entities.len().min(self.settings.max_questions)];
        let mut questions = Vec::with_capacity(selected.len());
        for (index, entity) in selected.iter().enumerate() {
            progress.on_question_start(index, selected.len(), entity);
            let question = self.generator.generate(entity, text, rng).await;
            progress.on_question_complete(index, &question);
            questions.push(question);
        }

        let plan = StudyPlan {
            entities,
            questions,
            graph,
        };
        tracing::info!(
            entities = plan.entities.len(),
            questions = plan.questions.len(),
            placeholders = plan.placeholder_count(),
            "study plan ready"
        );
        progress.on_plan_ready(&plan, start.elapsed());
        plan
    }
}
