//! Knowledge graph sampling and rendering.

use comfy_table::{Cell, Table};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Entity, GraphEntry, KnowledgeGraph};

/// Pair every entity with a random sample of up to `related` other entities.
pub fn build_knowledge_graph<R: Rng + ?Sized>(
    entities: &[Entity],
    related: usize,
    rng: &mut R,
) -> KnowledgeGraph {
    let sample_size = related.min(entities.len().saturating_sub(1));

    let entries = entities
        .iter()
        .map(|entity| {
            let others: Vec<&Entity> = entities.iter().filter(|e| *e != entity).collect();
            let related = others
                .choose_multiple(rng, sample_size.min(others.len()))
                .map(|e| (*e).clone())
                .collect();
            GraphEntry {
                entity: entity.clone(),
                related,
            }
        })
        .collect();

    KnowledgeGraph::new(entries)
}

/// Render the graph as a two-column console table.
pub fn render_table(graph: &KnowledgeGraph) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Term", "Related terms"]);

    for entry in graph.entries() {
        let related = entry
            .related
            .iter()
            .map(Entity::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![Cell::new(entry.entity.as_str()), Cell::new(related)]);
    }

    table
}

/// Render the graph as pretty-printed JSON.
pub fn render_json(graph: &KnowledgeGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(graph)
}
