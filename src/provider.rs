//! Where memory records and graph snapshots come from.

use std::collections::HashSet;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::components::memory_graph::{GraphData, GraphEdge, GraphNode, NodeCategory};
use crate::error::{Error, Result};

const LABEL_WORDS: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
	pub id: String,
	pub content: String,
	#[serde(rename = "type")]
	pub kind: NodeCategory,
	/// RFC 3339 timestamp; compared lexically.
	pub created_at: String,
	#[serde(default)]
	pub importance: f64,
}

/// Pull-based source of memory data. Every call returns a full snapshot.
pub trait GraphProvider {
	fn memories(&self) -> Result<Vec<MemoryRecord>>;
}

/// One node per record; each fact links to the latest conversation created
/// before it. Duplicate ids are rejected.
pub fn graph_from_records(records: &[MemoryRecord]) -> Result<GraphData> {
	let mut seen = HashSet::new();
	for r in records {
		if !seen.insert(r.id.as_str()) {
			return Err(Error::Provider(format!("duplicate memory id {:?}", r.id)));
		}
	}

	let mut ordered: Vec<&MemoryRecord> = records.iter().collect();
	ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

	let mut edges = Vec::new();
	let mut last_conversation: Option<&str> = None;
	for r in &ordered {
		match r.kind {
			NodeCategory::Conversation => last_conversation = Some(r.id.as_str()),
			NodeCategory::Fact => {
				if let Some(conv) = last_conversation {
					edges.push(GraphEdge {
						source: r.id.clone(),
						target: conv.to_string(),
						label: "extracted from".into(),
					});
				}
			}
			NodeCategory::Other => {}
		}
	}

	let nodes = records
		.iter()
		.map(|r| GraphNode {
			id: r.id.clone(),
			label: short_label(&r.content),
			category: r.kind,
			importance: r.importance,
		})
		.collect();

	Ok(GraphData { nodes, edges })
}

fn short_label(content: &str) -> String {
	let mut words = content.split_whitespace();
	let mut label = words.by_ref().take(LABEL_WORDS).collect::<Vec<_>>().join(" ");
	if words.next().is_some() {
		label.push('…');
	}
	label
}

const TOPICS: &[&str] = &[
	"rust", "the garden", "coffee", "the trip to Lisbon", "budget", "the new job", "running",
	"piano lessons", "the book club", "tax forms",
];

const FACT_TEMPLATES: &[&str] = &[
	"User prefers {} in the morning",
	"User mentioned {} twice this week",
	"User wants a reminder about {}",
	"User is learning about {}",
];

/// Deterministic demo data.
#[derive(Clone, Copy, Debug)]
pub struct SampleProvider {
	pub seed: u64,
	pub count: usize,
}

impl GraphProvider for SampleProvider {
	fn memories(&self) -> Result<Vec<MemoryRecord>> {
		let mut rng = StdRng::seed_from_u64(self.seed);
		let records: Vec<MemoryRecord> = (0..self.count)
			.map(|i| {
				let topic = TOPICS[rng.gen_range(0..TOPICS.len())];
				let (kind, content) = if i % 4 == 0 {
					(
						NodeCategory::Conversation,
						format!("Conversation about {topic}"),
					)
				} else {
					let template = FACT_TEMPLATES[rng.gen_range(0..FACT_TEMPLATES.len())];
					(NodeCategory::Fact, template.replace("{}", topic))
				};
				let minutes = i * 37;
				MemoryRecord {
					id: format!("mem-{i:03}"),
					content,
					kind,
					created_at: format!(
						"2024-05-{:02}T{:02}:{:02}:00Z",
						1 + minutes / (24 * 60),
						minutes / 60 % 24,
						minutes % 60
					),
					importance: (rng.gen_range(0.0..1.0_f64) * 100.0).round() / 100.0,
				}
			})
			.collect();
		debug!("Sample provider produced {} records", records.len());
		Ok(records)
	}
}
