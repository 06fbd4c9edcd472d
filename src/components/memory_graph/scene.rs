//! Per-frame draw list handed to the renderer.

use super::simulation::ForceSimulation;
use super::types::NodeCategory;
use crate::config::NodeStyle;

const MAX_LABEL_CHARS: usize = 24;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite<'a> {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: &'a str,
	pub label: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
	pub from: (f64, f64),
	pub to: (f64, f64),
}

/// Read-only snapshot of a simulation, taken after the frame's steps ran.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene<'a> {
	pub nodes: Vec<NodeSprite<'a>>,
	pub edges: Vec<EdgeSegment>,
}

impl<'a> Scene<'a> {
	pub fn capture(sim: &'a ForceSimulation, style: &'a NodeStyle) -> Self {
		let nodes = &sim.state().nodes;
		let edges = sim
			.links()
			.iter()
			.filter_map(|&(src, tgt)| {
				let (a, b) = (nodes.get(src)?, nodes.get(tgt)?);
				Some(EdgeSegment {
					from: (a.x, a.y),
					to: (b.x, b.y),
				})
			})
			.collect();

		Self {
			nodes: nodes
				.iter()
				.map(|n| NodeSprite {
					x: n.x,
					y: n.y,
					radius: node_radius(n.importance, style),
					color: node_color(n.category, style),
					label: truncate_label(&n.label),
				})
				.collect(),
			edges,
		}
	}
}

/// Importance is clamped to `[0, 1]`; NaN counts as 0.
pub fn node_radius(importance: f64, style: &NodeStyle) -> f64 {
	let weight = if importance.is_nan() {
		0.0
	} else {
		importance.clamp(0.0, 1.0)
	};
	style.base_radius + weight * style.importance_radius
}

pub fn node_color(category: NodeCategory, style: &NodeStyle) -> &str {
	match category {
		NodeCategory::Fact => &style.fact_color,
		NodeCategory::Conversation => &style.conversation_color,
		NodeCategory::Other => &style.other_color,
	}
}

fn truncate_label(label: &str) -> &str {
	match label.char_indices().nth(MAX_LABEL_CHARS) {
		Some((end, _)) => &label[..end],
		None => label,
	}
}
