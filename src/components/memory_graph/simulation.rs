//! Force-directed layout physics.
//!
//! Each step applies, in order:
//! - center gravity toward `(width / 2, height / 2)`
//! - inverse-square repulsion between every unordered pair (O(n²))
//! - spring attraction along every resolved edge
//! - damping and integration
//! - a clamp into `[padding, dimension - padding]` on both axes
//!
//! Nodes have unit mass, so forces are added straight to velocities.
//! Randomness is confined to initial placement.

use std::collections::HashMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::types::{GraphData, GraphEdge, NodeCategory};
use crate::config::ForceParams;

/// A node plus its kinematic state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
	pub id: String,
	pub label: String,
	pub category: NodeCategory,
	pub importance: f64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

/// All kinematic values plus the bounds the layout is confined to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
	pub nodes: Vec<LayoutNode>,
	pub width: f64,
	pub height: f64,
}

/// An edge resolved to `(source, target)` indices into [`SimulationState::nodes`].
pub type Link = (usize, usize);

/// Resolve edges against the node set. Edges with an unknown endpoint are
/// dropped; they never take part in forces or drawing.
pub fn resolve_links(nodes: &[LayoutNode], edges: &[GraphEdge]) -> Vec<Link> {
	let id_to_idx: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	edges
		.iter()
		.filter_map(|e| {
			match (id_to_idx.get(e.source.as_str()), id_to_idx.get(e.target.as_str())) {
				(Some(&src), Some(&tgt)) => Some((src, tgt)),
				_ => {
					debug!("Skipping edge {:?}: {} -> {}", e.label, e.source, e.target);
					None
				}
			}
		})
		.collect()
}

/// Repulsive force on a node displaced by `(dx, dy)` from another node.
///
/// The distance is clamped to `min_distance` so the force stays finite.
/// `repulsion(-dx, -dy)` is the exact negation of `repulsion(dx, dy)`.
pub fn repulsion(dx: f64, dy: f64, params: &ForceParams) -> (f64, f64) {
	let len = (dx * dx + dy * dy).sqrt();
	if len == 0.0 {
		return (0.0, 0.0);
	}
	let dist = len.max(params.min_distance);
	let force = params.repulsion / (dist * dist);
	(dx / len * force, dy / len * force)
}

/// Spring force on an edge's source node, where `(dx, dy)` points from the
/// source to the target. The target receives the negation.
pub fn attraction(dx: f64, dy: f64, params: &ForceParams) -> (f64, f64) {
	let mut dist = (dx * dx + dy * dy).sqrt();
	if dist == 0.0 {
		dist = 1.0;
	}
	let force = dist * params.attraction;
	(dx / dist * force, dy / dist * force)
}

/// Displacement of node `i` from node `j` (with `i < j`). Coincident nodes
/// are treated as `i` sitting one unit to the left of `j`.
fn pair_displacement(a: &LayoutNode, b: &LayoutNode) -> (f64, f64) {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	if dx == 0.0 && dy == 0.0 {
		(-1.0, 0.0)
	} else {
		(dx, dy)
	}
}

/// Pure form of one physics tick: returns the next state, leaving `state`
/// untouched.
pub fn step(state: &SimulationState, links: &[Link], params: &ForceParams) -> SimulationState {
	let mut next = state.clone();
	advance(&mut next, links, params);
	next
}

/// One physics tick, in place.
fn advance(state: &mut SimulationState, links: &[Link], params: &ForceParams) {
	let nodes = &mut state.nodes;
	if nodes.is_empty() {
		return;
	}
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);

	for node in nodes.iter_mut() {
		node.vx += (cx - node.x) * params.center_force;
		node.vy += (cy - node.y) * params.center_force;
	}

	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let (dx, dy) = pair_displacement(&nodes[i], &nodes[j]);
			let (fx, fy) = repulsion(dx, dy, params);
			nodes[i].vx += fx;
			nodes[i].vy += fy;
			nodes[j].vx -= fx;
			nodes[j].vy -= fy;
		}
	}

	for &(src, tgt) in links {
		let (Some(a), Some(b)) = (nodes.get(src), nodes.get(tgt)) else {
			continue;
		};
		let (fx, fy) = attraction(b.x - a.x, b.y - a.y, params);
		nodes[src].vx += fx;
		nodes[src].vy += fy;
		nodes[tgt].vx -= fx;
		nodes[tgt].vy -= fy;
	}

	// upper bound never drops below padding, even on a canvas narrower than 2 * padding
	let pad = params.padding;
	let (max_x, max_y) = (
		(state.width - pad).max(pad),
		(state.height - pad).max(pad),
	);
	for node in nodes.iter_mut() {
		node.vx *= params.damping;
		node.vy *= params.damping;
		node.x = (node.x + node.vx).clamp(pad, max_x);
		node.y = (node.y + node.vy).clamp(pad, max_y);
	}
}

/// Owns the simulation state for one graph view session.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
	state: SimulationState,
	links: Vec<Link>,
	params: ForceParams,
}

impl ForceSimulation {
	/// Place every node at a seeded random offset around the canvas center.
	pub fn seeded(
		data: &GraphData,
		width: f64,
		height: f64,
		params: ForceParams,
		seed: u64,
	) -> Self {
		let mut rng = StdRng::seed_from_u64(seed);
		Self::with_rng(data, width, height, params, &mut rng)
	}

	pub fn with_rng<R: Rng>(
		data: &GraphData,
		width: f64,
		height: f64,
		params: ForceParams,
		rng: &mut R,
	) -> Self {
		let (cx, cy) = (width / 2.0, height / 2.0);
		// gen_range panics on an inverted range
		let jitter = params.jitter.abs();
		let nodes = data
			.nodes
			.iter()
			.map(|node| LayoutNode {
				id: node.id.clone(),
				label: node.label.clone(),
				category: node.category,
				importance: node.importance,
				x: cx + rng.gen_range(-jitter..=jitter),
				y: cy + rng.gen_range(-jitter..=jitter),
				vx: 0.0,
				vy: 0.0,
			})
			.collect();

		Self::from_state(
			SimulationState {
				nodes,
				width,
				height,
			},
			&data.edges,
			params,
		)
	}

	/// Adopt an existing state, e.g. a restored snapshot.
	pub fn from_state(state: SimulationState, edges: &[GraphEdge], params: ForceParams) -> Self {
		let links = resolve_links(&state.nodes, edges);
		info!(
			"Simulation ready: {} nodes, {} links ({} dangling edges skipped)",
			state.nodes.len(),
			links.len(),
			edges.len() - links.len()
		);
		Self {
			state,
			links,
			params,
		}
	}

	pub fn step(&mut self) {
		self.state = step(&self.state, &self.links, &self.params);
	}

	pub fn state(&self) -> &SimulationState {
		&self.state
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// New bounds take effect on the next step's clamp.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.state.width = width;
		self.state.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::memory_graph::types::GraphNode;

	fn node(id: &str, x: f64, y: f64) -> LayoutNode {
		LayoutNode {
			id: id.into(),
			label: id.to_uppercase(),
			category: NodeCategory::Fact,
			importance: 0.5,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
			label: String::new(),
		}
	}

	fn sample_data(n: usize) -> GraphData {
		let nodes = (0..n)
			.map(|i| GraphNode {
				id: format!("n{i}"),
				label: format!("Node {i}"),
				category: if i % 2 == 0 {
					NodeCategory::Fact
				} else {
					NodeCategory::Conversation
				},
				importance: (i % 5) as f64 / 4.0,
			})
			.collect();
		let edges = (1..n).map(|i| edge(&format!("n{i}"), &format!("n{}", i / 2))).collect();
		GraphData { nodes, edges }
	}

	fn distance(state: &SimulationState) -> f64 {
		let (a, b) = (&state.nodes[0], &state.nodes[1]);
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn initial_placement_is_jittered_around_center() {
		let params = ForceParams::default();
		let sim = ForceSimulation::seeded(&sample_data(20), 800.0, 600.0, params, 7);
		for n in &sim.state().nodes {
			assert!((n.x - 400.0).abs() <= params.jitter);
			assert!((n.y - 300.0).abs() <= params.jitter);
			assert_eq!((n.vx, n.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn same_seed_same_layout() {
		let data = sample_data(10);
		let params = ForceParams::default();
		let a = ForceSimulation::seeded(&data, 800.0, 600.0, params, 42);
		let b = ForceSimulation::seeded(&data, 800.0, 600.0, params, 42);
		let c = ForceSimulation::seeded(&data, 800.0, 600.0, params, 43);
		assert_eq!(a.state(), b.state());
		assert_ne!(a.state(), c.state());
	}

	#[test]
	fn positions_stay_within_padding() {
		let params = ForceParams::default();
		let mut sim = ForceSimulation::seeded(&sample_data(60), 200.0, 150.0, params, 1);
		for _ in 0..300 {
			sim.step();
			let s = sim.state();
			for n in &s.nodes {
				assert!(n.x >= params.padding && n.x <= s.width - params.padding);
				assert!(n.y >= params.padding && n.y <= s.height - params.padding);
			}
		}
	}

	#[test]
	fn canvas_smaller_than_padding_pins_to_margin() {
		let params = ForceParams::default();
		let mut sim = ForceSimulation::seeded(&sample_data(3), 40.0, 40.0, params, 3);
		sim.step();
		for n in &sim.state().nodes {
			assert_eq!((n.x, n.y), (params.padding, params.padding));
		}
	}

	#[test]
	fn repulsion_is_antisymmetric() {
		let params = ForceParams::default();
		for &(dx, dy) in &[(3.0, 4.0), (-120.5, 17.25), (0.001, -0.002), (55.0, 0.0)] {
			let (fx, fy) = repulsion(dx, dy, &params);
			let (gx, gy) = repulsion(-dx, -dy, &params);
			assert_eq!((fx, fy), (-gx, -gy));
		}
	}

	#[test]
	fn repulsion_clamps_short_distances() {
		let params = ForceParams::default();
		let near = repulsion(1.0, 0.0, &params);
		let at_min = repulsion(params.min_distance, 0.0, &params);
		assert_eq!(near, at_min);
		assert!(near.0.is_finite() && near.0 > 0.0);
	}

	#[test]
	fn pairwise_forces_conserve_momentum() {
		let params = ForceParams {
			center_force: 0.0,
			..ForceParams::default()
		};
		let state = SimulationState {
			nodes: vec![
				node("a", 300.0, 300.0),
				node("b", 340.0, 310.0),
				node("c", 500.0, 200.0),
				node("d", 320.0, 420.0),
			],
			width: 800.0,
			height: 600.0,
		};
		let edges = [edge("a", "c"), edge("b", "d")];
		let next = step(&state, &resolve_links(&state.nodes, &edges), &params);
		let (px, py) = next
			.nodes
			.iter()
			.fold((0.0, 0.0), |(px, py), n| (px + n.vx, py + n.vy));
		assert!(px.abs() < 1e-12, "x momentum {px}");
		assert!(py.abs() < 1e-12, "y momentum {py}");
	}

	#[test]
	fn pure_step_matches_engine_and_leaves_input() {
		let data = sample_data(12);
		let params = ForceParams::default();
		let mut sim = ForceSimulation::seeded(&data, 800.0, 600.0, params, 9);
		let before = sim.state().clone();
		let next = step(&before, sim.links(), &params);
		sim.step();
		assert_eq!(&next, sim.state());
		assert_ne!(next, before);
	}

	#[test]
	fn dangling_edges_are_inert() {
		let params = ForceParams::default();
		let state = SimulationState {
			nodes: vec![node("a", 350.0, 300.0), node("b", 450.0, 280.0)],
			width: 800.0,
			height: 600.0,
		};
		let clean = [edge("a", "b")];
		let dangling = [
			edge("a", "b"),
			edge("a", "ghost"),
			edge("ghost", "b"),
			edge("x", "y"),
		];
		let mut with = ForceSimulation::from_state(state.clone(), &dangling, params);
		let mut without = ForceSimulation::from_state(state, &clean, params);
		assert_eq!(with.links(), &[(0, 1)]);
		for _ in 0..25 {
			with.step();
			without.step();
		}
		assert_eq!(with.state(), without.state());
	}

	#[test]
	fn two_connected_nodes_settle_at_equilibrium() {
		let params = ForceParams::default();
		let state = SimulationState {
			nodes: vec![node("a", 380.0, 300.0), node("b", 420.0, 300.0)],
			width: 800.0,
			height: 600.0,
		};
		let mut sim = ForceSimulation::from_state(state, &[edge("a", "b")], params);
		for _ in 0..1000 {
			sim.step();
		}

		// Each node: repulsion / d² = attraction * d + center_force * d / 2
		let expected =
			(params.repulsion / (params.attraction + params.center_force / 2.0)).cbrt();
		let settled = distance(sim.state());
		assert!((settled - expected).abs() < 1e-3, "{settled} vs {expected}");

		for _ in 0..100 {
			sim.step();
		}
		assert!((distance(sim.state()) - settled).abs() < 1e-6);
	}

	#[test]
	fn empty_graph_steps_are_noops() {
		let mut sim = ForceSimulation::seeded(
			&GraphData::default(),
			800.0,
			600.0,
			ForceParams::default(),
			0,
		);
		let before = sim.state().clone();
		for _ in 0..10 {
			sim.step();
		}
		assert!(sim.state().nodes.is_empty());
		assert_eq!(sim.state(), &before);
	}

	#[test]
	fn coincident_nodes_separate() {
		let params = ForceParams::default();
		let state = SimulationState {
			nodes: vec![node("a", 400.0, 300.0), node("b", 400.0, 300.0)],
			width: 800.0,
			height: 600.0,
		};
		let mut sim = ForceSimulation::from_state(state, &[edge("a", "b")], params);
		sim.step();
		let s = sim.state();
		assert!(s.nodes[0].x < s.nodes[1].x);
		assert!(s.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}

	#[test]
	fn negative_jitter_is_treated_as_its_magnitude() {
		let params = ForceParams {
			jitter: -20.0,
			..ForceParams::default()
		};
		let sim = ForceSimulation::seeded(&sample_data(10), 800.0, 600.0, params, 4);
		for n in &sim.state().nodes {
			assert!((n.x - 400.0).abs() <= 20.0);
			assert!((n.y - 300.0).abs() <= 20.0);
		}
	}

	#[test]
	fn resize_clamps_on_next_step() {
		let params = ForceParams::default();
		let mut sim = ForceSimulation::seeded(&sample_data(8), 800.0, 600.0, params, 5);
		sim.resize(100.0, 100.0);
		sim.step();
		for n in &sim.state().nodes {
			assert!(n.x <= 70.0 && n.y <= 70.0);
		}
	}

	#[test]
	fn restored_snapshot_continues_the_run() {
		let data = sample_data(6);
		let params = ForceParams::default();
		let mut live = ForceSimulation::seeded(&data, 800.0, 600.0, params, 11);
		for _ in 0..20 {
			live.step();
		}

		let json = serde_json::to_string(live.state()).unwrap();
		let snapshot: SimulationState = serde_json::from_str(&json).unwrap();
		let mut restored = ForceSimulation::from_state(snapshot, &data.edges, params);

		for _ in 0..10 {
			live.step();
			restored.step();
		}
		for (a, b) in live.state().nodes.iter().zip(&restored.state().nodes) {
			assert_eq!(a.id, b.id);
			assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
		}
	}
}
