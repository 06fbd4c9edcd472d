use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgeSegment, NodeSprite, Scene};
use super::viewport::Transform;
use crate::config::NodeStyle;

pub fn render(
	scene: &Scene,
	transform: &Transform,
	style: &NodeStyle,
	width: f64,
	height: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
	ctx.set_fill_style_str(&style.background);
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let _ = ctx.set_transform(
		transform.scale,
		0.0,
		0.0,
		transform.scale,
		transform.tx,
		transform.ty,
	);
	draw_edges(&scene.edges, transform.scale, style, ctx);
	draw_nodes(&scene.nodes, transform.scale, ctx);
	ctx.restore();
}

fn draw_edges(edges: &[EdgeSegment], k: f64, style: &NodeStyle, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(&style.edge_color);
	ctx.set_line_width(1.5 / k);
	ctx.begin_path();
	for edge in edges {
		ctx.move_to(edge.from.0, edge.from.1);
		ctx.line_to(edge.to.0, edge.to.1);
	}
	ctx.stroke();
}

fn draw_nodes(nodes: &[NodeSprite], k: f64, ctx: &CanvasRenderingContext2d) {
	// labels stay readable at any zoom
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));

	for node in nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();

		if !node.label.is_empty() {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
			let _ = ctx.fill_text(node.label, node.x + node.radius + 3.0, node.y + 3.0);
		}
	}
}
