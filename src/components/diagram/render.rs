//! Canvas drawing for the diagram: background grid, edges, node boxes and
//! their connection handles.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::icons::IconCache;
use super::state::{DiagramState, HANDLE_RADIUS, NODE_HEIGHT, NODE_WIDTH, handle_anchor};
use super::types::{FlowEdge, FlowNode, HandleSide, Position};

const BACKGROUND: &str = "#0f172a";
const GRID_DOT: &str = "rgba(148, 163, 184, 0.35)";
const NODE_FILL: &str = "#1e293b";
const NODE_BORDER: &str = "#475569";
const NODE_BORDER_SELECTED: &str = "#94a3b8";
const LABEL_COLOR: &str = "#e2e8f0";
const ACCENT: &str = "rgb(100, 180, 255)";

const GRID_SPACING: f64 = 24.0;
const ICON_SIZE: f64 = 40.0;
const CORNER_RADIUS: f64 = 8.0;

pub fn render(
	state: &DiagramState,
	nodes: &[FlowNode],
	edges: &[FlowEdge],
	icons: &mut IconCache,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_grid(state, ctx);
	draw_edges(state, nodes, edges, ctx);
	draw_connect_preview(state, nodes, ctx);
	draw_nodes(nodes, icons, ctx);
	ctx.restore();
}

/// Dot grid in world space, so it pans and zooms with the diagram. Spacing
/// doubles until dots are at least ~12 screen pixels apart, which also bounds
/// the dot count when zoomed far out.
fn draw_grid(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let mut spacing = GRID_SPACING;
	while spacing * k < 12.0 {
		spacing *= 2.0;
	}

	let (left, top) = state.screen_to_graph(0.0, 0.0);
	let (right, bottom) = state.screen_to_graph(state.width, state.height);

	ctx.set_fill_style_str(GRID_DOT);
	let mut x = (left / spacing).floor() * spacing;
	while x <= right {
		let mut y = (top / spacing).floor() * spacing;
		while y <= bottom {
			ctx.begin_path();
			let _ = ctx.arc(x, y, 1.5, 0.0, 2.0 * PI);
			ctx.fill();
			y += spacing;
		}
		x += spacing;
	}
}

fn find_node<'a>(nodes: &'a [FlowNode], id: &str) -> Option<&'a FlowNode> {
	nodes.iter().find(|n| n.id == id)
}

fn draw_edges(
	state: &DiagramState,
	nodes: &[FlowNode],
	edges: &[FlowEdge],
	ctx: &CanvasRenderingContext2d,
) {
	let (dash, gap, arrow_size) = (8.0, 4.0, 9.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for edge in edges {
		// A removed endpoint leaves the edge in the collection; it simply
		// stops rendering until an edge change cleans it up.
		let (Some(source), Some(target)) =
			(find_node(nodes, &edge.source), find_node(nodes, &edge.target))
		else {
			continue;
		};
		let from = handle_anchor(source, edge.source_handle.side);
		let to = handle_anchor(target, edge.target_handle.side);
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let (alpha, width) = if edge.selected { (1.0, 2.5) } else { (0.7, 1.5) };
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		ctx.set_line_width(width);
		if edge.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x - ux * arrow_size, to.y - uy * arrow_size);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		let (back_x, back_y) = (to.x - ux * arrow_size, to.y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(to.x, to.y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

/// Rubber-band from the pressed source handle to the cursor.
fn draw_connect_preview(state: &DiagramState, nodes: &[FlowNode], ctx: &CanvasRenderingContext2d) {
	let Some((ref source_id, side)) = state.connect.source else {
		return;
	};
	let Some(source) = find_node(nodes, source_id) else {
		return;
	};
	let from = handle_anchor(source, side);
	let Position { x: cx, y: cy } = state.connect.cursor;

	ctx.set_stroke_style_str(ACCENT);
	ctx.set_line_width(1.5);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(5.0),
		&JsValue::from_f64(4.0),
	));
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(cx, cy);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.begin_path();
	let _ = ctx.arc(cx, cy, 3.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(ACCENT);
	ctx.fill();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(nodes: &[FlowNode], icons: &mut IconCache, ctx: &CanvasRenderingContext2d) {
	for node in nodes {
		let Position { x, y } = node.position;

		rounded_rect(ctx, x, y, NODE_WIDTH, NODE_HEIGHT, CORNER_RADIUS);
		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill();
		ctx.set_stroke_style_str(if node.selected {
			NODE_BORDER_SELECTED
		} else {
			NODE_BORDER
		});
		ctx.set_line_width(2.0);
		ctx.stroke();

		let icon_x = x + (NODE_WIDTH - ICON_SIZE) / 2.0;
		let icon_y = y + 14.0;
		match icons.get(&node.data.icon) {
			Some(image) => {
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					image, icon_x, icon_y, ICON_SIZE, ICON_SIZE,
				);
			}
			// Badge placeholder until the icon image has decoded.
			None => {
				rounded_rect(ctx, icon_x, icon_y, ICON_SIZE, ICON_SIZE, 6.0);
				ctx.set_fill_style_str(NODE_BORDER);
				ctx.fill();
				ctx.set_fill_style_str(LABEL_COLOR);
				ctx.set_font("700 11px sans-serif");
				ctx.set_text_align("center");
				ctx.set_text_baseline("middle");
				let _ = ctx.fill_text(
					node.data.resource_type.badge(),
					icon_x + ICON_SIZE / 2.0,
					icon_y + ICON_SIZE / 2.0,
				);
			}
		}

		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font("600 13px sans-serif");
		ctx.set_text_align("center");
		ctx.set_text_baseline("alphabetic");
		let _ = ctx.fill_text(&node.data.label, x + NODE_WIDTH / 2.0, y + NODE_HEIGHT - 14.0);

		// One visible source handle per side. Each side's target handle
		// shares the anchor at zero opacity: connectable, never drawn.
		for side in HandleSide::ALL {
			let anchor = handle_anchor(node, side);
			ctx.begin_path();
			let _ = ctx.arc(anchor.x, anchor.y, HANDLE_RADIUS, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(ACCENT);
			ctx.fill();
			ctx.set_stroke_style_str(NODE_FILL);
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
	}
}
