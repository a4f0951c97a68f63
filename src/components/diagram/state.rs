//! View and gesture state for the diagram canvas.
//!
//! Everything here is plain geometry over the node/edge collections, with no
//! `web-sys` types, so the gesture logic is testable off the browser.

use super::types::{FlowEdge, FlowNode, HandleSide, Position};

/// Node box size in world units. Boxes are fixed-size; labels ellipsize.
pub const NODE_WIDTH: f64 = 140.0;
pub const NODE_HEIGHT: f64 = 96.0;

/// Visual radius of a source handle dot.
pub const HANDLE_RADIUS: f64 = 5.0;
/// Grab radius around a handle anchor. World-space, scales with zoom like
/// the node boxes themselves.
pub const HANDLE_HIT_RADIUS: f64 = 10.0;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
/// Fit-view never zooms in past 2x, matching the host library's default.
const FIT_MAX_ZOOM: f64 = 2.0;

/// Pan/zoom transform from world to screen coordinates.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

/// An in-flight node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
}

/// An in-flight background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// An in-flight connection gesture: pressed on a source handle, rubber-band
/// follows the cursor until released on (or off) a target handle.
#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	pub source: Option<(String, HandleSide)>,
	/// Cursor position in world coordinates, for the preview line.
	pub cursor: Position,
}

impl ConnectState {
	pub fn active(&self) -> bool {
		self.source.is_some()
	}
}

const EDGE_HIT_DISTANCE: f64 = 6.0;

fn segment_distance(a: Position, b: Position, px: f64, py: f64) -> f64 {
	let (abx, aby) = (b.x - a.x, b.y - a.y);
	let len_sq = abx * abx + aby * aby;
	let t = if len_sq > 0.0 {
		(((px - a.x) * abx + (py - a.y) * aby) / len_sq).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let (cx, cy) = (a.x + t * abx, a.y + t * aby);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Anchor point of a side's handles: the midpoint of that side of the box.
/// Source and target handles share this anchor.
pub fn handle_anchor(node: &FlowNode, side: HandleSide) -> Position {
	let Position { x, y } = node.position;
	match side {
		HandleSide::Top => Position::new(x + NODE_WIDTH / 2.0, y),
		HandleSide::Bottom => Position::new(x + NODE_WIDTH / 2.0, y + NODE_HEIGHT),
		HandleSide::Left => Position::new(x, y + NODE_HEIGHT / 2.0),
		HandleSide::Right => Position::new(x + NODE_WIDTH, y + NODE_HEIGHT / 2.0),
	}
}

pub struct DiagramState {
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: ConnectState,
	pub width: f64,
	pub height: f64,
	/// Accumulated frame time driving the animated edge dash.
	pub flow_time: f64,
	/// Set once the initial fit-view has run against a non-empty collection.
	pub fitted: bool,
	pub fit_padding: f64,
}

impl DiagramState {
	pub fn new(width: f64, height: f64, fit_padding: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			connect: ConnectState::default(),
			width,
			height,
			flow_time: 0.0,
			fitted: false,
			fit_padding,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose box contains the screen point. Nodes are drawn in
	/// insertion order, so the last match is the one on top.
	pub fn node_at_position<'a>(
		&self,
		nodes: &'a [FlowNode],
		sx: f64,
		sy: f64,
	) -> Option<&'a FlowNode> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		nodes.iter().rev().find(|node| {
			let Position { x, y } = node.position;
			gx >= x && gx <= x + NODE_WIDTH && gy >= y && gy <= y + NODE_HEIGHT
		})
	}

	/// Handle anchor under the screen point, if any. Both the visible source
	/// handle and the invisible target handle of a side share one anchor; the
	/// gesture phase decides which kind the hit means.
	pub fn handle_at_position<'a>(
		&self,
		nodes: &'a [FlowNode],
		sx: f64,
		sy: f64,
	) -> Option<(&'a FlowNode, HandleSide)> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		nodes.iter().rev().find_map(|node| {
			HandleSide::ALL.into_iter().find_map(|side| {
				let anchor = handle_anchor(node, side);
				let (dx, dy) = (anchor.x - gx, anchor.y - gy);
				((dx * dx + dy * dy).sqrt() < HANDLE_HIT_RADIUS).then_some((node, side))
			})
		})
	}

	/// First edge passing within grab distance of the screen point.
	pub fn edge_at_position<'a>(
		&self,
		nodes: &[FlowNode],
		edges: &'a [FlowEdge],
		sx: f64,
		sy: f64,
	) -> Option<&'a FlowEdge> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		edges.iter().find(|edge| {
			let (Some(source), Some(target)) = (
				nodes.iter().find(|n| n.id == edge.source),
				nodes.iter().find(|n| n.id == edge.target),
			) else {
				return false;
			};
			let from = handle_anchor(source, edge.source_handle.side);
			let to = handle_anchor(target, edge.target_handle.side);
			segment_distance(from, to, gx, gy) < EDGE_HIT_DISTANCE
		})
	}

	/// Fit the bounding box of all nodes into the viewport, leaving
	/// `fit_padding` (a fraction of the box size) on every side.
	pub fn fit_view(&mut self, nodes: &[FlowNode]) {
		if nodes.is_empty() {
			return;
		}
		let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
		let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
		for node in nodes {
			min_x = min_x.min(node.position.x);
			min_y = min_y.min(node.position.y);
			max_x = max_x.max(node.position.x + NODE_WIDTH);
			max_y = max_y.max(node.position.y + NODE_HEIGHT);
		}
		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let pad = 1.0 + 2.0 * self.fit_padding;
		let k = (self.width / (bw * pad))
			.min(self.height / (bh * pad))
			.clamp(MIN_ZOOM, FIT_MAX_ZOOM);

		self.transform.k = k;
		self.transform.x = self.width / 2.0 - k * (min_x + bw / 2.0);
		self.transform.y = self.height / 2.0 - k * (min_y + bh / 2.0);
	}

	/// Zoom by `factor` about the screen point `(cx, cy)`, which stays fixed.
	pub fn zoom_by(&mut self, factor: f64, cx: f64, cy: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = cx - (cx - self.transform.x) * ratio;
		self.transform.y = cy - (cy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn cancel_gestures(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.connect = ConnectState::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::types::{NodeData, ResourceType};

	fn node(id: &str, x: f64, y: f64) -> FlowNode {
		FlowNode::new(
			id,
			NodeData::new("EC2 server", ResourceType::Ec2),
			Position::new(x, y),
		)
	}

	#[test]
	fn each_node_exposes_four_side_anchors() {
		let n = node("a", 100.0, 50.0);
		assert_eq!(
			handle_anchor(&n, HandleSide::Top),
			Position::new(100.0 + NODE_WIDTH / 2.0, 50.0)
		);
		assert_eq!(
			handle_anchor(&n, HandleSide::Bottom),
			Position::new(100.0 + NODE_WIDTH / 2.0, 50.0 + NODE_HEIGHT)
		);
		assert_eq!(
			handle_anchor(&n, HandleSide::Left),
			Position::new(100.0, 50.0 + NODE_HEIGHT / 2.0)
		);
		assert_eq!(
			handle_anchor(&n, HandleSide::Right),
			Position::new(100.0 + NODE_WIDTH, 50.0 + NODE_HEIGHT / 2.0)
		);
	}

	#[test]
	fn node_hit_testing_prefers_the_topmost_node() {
		let state = DiagramState::new(800.0, 600.0, 0.2);
		let nodes = vec![node("under", 0.0, 0.0), node("over", 20.0, 20.0)];

		// Overlap region: both boxes contain (30, 30); the later node wins.
		let hit = state.node_at_position(&nodes, 30.0, 30.0).unwrap();
		assert_eq!(hit.id, "over");

		let hit = state.node_at_position(&nodes, 5.0, 5.0).unwrap();
		assert_eq!(hit.id, "under");

		assert!(state.node_at_position(&nodes, 500.0, 500.0).is_none());
	}

	#[test]
	fn handle_hit_testing_respects_the_view_transform() {
		let mut state = DiagramState::new(800.0, 600.0, 0.2);
		state.transform = ViewTransform {
			x: 50.0,
			y: -20.0,
			k: 2.0,
		};
		let nodes = vec![node("a", 10.0, 10.0)];

		let anchor = handle_anchor(&nodes[0], HandleSide::Right);
		let (sx, sy) = (
			anchor.x * state.transform.k + state.transform.x,
			anchor.y * state.transform.k + state.transform.y,
		);
		let (hit, side) = state.handle_at_position(&nodes, sx, sy).unwrap();
		assert_eq!(hit.id, "a");
		assert_eq!(side, HandleSide::Right);

		// Just beyond the grab radius (world-space) misses.
		let off = (HANDLE_HIT_RADIUS + 1.0) * state.transform.k;
		assert!(state.handle_at_position(&nodes, sx + off, sy).is_none());
	}

	#[test]
	fn edge_hit_testing_follows_the_handle_anchors() {
		use crate::components::diagram::types::{FlowEdge, HandleId};

		let state = DiagramState::new(800.0, 600.0, 0.2);
		let nodes = vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)];
		let edges = vec![FlowEdge {
			id: "e1".into(),
			source: "a".into(),
			target: "b".into(),
			source_handle: HandleId::source(HandleSide::Right),
			target_handle: HandleId::target(HandleSide::Left),
			animated: true,
			selected: false,
		}];

		// The edge runs horizontally between the facing side midpoints.
		let y = NODE_HEIGHT / 2.0;
		let hit = state.edge_at_position(&nodes, &edges, 220.0, y + 2.0);
		assert_eq!(hit.map(|e| e.id.as_str()), Some("e1"));
		assert!(state.edge_at_position(&nodes, &edges, 220.0, y + 50.0).is_none());

		// A dangling edge is never hit.
		let nodes = vec![node("b", 300.0, 0.0)];
		assert!(state.edge_at_position(&nodes, &edges, 220.0, y).is_none());
	}

	#[test]
	fn fit_view_centers_bounds_with_padding() {
		let mut state = DiagramState::new(1000.0, 800.0, 0.2);
		let nodes = vec![node("a", 0.0, 0.0), node("b", 400.0, 300.0)];
		state.fit_view(&nodes);

		let (bw, bh) = (400.0 + NODE_WIDTH, 300.0 + NODE_HEIGHT);
		let k = state.transform.k;
		// The padded bounds fit the viewport in both dimensions.
		assert!(k * bw * 1.4 <= 1000.0 + 1e-9);
		assert!(k * bh * 1.4 <= 800.0 + 1e-9);
		// At least one dimension is tight against the padded viewport.
		assert!((k * bw * 1.4 - 1000.0).abs() < 1e-9 || (k * bh * 1.4 - 800.0).abs() < 1e-9);

		// The bounds center lands on the viewport center.
		let (cx, cy) = (bw / 2.0, bh / 2.0);
		assert!((cx * k + state.transform.x - 500.0).abs() < 1e-9);
		assert!((cy * k + state.transform.y - 400.0).abs() < 1e-9);
	}

	#[test]
	fn fit_view_caps_zoom_for_tiny_diagrams() {
		let mut state = DiagramState::new(2000.0, 2000.0, 0.2);
		state.fit_view(&[node("a", 0.0, 0.0)]);
		assert!(state.transform.k <= FIT_MAX_ZOOM);
	}

	#[test]
	fn zoom_keeps_the_anchor_point_fixed() {
		let mut state = DiagramState::new(800.0, 600.0, 0.2);
		let (before_x, before_y) = state.screen_to_graph(300.0, 200.0);
		state.zoom_by(1.1, 300.0, 200.0);
		let (after_x, after_y) = state.screen_to_graph(300.0, 200.0);
		assert!((before_x - after_x).abs() < 1e-9);
		assert!((before_y - after_y).abs() < 1e-9);

		// Zoom saturates at the clamp bounds.
		for _ in 0..100 {
			state.zoom_by(1.5, 300.0, 200.0);
		}
		assert!((state.transform.k - MAX_ZOOM).abs() < 1e-9);
	}
}
