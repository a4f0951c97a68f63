//! Change deltas produced by diagram gestures, and the helpers that apply
//! them to the node/edge collections.
//!
//! Application is deliberately validation-free: every change reaching these
//! functions was produced by a gesture over the current collections, so an
//! unknown id is silently ignored rather than treated as an error.

use super::types::{FlowEdge, FlowNode, HandleId, Position};

/// A single delta to the node collection.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	/// Absolute position update, emitted continuously while dragging.
	Position { id: String, position: Position },
	/// Selection toggle.
	Select { id: String, selected: bool },
	/// Removal of the node itself. Edges referencing it are left in place;
	/// the renderer skips edges whose endpoints no longer resolve.
	Remove { id: String },
}

/// A single delta to the edge collection.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	Select { id: String, selected: bool },
	Remove { id: String },
}

/// A candidate connection between two handles, produced by a completed
/// connection gesture. Turned into an edge by [`add_edge`].
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub source: String,
	pub target: String,
	pub source_handle: HandleId,
	pub target_handle: HandleId,
}

/// Visual defaults applied to edges created from connections.
#[derive(Clone, Copy, Debug)]
pub struct EdgeOptions {
	pub animated: bool,
}

impl Default for EdgeOptions {
	fn default() -> Self {
		Self { animated: true }
	}
}

/// Apply a batch of node deltas in order.
pub fn apply_node_changes(nodes: &mut Vec<FlowNode>, changes: &[NodeChange]) {
	for change in changes {
		match change {
			NodeChange::Position { id, position } => {
				if let Some(node) = nodes.iter_mut().find(|n| &n.id == id) {
					node.position = *position;
				}
			}
			NodeChange::Select { id, selected } => {
				if let Some(node) = nodes.iter_mut().find(|n| &n.id == id) {
					node.selected = *selected;
				}
			}
			NodeChange::Remove { id } => {
				nodes.retain(|n| &n.id != id);
			}
		}
	}
}

/// Apply a batch of edge deltas in order.
pub fn apply_edge_changes(edges: &mut Vec<FlowEdge>, changes: &[EdgeChange]) {
	for change in changes {
		match change {
			EdgeChange::Select { id, selected } => {
				if let Some(edge) = edges.iter_mut().find(|e| &e.id == id) {
					edge.selected = *selected;
				}
			}
			EdgeChange::Remove { id } => {
				edges.retain(|e| &e.id != id);
			}
		}
	}
}

/// Append the edge described by `connection`. Always succeeds; no duplicate
/// or cycle checking. The id is derived from the endpoints and handles, so
/// repeating an identical connection repeats the id.
pub fn add_edge(edges: &mut Vec<FlowEdge>, connection: Connection, options: &EdgeOptions) {
	let Connection {
		source,
		target,
		source_handle,
		target_handle,
	} = connection;
	let id = format!("edge__{source}{source_handle}-{target}{target_handle}");
	edges.push(FlowEdge {
		id,
		source,
		target,
		source_handle,
		target_handle,
		animated: options.animated,
		selected: false,
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::types::{HandleSide, NodeData, ResourceType};

	fn node(id: &str, x: f64, y: f64) -> FlowNode {
		FlowNode::new(
			id,
			NodeData::new("EC2 server", ResourceType::Ec2),
			Position::new(x, y),
		)
	}

	#[test]
	fn drag_deltas_accumulate_and_preserve_node_count() {
		let mut nodes = vec![node("a", 5.0, 5.0), node("b", 5.0, 200.0)];
		let deltas = [(10.0, 0.0), (-3.0, 4.0), (0.5, 0.5)];

		// A drag emits absolute positions: start plus the running delta.
		let (mut dx, mut dy) = (0.0, 0.0);
		for (step_x, step_y) in deltas {
			dx += step_x;
			dy += step_y;
			apply_node_changes(
				&mut nodes,
				&[NodeChange::Position {
					id: "a".into(),
					position: Position::new(5.0 + dx, 5.0 + dy),
				}],
			);
		}

		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].position, Position::new(12.5, 9.5));
		assert_eq!(nodes[1].position, Position::new(5.0, 200.0));
	}

	#[test]
	fn selection_changes_apply_per_node() {
		let mut nodes = vec![node("a", 0.0, 0.0), node("b", 0.0, 0.0)];
		apply_node_changes(
			&mut nodes,
			&[
				NodeChange::Select {
					id: "a".into(),
					selected: true,
				},
				NodeChange::Select {
					id: "b".into(),
					selected: false,
				},
			],
		);
		assert!(nodes[0].selected);
		assert!(!nodes[1].selected);
	}

	#[test]
	fn unknown_ids_are_ignored() {
		let mut nodes = vec![node("a", 1.0, 2.0)];
		apply_node_changes(
			&mut nodes,
			&[NodeChange::Position {
				id: "ghost".into(),
				position: Position::new(9.0, 9.0),
			}],
		);
		assert_eq!(nodes[0].position, Position::new(1.0, 2.0));
	}

	#[test]
	fn connect_appends_exactly_one_edge() {
		let mut edges = Vec::new();
		add_edge(
			&mut edges,
			Connection {
				source: "a".into(),
				target: "b".into(),
				source_handle: HandleId::source(HandleSide::Right),
				target_handle: HandleId::target(HandleSide::Left),
			},
			&EdgeOptions::default(),
		);

		assert_eq!(edges.len(), 1);
		let edge = &edges[0];
		assert_eq!(edge.source, "a");
		assert_eq!(edge.target, "b");
		assert_eq!(edge.source_handle.to_string(), "right-source");
		assert_eq!(edge.target_handle.to_string(), "left-target");
		assert!(edge.animated);
		assert!(!edge.id.is_empty());
	}

	#[test]
	fn edge_ids_distinguish_handles() {
		let mut edges = Vec::new();
		for side in [HandleSide::Right, HandleSide::Top] {
			add_edge(
				&mut edges,
				Connection {
					source: "a".into(),
					target: "b".into(),
					source_handle: HandleId::source(side),
					target_handle: HandleId::target(HandleSide::Left),
				},
				&EdgeOptions::default(),
			);
		}
		assert_ne!(edges[0].id, edges[1].id);
	}

	#[test]
	fn removing_a_node_leaves_its_edges_in_place() {
		let mut nodes = vec![node("a", 0.0, 0.0), node("b", 0.0, 100.0)];
		let mut edges = Vec::new();
		add_edge(
			&mut edges,
			Connection {
				source: "a".into(),
				target: "b".into(),
				source_handle: HandleId::source(HandleSide::Bottom),
				target_handle: HandleId::target(HandleSide::Top),
			},
			&EdgeOptions::default(),
		);

		apply_node_changes(&mut nodes, &[NodeChange::Remove { id: "a".into() }]);

		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].id, "b");
		// No cascade: the dangling edge stays until an edge change removes it.
		assert_eq!(edges.len(), 1);
	}

	#[test]
	fn edge_changes_select_and_remove() {
		let mut edges = Vec::new();
		add_edge(
			&mut edges,
			Connection {
				source: "a".into(),
				target: "b".into(),
				source_handle: HandleId::source(HandleSide::Right),
				target_handle: HandleId::target(HandleSide::Left),
			},
			&EdgeOptions { animated: false },
		);
		let id = edges[0].id.clone();
		assert!(!edges[0].animated);

		apply_edge_changes(
			&mut edges,
			&[EdgeChange::Select {
				id: id.clone(),
				selected: true,
			}],
		);
		assert!(edges[0].selected);

		apply_edge_changes(&mut edges, &[EdgeChange::Remove { id }]);
		assert!(edges.is_empty());
	}
}
