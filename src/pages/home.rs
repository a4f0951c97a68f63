use leptos::prelude::*;

use crate::components::diagram::{
	Connection, DiagramCanvas, EdgeChange, EdgeOptions, FlowEdge, FlowNode, NodeChange, NodeData,
	Position, ResourceType, add_edge, apply_edge_changes, apply_node_changes,
};

/// Seed diagram: three EC2 instances and a load balancer, unconnected.
pub fn initial_nodes() -> Vec<FlowNode> {
	vec![
		FlowNode::new(
			"ec2-1",
			NodeData::new("EC2 server", ResourceType::Ec2),
			Position::new(5.0, 5.0),
		),
		FlowNode::new(
			"ec2-2",
			NodeData::new("EC2 server", ResourceType::Ec2),
			Position::new(5.0, 5.0),
		),
		FlowNode::new(
			"ec2-3",
			NodeData::new("EC2 server", ResourceType::Ec2),
			Position::new(5.0, 5.0),
		),
		FlowNode::new(
			"alb-1",
			NodeData::new("ALB", ResourceType::Alb),
			Position::new(5.0, 200.0),
		),
	]
}

pub fn initial_edges() -> Vec<FlowEdge> {
	Vec::new()
}

/// Default Home Page: the diagram surface. Owns the node and edge
/// collections and applies the change batches the canvas emits.
#[component]
pub fn Home() -> impl IntoView {
	let (nodes, set_nodes) = signal(initial_nodes());
	let (edges, set_edges) = signal(initial_edges());

	let on_nodes_change = move |changes: Vec<NodeChange>| {
		set_nodes.update(|nodes| apply_node_changes(nodes, &changes));
	};
	let on_edges_change = move |changes: Vec<EdgeChange>| {
		set_edges.update(|edges| apply_edge_changes(edges, &changes));
	};
	let on_connect = move |connection: Connection| {
		set_edges.update(|edges| add_edge(edges, connection, &EdgeOptions::default()));
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-diagram">
				<DiagramCanvas
					nodes=nodes
					edges=edges
					on_nodes_change=on_nodes_change
					on_edges_change=on_edges_change
					on_connect=on_connect
					on_node_drag=Callback::new(|node: FlowNode| {
						log::debug!("drag event: {}", node.data.label);
					})
					fullscreen=true
				/>
				<div class="diagram-overlay">
					<h1>"Cloud Architecture Diagram"</h1>
					<p class="subtitle">
						"Drag resources to arrange. Drag from a handle to connect. Scroll to zoom."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn initial_diagram_is_three_ec2_and_one_alb_with_no_edges() {
		let nodes = initial_nodes();
		assert_eq!(nodes.len(), 4);
		assert_eq!(
			nodes
				.iter()
				.filter(|n| n.data.resource_type == ResourceType::Ec2)
				.count(),
			3
		);
		assert_eq!(
			nodes
				.iter()
				.filter(|n| n.data.resource_type == ResourceType::Alb)
				.count(),
			1
		);
		assert!(nodes.iter().all(|n| !n.selected));
		assert!(initial_edges().is_empty());
	}
}
