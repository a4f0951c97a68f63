mod changes;
mod component;
mod icons;
mod render;
mod state;
mod types;

pub use changes::{
	Connection, EdgeChange, EdgeOptions, NodeChange, add_edge, apply_edge_changes,
	apply_node_changes,
};
pub use component::DiagramCanvas;
pub use types::{
	FlowEdge, FlowNode, HandleId, HandleKind, HandleSide, NodeData, Position, ResourceType,
};
