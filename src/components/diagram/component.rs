use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::changes::{Connection, EdgeChange, NodeChange};
use super::icons::IconCache;
use super::render;
use super::state::DiagramState;
use super::types::{FlowEdge, FlowNode, HandleId, Position};

/// Interactive diagram canvas.
///
/// The component owns only view and gesture state. The node and edge
/// collections stay with the caller, which applies the change batches this
/// component emits; the canvas re-reads the signals every animation frame.
#[component]
pub fn DiagramCanvas(
	#[prop(into)] nodes: Signal<Vec<FlowNode>>,
	#[prop(into)] edges: Signal<Vec<FlowEdge>>,
	#[prop(into)] on_nodes_change: Callback<Vec<NodeChange>>,
	#[prop(into)] on_edges_change: Callback<Vec<EdgeChange>>,
	#[prop(into)] on_connect: Callback<Connection>,
	/// Fired with the node's updated state on every drag step.
	#[prop(optional, into)]
	on_node_drag: Option<Callback<FlowNode>>,
	/// Fraction of the node bounds left free on each side by the initial fit.
	#[prop(default = 0.2)]
	fit_view_padding: f64,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<DiagramState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(DiagramState::new(w, h, fit_view_padding));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut icons = IconCache::new();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				let (nodes_now, edges_now) = (nodes.get_untracked(), edges.get_untracked());
				if !s.fitted && !nodes_now.is_empty() {
					s.fit_view(&nodes_now);
					s.fitted = true;
				}
				render::render(s, &nodes_now, &edges_now, &mut icons, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let (nodes_now, edges_now) = (nodes.get_untracked(), edges.get_untracked());

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some((node, side)) = s.handle_at_position(&nodes_now, x, y) {
				let (gx, gy) = s.screen_to_graph(x, y);
				s.connect.source = Some((node.id.clone(), side));
				s.connect.cursor = Position::new(gx, gy);
			} else if let Some(node) = s.node_at_position(&nodes_now, x, y) {
				s.drag.active = true;
				s.drag.node_id = Some(node.id.clone());
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.drag.node_start = node.position;

				let mut changes = Vec::new();
				if !node.selected {
					changes.push(NodeChange::Select {
						id: node.id.clone(),
						selected: true,
					});
				}
				for other in nodes_now.iter().filter(|n| n.selected && n.id != node.id) {
					changes.push(NodeChange::Select {
						id: other.id.clone(),
						selected: false,
					});
				}
				if !changes.is_empty() {
					on_nodes_change.run(changes);
				}
			} else if let Some(edge) = s.edge_at_position(&nodes_now, &edges_now, x, y) {
				let mut changes = vec![EdgeChange::Select {
					id: edge.id.clone(),
					selected: true,
				}];
				for other in edges_now.iter().filter(|e| e.selected && e.id != edge.id) {
					changes.push(EdgeChange::Select {
						id: other.id.clone(),
						selected: false,
					});
				}
				on_edges_change.run(changes);
			} else {
				let deselect: Vec<NodeChange> = nodes_now
					.iter()
					.filter(|n| n.selected)
					.map(|n| NodeChange::Select {
						id: n.id.clone(),
						selected: false,
					})
					.collect();
				if !deselect.is_empty() {
					on_nodes_change.run(deselect);
				}
				let deselect: Vec<EdgeChange> = edges_now
					.iter()
					.filter(|e| e.selected)
					.map(|e| EdgeChange::Select {
						id: e.id.clone(),
						selected: false,
					})
					.collect();
				if !deselect.is_empty() {
					on_edges_change.run(deselect);
				}

				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.connect.active() {
				let (gx, gy) = s.screen_to_graph(x, y);
				s.connect.cursor = Position::new(gx, gy);
			} else if s.drag.active {
				if let Some(id) = s.drag.node_id.clone() {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let position =
						Position::new(s.drag.node_start.x + dx, s.drag.node_start.y + dy);
					on_nodes_change.run(vec![NodeChange::Position {
						id: id.clone(),
						position,
					}]);
					if let Some(cb) = on_node_drag {
						let nodes_now = nodes.get_untracked();
						if let Some(node) = nodes_now.iter().find(|n| n.id == id) {
							let mut node = node.clone();
							node.position = position;
							cb.run(node);
						}
					}
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let Some((source_id, source_side)) = s.connect.source.take() {
				let nodes_now = nodes.get_untracked();
				if let Some((target, target_side)) = s.handle_at_position(&nodes_now, x, y) {
					// Releasing on the handle the gesture started from is an
					// abandoned gesture, not a self-loop.
					if target.id != source_id || target_side != source_side {
						on_connect.run(Connection {
							source: source_id,
							target: target.id.clone(),
							source_handle: HandleId::source(source_side),
							target_handle: HandleId::target(target_side),
						});
					}
				}
			}
			s.drag.active = false;
			s.drag.node_id = None;
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_gestures();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_by(factor, x, y);
		}
	};

	let state_zi = state.clone();
	let zoom_in = move |_| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			let (cx, cy) = (s.width / 2.0, s.height / 2.0);
			s.zoom_by(1.2, cx, cy);
		}
	};
	let state_zo = state.clone();
	let zoom_out = move |_| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			let (cx, cy) = (s.width / 2.0, s.height / 2.0);
			s.zoom_by(1.0 / 1.2, cx, cy);
		}
	};
	let state_fit = state.clone();
	let fit = move |_| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			// The animation loop refits on its next frame.
			s.fitted = false;
		}
	};

	view! {
		<div class="diagram-canvas-wrap">
			<canvas
				node_ref=canvas_ref
				class="diagram-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="diagram-controls">
				<button on:click=zoom_in title="Zoom in">"+"</button>
				<button on:click=zoom_out title="Zoom out">"-"</button>
				<button on:click=fit title="Fit view">"><"</button>
			</div>
		</div>
	}
}
