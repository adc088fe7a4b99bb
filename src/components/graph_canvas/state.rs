use std::collections::{HashMap, HashSet};

use log::warn;
use web_sys::HtmlImageElement;

use crate::model::{Projection, ViewNode, apply_search};

pub const NODE_HEIGHT: f64 = 56.0;
pub const MIN_NODE_WIDTH: f64 = 140.0;
pub const AVATAR_RADIUS: f64 = 20.0;
pub const AVATAR_PAD: f64 = 8.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

const LABEL_CHAR_WIDTH: f64 = 10.0;
const FIT_PADDING: f64 = 60.0;
// Screen pixels a press may travel and still count as a click.
const CLICK_SLOP: f64 = 4.0;

/// Width of the pill drawn for `label`.
pub fn node_width(label: &str) -> f64 {
	let text = label.chars().count() as f64 * LABEL_CHAR_WIDTH;
	(AVATAR_PAD * 2.0 + AVATAR_RADIUS * 2.0 + 12.0 + text + 16.0).max(MIN_NODE_WIDTH)
}

/// Keep exactly the `wanted` keys in `cache`, creating missing entries
/// with `load` and dropping the rest.
fn sync_cache<V>(
	cache: &mut HashMap<String, V>,
	wanted: impl IntoIterator<Item = String>,
	mut load: impl FnMut(&str) -> Option<V>,
) {
	let wanted: HashSet<String> = wanted.into_iter().collect();
	cache.retain(|key, _| wanted.contains(key));
	for key in wanted {
		if cache.contains_key(&key) {
			continue;
		}
		if let Some(value) = load(&key) {
			cache.insert(key, value);
		}
	}
}

#[derive(Clone, Debug)]
pub struct CanvasEdge {
	pub source: usize,
	pub target: usize,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct GraphCanvasState {
	pub nodes: Vec<ViewNode>,
	pub edges: Vec<CanvasEdge>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	images: HashMap<String, HtmlImageElement>,
}

impl GraphCanvasState {
	pub fn new(projection: &Projection, query: &str, width: f64, height: f64) -> Self {
		let mut state = Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			flow_time: 0.0,
			images: HashMap::new(),
		};
		state.set_projection(projection, query);
		state
	}

	/// Replace the drawn graph. Positions restart from the projected layout.
	pub fn set_projection(&mut self, projection: &Projection, query: &str) {
		self.nodes = projection.nodes.clone();
		apply_search(&mut self.nodes, query);

		let index: HashMap<&str, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		self.edges = projection
			.edges
			.iter()
			.filter_map(|edge| {
				match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
					(Some(&source), Some(&target)) => Some(CanvasEdge {
						source,
						target,
						label: edge.label.clone(),
					}),
					_ => {
						warn!("edge {} has an unknown endpoint, not drawn", edge.id);
						None
					}
				}
			})
			.collect();

		let wanted = self.nodes.iter().filter_map(|n| n.data.image.clone());
		sync_cache(&mut self.images, wanted, |url| match HtmlImageElement::new() {
			Ok(img) => {
				img.set_src(url);
				Some(img)
			}
			Err(e) => {
				warn!("could not create image element: {e:?}");
				None
			}
		});

		self.drag = DragState::default();
		self.hover = None;
		self.fit_view();
	}

	pub fn set_query(&mut self, query: &str) {
		apply_search(&mut self.nodes, query);
	}

	/// A loaded image for `url`; `None` while loading or when it failed.
	pub fn image(&self, url: &str) -> Option<&HtmlImageElement> {
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}

	pub fn node_size(&self, idx: usize) -> (f64, f64) {
		(node_width(&self.nodes[idx].data.label), NODE_HEIGHT)
	}

	pub fn node_center(&self, idx: usize) -> (f64, f64) {
		let (w, h) = self.node_size(idx);
		let p = self.nodes[idx].position;
		(p.x + w / 2.0, p.y + h / 2.0)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		(0..self.nodes.len()).rev().find(|&idx| {
			let (w, h) = self.node_size(idx);
			let p = self.nodes[idx].position;
			gx >= p.x && gx <= p.x + w && gy >= p.y && gy <= p.y + h
		})
	}

	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		let p = self.nodes[idx].position;
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: p.x,
			node_start_y: p.y,
			moved: false,
		};
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
		if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
			self.drag.moved = true;
		}
		if self.drag.moved {
			let k = self.transform.k;
			let node = &mut self.nodes[idx];
			node.position.x = self.drag.node_start_x + dx / k;
			node.position.y = self.drag.node_start_y + dy / k;
		}
	}

	/// Finish a drag. Returns the id of the node when the press never moved
	/// far enough to count as a drag.
	pub fn end_drag(&mut self) -> Option<String> {
		let clicked = match (self.drag.active, self.drag.node_idx) {
			(true, Some(idx)) if !self.drag.moved => Some(self.nodes[idx].id.clone()),
			_ => None,
		};
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Scale and center so every node is visible, never zooming past 1:1.
	pub fn fit_view(&mut self) {
		if self.nodes.is_empty() {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for idx in 0..self.nodes.len() {
			let (w, h) = self.node_size(idx);
			let p = self.nodes[idx].position;
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x + w);
			max_y = max_y.max(p.y + h);
		}
		let (bw, bh) = (max_x - min_x, max_y - min_y);
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.min(1.0)
			.clamp(MIN_ZOOM, MAX_ZOOM);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (min_x + bw / 2.0) * k,
			y: self.height / 2.0 - (min_y + bh / 2.0) * k,
			k,
		};
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn image_cache_follows_the_current_projection() {
		let mut cache = HashMap::new();
		let mut loads = Vec::new();
		sync_cache(&mut cache, ["a.png".to_string(), "b.png".to_string()], |url| {
			loads.push(url.to_string());
			Some(url.len())
		});
		assert_eq!(cache.len(), 2);

		sync_cache(&mut cache, ["b.png".to_string(), "c.png".to_string()], |url| {
			loads.push(url.to_string());
			Some(url.len())
		});
		assert!(!cache.contains_key("a.png"));
		assert!(cache.contains_key("b.png"));
		assert!(cache.contains_key("c.png"));
		loads.sort();
		assert_eq!(loads, vec!["a.png", "b.png", "c.png"]);

		sync_cache(&mut cache, Vec::<String>::new(), |_| Some(0));
		assert!(cache.is_empty());
	}

	#[test]
	fn failed_loads_are_retried_next_time() {
		let mut cache: HashMap<String, u8> = HashMap::new();
		sync_cache(&mut cache, ["a.png".to_string()], |_| None);
		assert!(cache.is_empty());
		sync_cache(&mut cache, ["a.png".to_string()], |_| Some(1));
		assert_eq!(cache.get("a.png"), Some(&1));
	}
}
