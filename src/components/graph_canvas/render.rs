use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{AVATAR_PAD, AVATAR_RADIUS, GraphCanvasState};
use crate::model::NodeClass;

const BACKGROUND: &str = "#faf3e0";
const TEXT_MAIN: &str = "#3d405b";
const PERSON_COLOR: &str = "#3d5a80";
const ANIMAL_COLOR: &str = "#e07a5f";
const ACCENT: &str = "#f2cc8f";
const FONT: &str = "Nunito, sans-serif";

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	for idx in 0..state.nodes.len() {
		draw_node(state, ctx, idx);
	}
	draw_edge_labels(state, ctx);
	ctx.restore();
}

fn class_color(class: NodeClass) -> &'static str {
	match class {
		NodeClass::Person => PERSON_COLOR,
		NodeClass::Animal => ANIMAL_COLOR,
	}
}

/// Point where the ray from the center along `(ux, uy)` leaves a `w`×`h` box.
fn border_offset(w: f64, h: f64, ux: f64, uy: f64) -> f64 {
	let tx = if ux.abs() > 1e-9 { (w / 2.0) / ux.abs() } else { f64::INFINITY };
	let ty = if uy.abs() > 1e-9 { (h / 2.0) / uy.abs() } else { f64::INFINITY };
	tx.min(ty)
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let (line_width, dash, gap, arrow_size) = (2.0, 5.0, 5.0, 12.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for edge in &state.edges {
		let ((x1, y1), (x2, y2)) = (state.node_center(edge.source), state.node_center(edge.target));
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (sw, sh) = state.node_size(edge.source);
		let (tw, th) = state.node_size(edge.target);
		let start = border_offset(sw, sh, ux, uy);
		let end = border_offset(tw, th, ux, uy);
		if start + end >= dist {
			continue;
		}

		ctx.set_stroke_style_str(TEXT_MAIN);
		ctx.set_line_width(line_width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		ctx.begin_path();
		ctx.move_to(x1 + ux * start, y1 + uy * start);
		ctx.line_to(x2 - ux * (end + arrow_size), y2 - uy * (end + arrow_size));
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(TEXT_MAIN);
		let (tip_x, tip_y) = (x2 - ux * end, y2 - uy * end);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edge_labels(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font(&format!("bold 14px {FONT}"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for edge in &state.edges {
		if edge.label.is_empty() {
			continue;
		}
		let ((x1, y1), (x2, y2)) = (state.node_center(edge.source), state.node_center(edge.target));
		let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		let w = edge.label.chars().count() as f64 * 8.0 + 12.0;
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
		ctx.fill_rect(mx - w / 2.0, my - 11.0, w, 22.0);
		ctx.set_fill_style_str(TEXT_MAIN);
		let _ = ctx.fill_text(&edge.label, mx, my);
	}
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}

fn pill_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64) {
	let r = h / 2.0;
	ctx.begin_path();
	let _ = ctx.arc(x + r, y + r, r, PI / 2.0, 3.0 * PI / 2.0);
	ctx.line_to(x + w - r, y);
	let _ = ctx.arc(x + w - r, y + r, r, -PI / 2.0, PI / 2.0);
	ctx.close_path();
}

fn draw_node(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, idx: usize) {
	let node = &state.nodes[idx];
	let (w, h) = state.node_size(idx);
	let (x, y) = (node.position.x, node.position.y);
	let class = node.class();

	ctx.set_global_alpha(node.opacity);

	if node.selected {
		pill_path(ctx, x - 6.0, y - 6.0, w + 12.0, h + 12.0);
		ctx.set_stroke_style_str(ACCENT);
		ctx.set_line_width(4.0);
		ctx.stroke();
	}

	pill_path(ctx, x, y, w, h);
	ctx.set_fill_style_str(class_color(class));
	ctx.fill();
	if state.hover == Some(idx) {
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
		ctx.set_line_width(2.0);
		ctx.stroke();
	}

	let (ax, ay) = (x + AVATAR_PAD + AVATAR_RADIUS, y + h / 2.0);
	ctx.begin_path();
	let _ = ctx.arc(ax, ay, AVATAR_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.2)");
	ctx.fill();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.5)");
	ctx.set_line_width(2.0);
	ctx.stroke();

	match node.data.image.as_deref().and_then(|url| state.image(url)) {
		Some(img) => {
			ctx.save();
			ctx.begin_path();
			let _ = ctx.arc(ax, ay, AVATAR_RADIUS - 1.0, 0.0, 2.0 * PI);
			ctx.clip();
			let d = AVATAR_RADIUS * 2.0;
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				img,
				ax - AVATAR_RADIUS,
				ay - AVATAR_RADIUS,
				d,
				d,
			);
			ctx.restore();
		}
		None => {
			let glyph = match class {
				NodeClass::Animal => "🐾",
				NodeClass::Person => "👤",
			};
			ctx.set_font(&format!("18px {FONT}"));
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			ctx.set_fill_style_str("white");
			let _ = ctx.fill_text(glyph, ax, ay);
			ctx.set_text_align("start");
			ctx.set_text_baseline("alphabetic");
		}
	}

	ctx.set_font(&format!("bold 18px {FONT}"));
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(&node.data.label, ax + AVATAR_RADIUS + 12.0, ay);
	ctx.set_text_baseline("alphabetic");

	ctx.set_global_alpha(1.0);
}
