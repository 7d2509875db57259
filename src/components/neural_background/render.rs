//! Drawing for the particle field.
//!
//! Rendering goes through the small [`Surface`] trait so the frame logic can
//! run against a recording surface in tests. Layering, back to front:
//! 1. Background fill
//! 2. Pulses and connection lines
//! 3. Pointer glow, then nodes
//! 4. Particles

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::FieldConfig;
use super::state::{FieldState, POINTER_RADIUS, Pointer};
use super::theme::{Color, ColorScheme, Palette};

/// Ambient inputs read from the page each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ambient {
	pub pointer: Pointer,
	pub scheme: ColorScheme,
}

/// The drawing operations the renderer needs.
pub trait Surface {
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
	fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color);
	fn circle(&mut self, x: f64, y: f64, radius: f64, color: Color);
	fn ring(&mut self, x: f64, y: f64, radius: f64, width: f64, color: Color);
	/// Radial falloff from `color` at the center to transparent at `radius`.
	fn glow(&mut self, x: f64, y: f64, radius: f64, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.fill();
	}

	fn ring(&mut self, x: f64, y: f64, radius: f64, width: f64, color: Color) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.stroke();
	}

	fn glow(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		let Ok(gradient) = self.create_radial_gradient(x, y, 0.0, x, y, radius) else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &color.to_css());
		let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.set_fill_style(&gradient);
		self.fill();
	}
}

/// Cosmetic breathing of node radii, independent of simulation state.
pub fn pulse_factor(time_ms: f64, index: usize) -> f64 {
	1.0 + 0.2 * (time_ms * 0.002 + index as f64).sin()
}

/// Paints one complete frame.
pub fn render<S: Surface>(
	state: &FieldState,
	config: &FieldConfig,
	ambient: &Ambient,
	time_ms: f64,
	surface: &mut S,
) {
	if state.is_degenerate() {
		return;
	}
	let palette = Palette::for_scheme(ambient.scheme);
	// Pointer highlights only apply to the reactive variant
	let pointer = if state.mode.pointer_reactive() {
		ambient.pointer
	} else {
		Pointer::default()
	};

	surface.fill_rect(0.0, 0.0, state.width, state.height, palette.background);
	draw_pulses(state, surface, &palette);
	draw_connections(state, config, &pointer, surface, &palette);
	draw_nodes(state, config, &pointer, time_ms, surface, &palette);
	draw_particles(state, config, surface, &palette);
}

fn draw_pulses<S: Surface>(state: &FieldState, surface: &mut S, palette: &Palette) {
	for pulse in &state.pulses.pulses {
		surface.ring(
			pulse.x,
			pulse.y,
			pulse.radius,
			1.0,
			palette.pulse.with_alpha(pulse.opacity),
		);
	}
}

fn draw_connections<S: Surface>(
	state: &FieldState,
	config: &FieldConfig,
	pointer: &Pointer,
	surface: &mut S,
	palette: &Palette,
) {
	let max_dist = config.connection_distance;

	for (i, a) in state.nodes.iter().enumerate() {
		for b in &state.nodes[i + 1..] {
			let dist = (a.x - b.x).hypot(a.y - b.y);
			if dist >= max_dist {
				continue;
			}
			let base = (1.0 - dist / max_dist) * config.line_opacity;
			let near_pointer =
				pointer.reach(a.x, a.y).is_some() || pointer.reach(b.x, b.y).is_some();

			let (color, width) = if near_pointer {
				(palette.accent.with_alpha((base * 2.0).min(1.0)), 1.2)
			} else {
				(palette.line.with_alpha(base), 0.6)
			};
			surface.line((a.x, a.y), (b.x, b.y), width, color);
		}
	}
}

fn draw_nodes<S: Surface>(
	state: &FieldState,
	config: &FieldConfig,
	pointer: &Pointer,
	time_ms: f64,
	surface: &mut S,
	palette: &Palette,
) {
	for (i, node) in state.nodes.iter().enumerate() {
		let radius = node.size * pulse_factor(time_ms, i);

		if let Some(dist) = pointer.reach(node.x, node.y) {
			let closeness = 1.0 - dist / POINTER_RADIUS;
			surface.glow(
				node.x,
				node.y,
				radius * 6.0,
				palette.accent.with_alpha(0.35 * closeness),
			);
		}

		surface.circle(
			node.x,
			node.y,
			radius,
			palette.node.with_alpha(config.node_opacity),
		);
	}
}

fn draw_particles<S: Surface>(
	state: &FieldState,
	config: &FieldConfig,
	surface: &mut S,
	palette: &Palette,
) {
	for p in &state.particles.particles {
		surface.circle(
			p.x,
			p.y,
			p.size,
			palette
				.particle
				.with_alpha(config.particle_opacity * p.life.max(0.0)),
		);
	}
}
