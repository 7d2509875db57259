//! Node field simulation.
//!
//! Holds the drifting nodes together with the particle and pulse systems and
//! advances all of them by one frame in [`FieldState::update`]. Pointer
//! position is passed in explicitly so the step stays deterministic for a
//! given RNG seed.

use std::f64::consts::TAU;

use fastrand::Rng;

use super::config::{FieldConfig, FieldMode};
use super::particles::{ParticleSystem, PulseSystem, range};

/// Pointer influence radius in px.
pub const POINTER_RADIUS: f64 = 200.0;
/// Peak repulsion added to velocity per frame at distance zero.
pub const POINTER_FORCE: f64 = 0.6;
/// Distance from origin beyond which a node is pulled back.
pub const ORIGIN_RADIUS: f64 = 100.0;
/// Fraction of the origin offset added to velocity per frame.
pub const ORIGIN_PULL: f64 = 0.002;

/// Pointer position in canvas CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
	/// Cleared when the pointer leaves the page.
	pub active: bool,
}

impl Pointer {
	pub fn at(x: f64, y: f64) -> Self {
		Self { x, y, active: true }
	}

	/// Distance to `(x, y)` if the pointer is active and within [`POINTER_RADIUS`].
	pub fn reach(&self, x: f64, y: f64) -> Option<f64> {
		if !self.active {
			return None;
		}
		let dist = (x - self.x).hypot(y - self.y);
		(dist < POINTER_RADIUS).then_some(dist)
	}
}

/// A persistent drifting point.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	/// Spawn position the node is pulled back toward in reactive mode.
	pub origin_x: f64,
	pub origin_y: f64,
}

impl Node {
	fn spawn(config: &FieldConfig, width: f64, height: f64, rng: &mut Rng) -> Self {
		let (x, y) = (rng.f64() * width, rng.f64() * height);
		let angle = rng.f64() * TAU;
		let speed = config.node_speed * (0.5 + rng.f64() * 0.5);
		Self {
			x,
			y,
			vx: angle.cos() * speed,
			vy: angle.sin() * speed,
			size: range(rng, config.node_size),
			origin_x: x,
			origin_y: y,
		}
	}

	/// Moves by velocity and reflects off the canvas edges.
	fn advance(&mut self, width: f64, height: f64) {
		self.x += self.vx;
		self.y += self.vy;

		if self.x < 0.0 {
			self.x = 0.0;
			self.vx = self.vx.abs();
		} else if self.x > width {
			self.x = width;
			self.vx = -self.vx.abs();
		}
		if self.y < 0.0 {
			self.y = 0.0;
			self.vy = self.vy.abs();
		} else if self.y > height {
			self.y = height;
			self.vy = -self.vy.abs();
		}
	}

	/// Pushes away from the pointer and pulls toward the origin.
	fn interact(&mut self, pointer: &Pointer) {
		if let Some(dist) = pointer.reach(self.x, self.y)
			&& dist > 0.0
		{
			let force = (POINTER_RADIUS - dist) / POINTER_RADIUS * POINTER_FORCE;
			self.vx += (self.x - pointer.x) / dist * force;
			self.vy += (self.y - pointer.y) / dist * force;
		}

		let (dx, dy) = (self.origin_x - self.x, self.origin_y - self.y);
		if dx.hypot(dy) > ORIGIN_RADIUS {
			self.vx += dx * ORIGIN_PULL;
			self.vy += dy * ORIGIN_PULL;
		}
	}
}

/// Complete simulation state for one canvas size and configuration.
#[derive(Clone, Debug)]
pub struct FieldState {
	pub nodes: Vec<Node>,
	pub particles: ParticleSystem,
	pub pulses: PulseSystem,
	pub mode: FieldMode,
	pub width: f64,
	pub height: f64,
	/// Executed frames since the field was built.
	pub frame: u64,
}

impl FieldState {
	pub fn new(config: &FieldConfig, mode: FieldMode, width: f64, height: f64, rng: &mut Rng) -> Self {
		let count = config.node_count(width, height);
		let nodes = (0..count)
			.map(|_| Node::spawn(config, width, height, rng))
			.collect();

		Self {
			nodes,
			particles: ParticleSystem::default(),
			pulses: PulseSystem::default(),
			mode,
			width,
			height,
			frame: 0,
		}
	}

	/// Rebuilds the node set for the new size and drops all transient effects.
	pub fn resize(&mut self, width: f64, height: f64, config: &FieldConfig, rng: &mut Rng) {
		*self = Self::new(config, self.mode, width, height, rng);
	}

	/// True when the canvas has no area to draw into.
	pub fn is_degenerate(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	/// Advances the whole field by one frame: nodes, then particles, then pulses.
	/// A field without nodes is left untouched.
	pub fn update(&mut self, config: &FieldConfig, pointer: &Pointer, rng: &mut Rng) {
		if self.nodes.is_empty() || self.is_degenerate() {
			return;
		}
		let reactive = self.mode.pointer_reactive();

		for node in &mut self.nodes {
			node.advance(self.width, self.height);
			if reactive {
				node.interact(pointer);
			}
			node.vx += (rng.f64() - 0.5) * config.jitter;
			node.vy += (rng.f64() - 0.5) * config.jitter;
			node.vx *= config.friction;
			node.vy *= config.friction;
		}

		self.particles
			.update(config, self.width, self.height, rng);

		if self.mode.pulses() {
			let anchors: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();
			self.pulses.update(config, &anchors, rng);
		}

		self.frame += 1;
	}
}
