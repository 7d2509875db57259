//! Per-tier tuning constants for the particle field.
//!
//! A [`FieldConfig`] is selected once from a [`CapabilityTier`] and then only
//! read. Changing tiers means selecting a new config and rebuilding the field.

use serde::Deserialize;

use super::capability::CapabilityTier;

/// Hard cap on nodes regardless of canvas area or tier.
pub const MAX_NODES: usize = 150;

/// Which behavioral variant the field runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
	/// Nodes are pushed away from the pointer and pulled back to their origin.
	#[default]
	Reactive,
	/// Pointer is ignored; nodes emit expanding pulses instead.
	Ambient,
}

impl FieldMode {
	pub fn pointer_reactive(self) -> bool {
		matches!(self, FieldMode::Reactive)
	}

	pub fn pulses(self) -> bool {
		matches!(self, FieldMode::Ambient)
	}
}

/// Tuning constants for one capability tier.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
	/// Upper bound on nodes for this tier.
	pub max_nodes: usize,
	/// Canvas area (px²) each node accounts for.
	pub area_per_node: f64,
	pub max_particles: usize,
	pub max_pulses: usize,
	/// Nodes closer than this are joined by a line.
	pub connection_distance: f64,
	/// Minimum milliseconds between two executed frames.
	pub frame_interval_ms: f64,
	pub node_opacity: f64,
	pub line_opacity: f64,
	pub particle_opacity: f64,
	/// Initial node speed in px per frame.
	pub node_speed: f64,
	pub particle_speed: f64,
	/// Node radius range `(min, max)` in px.
	pub node_size: (f64, f64),
	pub particle_size: (f64, f64),
	/// Particle lifetime range `(min, max)` in frames.
	pub particle_life: (f64, f64),
	/// Per-frame probability of spawning a particle.
	pub spawn_chance: f64,
	/// Per-frame probability of spawning a pulse.
	pub pulse_chance: f64,
	/// Maximum random velocity nudge per frame.
	pub jitter: f64,
	/// Velocity multiplier applied every frame.
	pub friction: f64,
}

impl FieldConfig {
	/// Looks up the constants for `tier`.
	pub fn for_tier(tier: CapabilityTier) -> Self {
		match tier {
			CapabilityTier::Low => Self {
				max_nodes: 40,
				area_per_node: 24_000.0,
				max_particles: 10,
				max_pulses: 1,
				connection_distance: 100.0,
				frame_interval_ms: 1000.0 / tier.max_fps(),
				node_opacity: 0.5,
				line_opacity: 0.15,
				particle_opacity: 0.3,
				node_speed: 0.25,
				particle_speed: 0.4,
				node_size: (1.0, 2.0),
				particle_size: (0.5, 1.0),
				particle_life: (120.0, 240.0),
				spawn_chance: 0.02,
				pulse_chance: 0.002,
				jitter: 0.01,
				friction: 0.99,
			},
			CapabilityTier::Medium => Self {
				max_nodes: 80,
				area_per_node: 16_000.0,
				max_particles: 25,
				max_pulses: 2,
				connection_distance: 120.0,
				frame_interval_ms: 1000.0 / tier.max_fps(),
				node_opacity: 0.6,
				line_opacity: 0.2,
				particle_opacity: 0.35,
				node_speed: 0.3,
				particle_speed: 0.5,
				node_size: (1.0, 2.5),
				particle_size: (0.5, 1.5),
				particle_life: (150.0, 300.0),
				spawn_chance: 0.04,
				pulse_chance: 0.004,
				jitter: 0.015,
				friction: 0.99,
			},
			CapabilityTier::High => Self {
				max_nodes: 120,
				area_per_node: 11_000.0,
				max_particles: 50,
				max_pulses: 4,
				connection_distance: 150.0,
				frame_interval_ms: 1000.0 / tier.max_fps(),
				node_opacity: 0.7,
				line_opacity: 0.25,
				particle_opacity: 0.4,
				node_speed: 0.35,
				particle_speed: 0.6,
				node_size: (1.5, 3.0),
				particle_size: (0.5, 2.0),
				particle_life: (180.0, 360.0),
				spawn_chance: 0.06,
				pulse_chance: 0.006,
				jitter: 0.02,
				friction: 0.985,
			},
		}
	}

	/// Overrides the frame cap. Non-positive values leave the config untouched.
	pub fn with_max_fps(mut self, fps: f64) -> Self {
		if fps.is_finite() && fps > 0.0 {
			self.frame_interval_ms = 1000.0 / fps;
		}
		self
	}

	/// Number of nodes for a canvas of the given size.
	pub fn node_count(&self, width: f64, height: f64) -> usize {
		if !(width > 0.0 && height > 0.0) {
			return 0;
		}
		let by_area = (width * height / self.area_per_node).floor() as usize;
		by_area.min(self.max_nodes).min(MAX_NODES)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TIERS: [CapabilityTier; 3] = [
		CapabilityTier::Low,
		CapabilityTier::Medium,
		CapabilityTier::High,
	];

	#[test]
	fn selection_is_pure() {
		for tier in TIERS {
			assert_eq!(FieldConfig::for_tier(tier), FieldConfig::for_tier(tier));
		}
	}

	#[test]
	fn tiers_scale_monotonically() {
		let [low, mid, high] = TIERS.map(FieldConfig::for_tier);
		assert!(low.max_nodes < mid.max_nodes && mid.max_nodes < high.max_nodes);
		assert!(low.max_particles < mid.max_particles && mid.max_particles < high.max_particles);
		assert!(low.frame_interval_ms > mid.frame_interval_ms);
		assert!(mid.frame_interval_ms > high.frame_interval_ms);
	}

	#[test]
	fn low_tier_runs_at_thirty_fps() {
		let cfg = FieldConfig::for_tier(CapabilityTier::Low);
		assert!((cfg.frame_interval_ms - 1000.0 / 30.0).abs() < 1e-9);
	}

	#[test]
	fn node_count_scales_with_area_and_caps() {
		let cfg = FieldConfig::for_tier(CapabilityTier::High);
		assert_eq!(cfg.node_count(0.0, 900.0), 0);
		assert_eq!(cfg.node_count(-10.0, 900.0), 0);
		assert_eq!(cfg.node_count(f64::NAN, 900.0), 0);
		assert_eq!(cfg.node_count(110.0, 100.0), 1);
		assert_eq!(cfg.node_count(1100.0, 500.0), 50);
		assert_eq!(cfg.node_count(10_000.0, 10_000.0), cfg.max_nodes);
		assert!(cfg.node_count(1e9, 1e9) <= MAX_NODES);
	}

	#[test]
	fn fps_override_ignores_garbage() {
		let cfg = FieldConfig::for_tier(CapabilityTier::Medium);
		assert_eq!(cfg.clone().with_max_fps(0.0), cfg);
		assert_eq!(cfg.clone().with_max_fps(f64::INFINITY), cfg);
		assert!((cfg.with_max_fps(20.0).frame_interval_ms - 50.0).abs() < 1e-9);
	}
}
