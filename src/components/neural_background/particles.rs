//! Short-lived decorative effects: drifting particles and expanding pulses.

use std::f64::consts::TAU;

use fastrand::Rng;

use super::config::FieldConfig;

/// Distance past the canvas edge a particle may travel before it is culled.
pub const PARTICLE_MARGIN: f64 = 50.0;

/// Opacity lost by a pulse each frame.
pub const PULSE_DECAY: f64 = 0.01;

/// Uniform sample in `[min, max)`.
pub(super) fn range(rng: &mut Rng, (min, max): (f64, f64)) -> f64 {
	min + rng.f64() * (max - min)
}

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	/// Normalized remaining life, 1.0 at spawn.
	pub life: f64,
	/// Lifetime in frames.
	pub max_life: f64,
}

impl Particle {
	fn spawn(config: &FieldConfig, width: f64, height: f64, rng: &mut Rng) -> Self {
		let angle = rng.f64() * TAU;
		let speed = config.particle_speed * (0.5 + rng.f64() * 0.5);
		Self {
			x: rng.f64() * width,
			y: rng.f64() * height,
			vx: angle.cos() * speed,
			vy: angle.sin() * speed,
			size: range(rng, config.particle_size),
			life: 1.0,
			max_life: range(rng, config.particle_life).max(1.0),
		}
	}

	fn in_bounds(&self, width: f64, height: f64) -> bool {
		(-PARTICLE_MARGIN..=width + PARTICLE_MARGIN).contains(&self.x)
			&& (-PARTICLE_MARGIN..=height + PARTICLE_MARGIN).contains(&self.y)
	}
}

/// Particles spawned and expired continuously, bounded by `max_particles`.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
	pub particles: Vec<Particle>,
}

impl ParticleSystem {
	/// Advances, ages and culls particles, then maybe spawns one.
	pub fn update(&mut self, config: &FieldConfig, width: f64, height: f64, rng: &mut Rng) {
		for p in &mut self.particles {
			p.x += p.vx;
			p.y += p.vy;
			p.life -= 1.0 / p.max_life;
		}
		self.particles
			.retain(|p| p.life > 0.0 && p.in_bounds(width, height));

		if self.particles.len() < config.max_particles && rng.f64() < config.spawn_chance {
			self.particles
				.push(Particle::spawn(config, width, height, rng));
		}
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}

/// An expanding, fading ring anchored where it was spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct Pulse {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub max_radius: f64,
	pub opacity: f64,
	/// Radius growth per frame.
	pub speed: f64,
}

/// Pulses emitted from random nodes in ambient mode.
#[derive(Clone, Debug, Default)]
pub struct PulseSystem {
	pub pulses: Vec<Pulse>,
}

impl PulseSystem {
	/// Grows and fades pulses, then maybe spawns one at one of `anchors`.
	pub fn update(&mut self, config: &FieldConfig, anchors: &[(f64, f64)], rng: &mut Rng) {
		for pulse in &mut self.pulses {
			pulse.radius += pulse.speed;
			pulse.opacity -= PULSE_DECAY;
		}
		self.pulses
			.retain(|p| p.opacity > 0.0 && p.radius < p.max_radius);

		if anchors.is_empty() || self.pulses.len() >= config.max_pulses {
			return;
		}
		if rng.f64() < config.pulse_chance {
			let (x, y) = anchors[rng.usize(..anchors.len())];
			self.pulses.push(Pulse {
				x,
				y,
				radius: 0.0,
				max_radius: config.connection_distance * (0.6 + rng.f64() * 0.4),
				opacity: 0.5,
				speed: 0.8 + rng.f64() * 0.7,
			});
		}
	}

	pub fn clear(&mut self) {
		self.pulses.clear();
	}
}
