//! Frame throttling and the engine driving update + render.
//!
//! The browser calls back on every animation frame. [`FrameLoop`] decides
//! whether that callback does work, waits, or stops for good; [`Engine`]
//! combines it with the simulation so a whole frame can be exercised with
//! plain timestamps and a recording surface.

use fastrand::Rng;
use log::debug;

use super::capability::Capability;
use super::config::{FieldConfig, FieldMode};
use super::render::{self, Ambient, Surface};
use super::state::FieldState;

/// Lifecycle of the animation loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	#[default]
	Uninitialized,
	Running,
	/// Page hidden; frames are not requested.
	Paused,
	TornDown,
}

/// What a single animation-frame callback should do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameDecision {
	/// Too early; reschedule without doing work.
	Skip,
	/// Update and draw, then reschedule.
	Run { elapsed_ms: f64 },
	/// Do nothing and do not reschedule.
	Stop,
}

impl FrameDecision {
	pub fn reschedule(self) -> bool {
		!matches!(self, FrameDecision::Stop)
	}
}

/// Frame-rate limiter independent of the host's native callback rate.
#[derive(Clone, Debug)]
pub struct FrameLoop {
	state: LoopState,
	interval_ms: f64,
	last_frame: Option<f64>,
}

impl FrameLoop {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			state: LoopState::Uninitialized,
			interval_ms: interval_ms.max(0.0),
			last_frame: None,
		}
	}

	pub fn state(&self) -> LoopState {
		self.state
	}

	pub fn interval_ms(&self) -> f64 {
		self.interval_ms
	}

	/// Enters `Running`. The first frame afterwards runs immediately.
	pub fn start(&mut self) {
		if self.state == LoopState::TornDown {
			return;
		}
		self.state = LoopState::Running;
		self.last_frame = None;
	}

	/// Restarts with a new frame interval, e.g. after a resize re-detects the tier.
	pub fn restart(&mut self, interval_ms: f64) {
		self.interval_ms = interval_ms.max(0.0);
		self.start();
	}

	pub fn pause(&mut self) {
		if self.state == LoopState::Running {
			self.state = LoopState::Paused;
		}
	}

	/// Leaves `Paused`. The hidden period does not count as elapsed time.
	pub fn resume(&mut self) {
		if self.state == LoopState::Paused {
			self.start();
		}
	}

	/// Terminal: every later frame is a [`FrameDecision::Stop`].
	pub fn teardown(&mut self) {
		self.state = LoopState::TornDown;
	}

	/// Decides what the frame callback fired at `now` (ms) should do.
	pub fn on_frame(&mut self, now: f64) -> FrameDecision {
		match self.state {
			LoopState::Running => {}
			LoopState::Uninitialized | LoopState::Paused | LoopState::TornDown => {
				return FrameDecision::Stop;
			}
		}
		match self.last_frame {
			None => {
				self.last_frame = Some(now);
				FrameDecision::Run { elapsed_ms: 0.0 }
			}
			Some(last) => {
				let elapsed_ms = now - last;
				if elapsed_ms < self.interval_ms {
					return FrameDecision::Skip;
				}
				self.last_frame = Some(now);
				FrameDecision::Run { elapsed_ms }
			}
		}
	}
}

/// Owns everything the animation needs between frames.
pub struct Engine {
	pub config: FieldConfig,
	pub field: FieldState,
	frame_loop: FrameLoop,
	rng: Rng,
	fps_override: Option<f64>,
}

impl Engine {
	/// Builds the field for `capability` and starts the loop.
	pub fn new(
		capability: Capability,
		mode: FieldMode,
		width: f64,
		height: f64,
		fps_override: Option<f64>,
		mut rng: Rng,
	) -> Self {
		let config = Self::select_config(capability, fps_override);
		let field = FieldState::new(&config, mode, width, height, &mut rng);
		let mut frame_loop = FrameLoop::new(config.frame_interval_ms);
		frame_loop.start();

		debug!(
			"neural-background: {} nodes at {}x{}, {:.1}ms frames",
			field.nodes.len(),
			width,
			height,
			config.frame_interval_ms
		);

		Self {
			config,
			field,
			frame_loop,
			rng,
			fps_override,
		}
	}

	fn select_config(capability: Capability, fps_override: Option<f64>) -> FieldConfig {
		let config = FieldConfig::for_tier(capability.tier);
		match fps_override {
			Some(fps) if fps < capability.max_fps => config.with_max_fps(fps),
			_ => config,
		}
	}

	pub fn loop_state(&self) -> LoopState {
		self.frame_loop.state()
	}

	/// Runs one animation-frame callback. Update and render happen only when
	/// the throttle allows it; the return value says whether to reschedule.
	pub fn frame<S: Surface>(&mut self, now: f64, ambient: &Ambient, surface: &mut S) -> FrameDecision {
		let decision = self.frame_loop.on_frame(now);
		if let FrameDecision::Run { .. } = decision {
			self.field
				.update(&self.config, &ambient.pointer, &mut self.rng);
			render::render(&self.field, &self.config, ambient, now, surface);
		}
		decision
	}

	/// Re-selects the configuration and rebuilds the field from scratch.
	pub fn resize(&mut self, width: f64, height: f64, capability: Capability) {
		if self.frame_loop.state() == LoopState::TornDown {
			return;
		}
		self.config = Self::select_config(capability, self.fps_override);
		self.field
			.resize(width, height, &self.config, &mut self.rng);
		self.frame_loop.restart(self.config.frame_interval_ms);
		debug!(
			"neural-background: resized to {}x{}, {} nodes",
			width,
			height,
			self.field.nodes.len()
		);
	}

	pub fn pause(&mut self) {
		self.frame_loop.pause();
	}

	pub fn resume(&mut self) {
		self.frame_loop.resume();
	}

	pub fn teardown(&mut self) {
		self.frame_loop.teardown();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::neural_background::capability::{CapabilityInput, CapabilityTier};
	use crate::components::neural_background::render::testing::RecordingSurface;
	use crate::components::neural_background::state::Pointer;

	fn engine(tier: CapabilityTier, width: f64, height: f64) -> Engine {
		Engine::new(
			Capability::with_tier(tier, 1.0),
			FieldMode::Reactive,
			width,
			height,
			None,
			Rng::with_seed(99),
		)
	}

	#[test]
	fn loop_throttles_to_interval() {
		let mut fl = FrameLoop::new(20.0);
		assert_eq!(fl.on_frame(0.0), FrameDecision::Stop);

		fl.start();
		assert_eq!(fl.on_frame(100.0), FrameDecision::Run { elapsed_ms: 0.0 });
		assert_eq!(fl.on_frame(110.0), FrameDecision::Skip);
		assert_eq!(fl.on_frame(119.9), FrameDecision::Skip);
		assert_eq!(fl.on_frame(120.0), FrameDecision::Run { elapsed_ms: 20.0 });
		assert_eq!(fl.on_frame(135.0), FrameDecision::Skip);
		assert_eq!(fl.on_frame(145.0), FrameDecision::Run { elapsed_ms: 25.0 });
	}

	#[test]
	fn pause_and_resume() {
		let mut fl = FrameLoop::new(20.0);
		fl.start();
		fl.on_frame(0.0);
		fl.pause();
		assert_eq!(fl.state(), LoopState::Paused);
		assert_eq!(fl.on_frame(50.0), FrameDecision::Stop);

		fl.resume();
		assert_eq!(fl.state(), LoopState::Running);
		assert_eq!(fl.on_frame(5000.0), FrameDecision::Run { elapsed_ms: 0.0 });
	}

	#[test]
	fn teardown_is_terminal() {
		let mut fl = FrameLoop::new(20.0);
		fl.start();
		fl.teardown();
		fl.start();
		fl.resume();
		assert_eq!(fl.state(), LoopState::TornDown);
		assert_eq!(fl.on_frame(1000.0), FrameDecision::Stop);
		assert!(!fl.on_frame(2000.0).reschedule());
	}

	#[test]
	fn throttled_frames_leave_state_untouched() {
		let mut engine = engine(CapabilityTier::Medium, 800.0, 600.0);
		let ambient = Ambient::default();
		let mut surface = RecordingSurface::default();

		assert!(matches!(
			engine.frame(0.0, &ambient, &mut surface),
			FrameDecision::Run { .. }
		));
		let nodes = engine.field.nodes.clone();
		let frame = engine.field.frame;
		surface.ops.clear();

		let early = engine.config.frame_interval_ms - 1.0;
		assert_eq!(engine.frame(early, &ambient, &mut surface), FrameDecision::Skip);
		assert_eq!(engine.field.nodes, nodes);
		assert_eq!(engine.field.frame, frame);
		assert!(surface.ops.is_empty());

		let due = engine.config.frame_interval_ms;
		assert!(matches!(
			engine.frame(due, &ambient, &mut surface),
			FrameDecision::Run { .. }
		));
		assert_eq!(engine.field.frame, frame + 1);
		assert!(!surface.ops.is_empty());
	}

	#[test]
	fn teardown_stops_mutation_and_drawing() {
		let mut engine = engine(CapabilityTier::High, 800.0, 600.0);
		let ambient = Ambient {
			pointer: Pointer::at(400.0, 300.0),
			..Default::default()
		};
		let mut surface = RecordingSurface::default();
		engine.frame(0.0, &ambient, &mut surface);

		engine.teardown();
		let nodes = engine.field.nodes.clone();
		surface.ops.clear();

		for t in [100.0, 200.0, 10_000.0] {
			assert_eq!(engine.frame(t, &ambient, &mut surface), FrameDecision::Stop);
		}
		engine.resize(1200.0, 900.0, Capability::with_tier(CapabilityTier::High, 1.0));
		assert_eq!(engine.field.nodes, nodes);
		assert!(surface.ops.is_empty());
		assert_eq!(engine.loop_state(), LoopState::TornDown);
	}

	#[test]
	fn low_tier_device_gets_smallest_field() {
		let input = CapabilityInput {
			hardware_concurrency: Some(2),
			device_memory: Some(2.0),
			is_mobile: Some(true),
			..Default::default()
		};
		let low = Engine::new(
			input.detect(),
			FieldMode::Reactive,
			1920.0,
			1080.0,
			None,
			Rng::with_seed(1),
		);
		let high = engine(CapabilityTier::High, 1920.0, 1080.0);

		assert_eq!(low.field.nodes.len(), low.config.max_nodes);
		assert!(low.field.nodes.len() < high.field.nodes.len());
		assert!((low.config.frame_interval_ms - 1000.0 / 30.0).abs() < 1e-9);
	}

	#[test]
	fn resize_rebuilds_with_new_tier() {
		let mut engine = engine(CapabilityTier::High, 1100.0, 500.0);
		let ambient = Ambient::default();
		let mut surface = RecordingSurface::default();
		engine.config.spawn_chance = 1.0;
		let interval = engine.config.frame_interval_ms;
		for i in 0..5 {
			engine.frame(i as f64 * interval, &ambient, &mut surface);
		}
		assert_eq!(engine.field.nodes.len(), 50);
		assert!(!engine.field.particles.is_empty());

		engine.resize(800.0, 600.0, Capability::with_tier(CapabilityTier::Low, 1.0));
		assert_eq!(engine.field.nodes.len(), 20);
		assert!(engine.field.particles.is_empty());
		assert_eq!(engine.config, FieldConfig::for_tier(CapabilityTier::Low));
		assert!(matches!(
			engine.frame(1.0, &ambient, &mut surface),
			FrameDecision::Run { .. }
		));
	}

	#[test]
	fn zero_size_viewport_stays_idle() {
		let mut engine = Engine::new(
			Capability::with_tier(CapabilityTier::High, 1.0),
			FieldMode::Ambient,
			0.0,
			0.0,
			None,
			Rng::with_seed(99),
		);
		engine.config.spawn_chance = 1.0;
		let mut surface = RecordingSurface::default();
		let interval = engine.config.frame_interval_ms;
		for i in 0..500 {
			engine.frame(i as f64 * interval, &Ambient::default(), &mut surface);
		}
		assert!(engine.field.nodes.is_empty());
		assert!(engine.field.particles.is_empty());
		assert!(surface.ops.is_empty());
	}

	#[test]
	fn fps_override_only_lowers_the_cap() {
		let cap = Capability::with_tier(CapabilityTier::High, 1.0);
		let slow = Engine::new(cap, FieldMode::Ambient, 100.0, 100.0, Some(24.0), Rng::with_seed(1));
		assert!((slow.config.frame_interval_ms - 1000.0 / 24.0).abs() < 1e-9);

		let fast = Engine::new(cap, FieldMode::Ambient, 100.0, 100.0, Some(240.0), Rng::with_seed(1));
		assert_eq!(fast.config, FieldConfig::for_tier(CapabilityTier::High));
	}
}
