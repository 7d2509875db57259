//! Coarse device capability detection.
//!
//! The browser exposes a handful of loosely supported hints about the host
//! device. They are collected into a [`CapabilityInput`] with every field
//! optional, then classified into a [`CapabilityTier`] which drives the rest
//! of the configuration.

use serde::Deserialize;
use wasm_bindgen::JsValue;
use web_sys::Window;

/// User agent fragments that mark a mobile browser.
const MOBILE_KEYWORDS: &[&str] = &[
	"Android",
	"iPhone",
	"iPad",
	"iPod",
	"Windows Phone",
	"BlackBerry",
	"Opera Mini",
	"Mobile",
];

/// Ordinal device performance class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
	#[default]
	Low,
	Medium,
	High,
}

impl CapabilityTier {
	/// Minimum `(concurrency, memory_gb)` a device must clear to qualify.
	fn thresholds(self) -> (u32, f64) {
		match self {
			CapabilityTier::Low => (0, 0.0),
			CapabilityTier::Medium => (4, 4.0),
			CapabilityTier::High => (8, 8.0),
		}
	}

	/// Target frame rate for the tier.
	pub fn max_fps(self) -> f64 {
		match self {
			CapabilityTier::Low => 30.0,
			CapabilityTier::Medium => 45.0,
			CapabilityTier::High => 60.0,
		}
	}
}

/// Raw capability signals. `None` means the host did not report the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapabilityInput {
	/// Logical CPU count (`navigator.hardwareConcurrency`).
	pub hardware_concurrency: Option<u32>,
	/// Approximate memory in GiB (`navigator.deviceMemory`, Chromium only).
	pub device_memory: Option<f64>,
	/// Explicit mobile flag. Takes precedence over `user_agent` when set.
	pub is_mobile: Option<bool>,
	/// Raw user agent string, sniffed for mobile keywords.
	pub user_agent: Option<String>,
	/// `window.devicePixelRatio`.
	pub device_pixel_ratio: Option<f64>,
}

/// Result of classifying a [`CapabilityInput`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capability {
	pub tier: CapabilityTier,
	pub max_fps: f64,
	/// Device pixel ratio clamped to `[1, 2]`.
	pub pixel_ratio: f64,
}

impl Capability {
	/// Builds a capability for a forced tier, keeping the given pixel ratio.
	pub fn with_tier(tier: CapabilityTier, pixel_ratio: f64) -> Self {
		Self {
			tier,
			max_fps: tier.max_fps(),
			pixel_ratio: clamp_pixel_ratio(Some(pixel_ratio)),
		}
	}
}

impl Default for Capability {
	fn default() -> Self {
		Self::with_tier(CapabilityTier::Low, 1.0)
	}
}

fn clamp_pixel_ratio(ratio: Option<f64>) -> f64 {
	match ratio {
		Some(r) if r.is_finite() => r.clamp(1.0, 2.0),
		_ => 1.0,
	}
}

fn is_mobile_agent(user_agent: &str) -> bool {
	MOBILE_KEYWORDS.iter().any(|&keyword| user_agent.contains(keyword))
}

impl CapabilityInput {
	/// Reads the capability hints from the browser. Fields the host does not
	/// implement are left as `None`.
	pub fn from_window(window: &Window) -> Self {
		let navigator = window.navigator();
		let concurrency = navigator.hardware_concurrency();
		// deviceMemory is not part of the web-sys bindings and is missing outside Chromium
		let device_memory = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
			.ok()
			.and_then(|v| v.as_f64());
		let ratio = window.device_pixel_ratio();

		Self {
			hardware_concurrency: (concurrency.is_finite() && concurrency > 0.0)
				.then_some(concurrency as u32),
			device_memory,
			is_mobile: None,
			user_agent: navigator.user_agent().ok(),
			device_pixel_ratio: (ratio > 0.0).then_some(ratio),
		}
	}

	/// Whether the input describes a mobile device.
	pub fn mobile(&self) -> bool {
		self.is_mobile.unwrap_or_else(|| {
			self.user_agent
				.as_deref()
				.map(is_mobile_agent)
				.unwrap_or(false)
		})
	}

	/// Classifies the input. Mobile devices are always `Low`; otherwise both
	/// concurrency and memory must clear a tier's minimum.
	pub fn tier(&self) -> CapabilityTier {
		if self.mobile() {
			return CapabilityTier::Low;
		}
		let concurrency = self.hardware_concurrency.unwrap_or(0);
		let memory = self.device_memory.unwrap_or(0.0);

		[CapabilityTier::High, CapabilityTier::Medium]
			.into_iter()
			.find(|tier| {
				let (min_cores, min_memory) = tier.thresholds();
				concurrency >= min_cores && memory >= min_memory
			})
			.unwrap_or(CapabilityTier::Low)
	}

	/// Classifies the input into a [`Capability`].
	pub fn detect(&self) -> Capability {
		let tier = self.tier();
		Capability {
			tier,
			max_fps: tier.max_fps(),
			pixel_ratio: clamp_pixel_ratio(self.device_pixel_ratio),
		}
	}
}
