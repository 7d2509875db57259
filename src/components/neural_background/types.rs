//! Host-provided options for the background component.

use serde::Deserialize;

use super::capability::CapabilityTier;
use super::config::FieldMode;

/// Optional overrides, typically embedded in the page as JSON.
///
/// Every field is optional; an empty object keeps the detected defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundOptions {
	/// Behavioral variant. Falls back to the component's `mode` prop.
	pub mode: Option<FieldMode>,
	/// Forces a capability tier instead of detecting one.
	pub tier: Option<CapabilityTier>,
	/// Caps the frame rate below the tier's default.
	pub max_fps: Option<f64>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_is_default() {
		let opts: BackgroundOptions = serde_json::from_str("{}").unwrap();
		assert_eq!(opts, BackgroundOptions::default());
	}

	#[test]
	fn parses_all_fields() {
		let opts: BackgroundOptions =
			serde_json::from_str(r#"{ "mode": "ambient", "tier": "high", "max_fps": 24 }"#)
				.unwrap();
		assert_eq!(opts.mode, Some(FieldMode::Ambient));
		assert_eq!(opts.tier, Some(CapabilityTier::High));
		assert_eq!(opts.max_fps, Some(24.0));
	}

	#[test]
	fn rejects_unknown_fields() {
		assert!(serde_json::from_str::<BackgroundOptions>(r#"{ "speed": 2 }"#).is_err());
	}
}
