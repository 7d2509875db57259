//! Ambient particle field background.
//!
//! Renders a field of drifting nodes joined by proximity lines, plus
//! short-lived particles and pulses, on a full-viewport canvas with:
//! - Density and frame rate chosen from a coarse device capability tier
//! - Pointer repulsion with an elastic pull back to each node's origin
//! - Light and dark color schemes read from the host page
//! - Frame throttling, visibility pausing and clean teardown
//!
//! # Example
//!
//! ```ignore
//! use neural_background::{FieldMode, NeuralBackground};
//!
//! view! { <NeuralBackground mode=FieldMode::Ambient /> }
//! ```

pub mod capability;
mod component;
pub mod config;
mod particles;
mod render;
pub mod scheduler;
mod state;
pub mod theme;
mod types;

pub use capability::{Capability, CapabilityInput, CapabilityTier};
pub use component::NeuralBackground;
pub use config::{FieldConfig, FieldMode};
pub use render::{Ambient, Surface};
pub use scheduler::{Engine, FrameDecision, FrameLoop, LoopState};
pub use state::Pointer;
pub use theme::ColorScheme;
pub use types::BackgroundOptions;
