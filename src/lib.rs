//! neural-background: a capability-adaptive ambient particle field.
//!
//! This crate provides a WASM canvas component that renders drifting,
//! interconnected nodes behind page content, scaling its density and frame
//! rate to the device and reacting to the pointer and the page color scheme.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::neural_background::{
	BackgroundOptions, CapabilityTier, ColorScheme, FieldMode, NeuralBackground,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("neural-background: logging initialized");
}

/// Parses background options from JSON, logging and discarding bad input.
fn parse_options(json_text: &str) -> Option<BackgroundOptions> {
	match serde_json::from_str::<BackgroundOptions>(json_text) {
		Ok(options) => {
			info!("neural-background: loaded options {:?}", options);
			Some(options)
		}
		Err(e) => {
			warn!("neural-background: failed to parse options: {}", e);
			None
		}
	}
}

/// Load options from a script element with id="background-options".
/// Expected format: JSON with optional { mode, tier, max_fps }.
fn load_options() -> Option<BackgroundOptions> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("background-options")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	parse_options(&json_text)
}

/// Main application component.
/// Mounts the animated background behind a minimal landing overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let options = load_options();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Neural Background" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<NeuralBackground options=options />
		<div class="background-overlay">
			<h1>"Neural Background"</h1>
			<p class="subtitle">"Move the pointer to push the nodes around."</p>
		</div>
	}
}
