//! Leptos component wrapping the particle field canvas.
//!
//! The component creates a fixed, full-viewport canvas behind the page and
//! drives an [`Engine`] from `requestAnimationFrame`. Window listeners feed it
//! pointer position, viewport size and page visibility; everything is
//! released again when the component unmounts.

use std::cell::RefCell;
use std::rc::Rc;

use fastrand::Rng;
use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent,
	Window,
};

use super::capability::{Capability, CapabilityInput};
use super::config::FieldMode;
use super::render::Ambient;
use super::scheduler::{Engine, LoopState};
use super::state::Pointer;
use super::theme::ColorScheme;
use super::types::BackgroundOptions;

/// Everything the frame callback touches, shared between event handlers.
struct BackgroundContext {
	engine: Engine,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	pointer: Pointer,
	/// Handle of the outstanding `requestAnimationFrame`, if any.
	pending_frame: Option<i32>,
}

type SharedContext = Rc<RefCell<Option<BackgroundContext>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// An event listener that detaches itself when dropped.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn attach(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Option<Self> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|e| warn!("neural-background: failed to listen for {}: {:?}", event, e))
			.ok()?;
		Some(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

fn viewport(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn detect_capability(window: &Window, options: &BackgroundOptions) -> Capability {
	let detected = CapabilityInput::from_window(window).detect();
	match options.tier {
		Some(tier) => Capability::with_tier(tier, detected.pixel_ratio),
		None => detected,
	}
}

fn page_hidden() -> bool {
	web_sys::window()
		.and_then(|w| w.document())
		.map(|d| d.hidden())
		.unwrap_or(false)
}

/// Sizes the backing store for the pixel ratio and keeps drawing in CSS pixels.
fn size_canvas(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	pixel_ratio: f64,
) {
	canvas.set_width((width * pixel_ratio) as u32);
	canvas.set_height((height * pixel_ratio) as u32);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", width));
	let _ = style.set_property("height", &format!("{}px", height));
	// Resizing the canvas resets its transform
	let _ = ctx.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0);
}

fn cancel_frame(context: &mut BackgroundContext) {
	if let (Some(handle), Some(window)) = (context.pending_frame.take(), web_sys::window()) {
		let _ = window.cancel_animation_frame(handle);
	}
}

/// Requests the next frame unless one is already outstanding.
fn request_frame(context: &SharedContext, animate: &FrameCallback) {
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	if c.pending_frame.is_some() || c.engine.loop_state() != LoopState::Running {
		return;
	}
	let animate = animate.borrow();
	let (Some(window), Some(cb)) = (web_sys::window(), animate.as_ref()) else {
		return;
	};
	match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		Ok(handle) => c.pending_frame = Some(handle),
		Err(e) => warn!("neural-background: requestAnimationFrame failed: {:?}", e),
	}
}

fn set_pointer(context: &SharedContext, pointer: Pointer) {
	if let Some(ref mut c) = *context.borrow_mut() {
		c.pointer = pointer;
	}
}

/// Renders the ambient particle field behind the page content.
///
/// The canvas is fixed to the viewport and ignores pointer events, so it can
/// sit under any layout. Density and frame rate adapt to the detected device
/// tier; `options` can force a tier, a mode, or a lower frame cap.
#[component]
pub fn NeuralBackground(
	#[prop(default = FieldMode::Reactive)] mode: FieldMode,
	#[prop(default = None)] options: Option<BackgroundOptions>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let options = options.unwrap_or_default();
	let mode = options.mode.unwrap_or(mode);

	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<Listener>>> = Rc::new(RefCell::new(Vec::new()));
	let (context_init, animate_init, listeners_init) =
		(context.clone(), animate.clone(), listeners.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("neural-background: no window, animation disabled");
			return;
		};
		let Some((w, h)) = viewport(&window) else {
			warn!("neural-background: viewport size unavailable, animation disabled");
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			warn!("neural-background: 2d context unavailable, animation disabled");
			return;
		};

		let capability = detect_capability(&window, &options);
		info!(
			"neural-background: {:?} tier, {} fps cap, pixel ratio {}",
			capability.tier, capability.max_fps, capability.pixel_ratio
		);
		size_canvas(&canvas, &ctx, w, h, capability.pixel_ratio);

		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let engine = Engine::new(capability, mode, w, h, options.max_fps, Rng::with_seed(seed));
		*context_init.borrow_mut() = Some(BackgroundContext {
			engine,
			canvas,
			ctx,
			pointer: Pointer::default(),
			pending_frame: None,
		});

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let reschedule = {
				let mut guard = context_anim.borrow_mut();
				let Some(c) = guard.as_mut() else {
					return;
				};
				c.pending_frame = None;
				let ambient = Ambient {
					pointer: c.pointer,
					scheme: ColorScheme::from_document(),
				};
				c.engine.frame(now, &ambient, &mut c.ctx).reschedule()
			};
			if reschedule {
				request_frame(&context_anim, &animate_inner);
			}
		}));

		let mut registered = Vec::new();

		let (context_resize, animate_resize, options_resize) =
			(context_init.clone(), animate_init.clone(), options.clone());
		registered.extend(Listener::attach(&window, "resize", move |_| {
			let Some(win) = web_sys::window() else {
				return;
			};
			let Some((nw, nh)) = viewport(&win) else {
				return;
			};
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				if c.engine.loop_state() == LoopState::TornDown {
					return;
				}
				cancel_frame(c);
				let capability = detect_capability(&win, &options_resize);
				size_canvas(&c.canvas, &c.ctx, nw, nh, capability.pixel_ratio);
				c.engine.resize(nw, nh, capability);
				if page_hidden() {
					c.engine.pause();
				}
			}
			request_frame(&context_resize, &animate_resize);
		}));

		let context_mm = context_init.clone();
		registered.extend(Listener::attach(&window, "mousemove", move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			set_pointer(
				&context_mm,
				Pointer::at(ev.client_x() as f64, ev.client_y() as f64),
			);
		}));

		let context_mo = context_init.clone();
		registered.extend(Listener::attach(&window, "mouseout", move |ev| {
			// Only leaving the document clears the pointer, not moving between elements
			let left_page = ev
				.dyn_ref::<MouseEvent>()
				.is_some_and(|ev| ev.related_target().is_none());
			if left_page {
				set_pointer(&context_mo, Pointer::default());
			}
		}));

		let context_tm = context_init.clone();
		let on_touch = move |ev: Event| {
			let Some(touch) = ev
				.dyn_ref::<TouchEvent>()
				.and_then(|ev| ev.touches().get(0))
			else {
				return;
			};
			set_pointer(
				&context_tm,
				Pointer::at(touch.client_x() as f64, touch.client_y() as f64),
			);
		};
		registered.extend(Listener::attach(&window, "touchstart", on_touch.clone()));
		registered.extend(Listener::attach(&window, "touchmove", on_touch));

		for event in ["touchend", "touchcancel"] {
			let context_te = context_init.clone();
			registered.extend(Listener::attach(&window, event, move |_| {
				set_pointer(&context_te, Pointer::default());
			}));
		}

		if let Some(document) = window.document() {
			let (context_vis, animate_vis) = (context_init.clone(), animate_init.clone());
			registered.extend(Listener::attach(&document, "visibilitychange", move |_| {
				let hidden = page_hidden();
				if let Some(ref mut c) = *context_vis.borrow_mut() {
					if hidden {
						cancel_frame(c);
						c.engine.pause();
					} else {
						c.engine.resume();
					}
				}
				if !hidden {
					request_frame(&context_vis, &animate_vis);
				}
			}));
		}

		listeners_init.borrow_mut().extend(registered);

		if page_hidden() {
			if let Some(ref mut c) = *context_init.borrow_mut() {
				c.engine.pause();
			}
		}
		request_frame(&context_init, &animate_init);
	});

	let teardown = SendWrapper::new((context, animate, listeners));
	on_cleanup(move || {
		let (context, animate, listeners) = teardown.take();
		if let Some(ref mut c) = *context.borrow_mut() {
			cancel_frame(c);
			c.engine.teardown();
		}
		listeners.borrow_mut().clear();
		// Drops the frame closure, which holds a handle to itself
		animate.borrow_mut().take();
		context.borrow_mut().take();
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="neural-background"
			aria-hidden="true"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: -1;"
		/>
	}
}
