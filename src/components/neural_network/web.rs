//! Browser implementation of the host boundary over `web-sys`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, CustomEvent, Document, Event, HtmlCanvasElement, HtmlElement,
	MouseEvent, PageTransitionEvent, Window,
};

use super::config::ThemeMode;
use super::host::{
	DrawingSurface, Environment, EventSink, FrameCallback, FrameClock, FrameHandle, HostEvent,
	ListenerId,
};
use crate::error::HostError;

/// Name of the custom window event the page fires when its theme toggles.
pub const THEME_CHANGE_EVENT: &str = "themeChange";

type Listener = (&'static str, Closure<dyn FnMut(Event)>);

/// A canvas element with its 2d context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// `None` when the canvas has no 2d context.
	pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self { canvas, ctx })
	}
}

impl DrawingSurface for CanvasSurface {
	fn set_size(&mut self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
	}

	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.clear_rect(x, y, width, height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.fill_rect(x, y, width, height);
	}

	fn set_fill_style(&mut self, style: &str) {
		self.ctx.set_fill_style_str(style);
	}

	fn set_stroke_style(&mut self, style: &str) {
		self.ctx.set_stroke_style_str(style);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn set_line_width(&mut self, width: f64) {
		self.ctx.set_line_width(width);
	}

	fn set_font(&mut self, font: &str) {
		self.ctx.set_font(font);
	}

	fn begin_path(&mut self) {
		self.ctx.begin_path();
	}

	fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
		let _ = self.ctx.arc(x, y, radius, start_angle, end_angle);
	}

	fn fill(&mut self) {
		self.ctx.fill();
	}

	fn move_to(&mut self, x: f64, y: f64) {
		self.ctx.move_to(x, y);
	}

	fn line_to(&mut self, x: f64, y: f64) {
		self.ctx.line_to(x, y);
	}

	fn stroke(&mut self) {
		self.ctx.stroke();
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64) {
		let _ = self.ctx.fill_text(text, x, y);
	}
}

/// The browser window as an animation host.
///
/// Event subscriptions are window listeners kept alive here until
/// [`Environment::unsubscribe`] removes them.
pub struct WebEnvironment {
	window: Window,
	document: Document,
	listeners: RefCell<HashMap<ListenerId, Vec<Listener>>>,
	next_listener: Cell<u32>,
}

impl WebEnvironment {
	/// Binds to the global window. Fails outside a browser main thread.
	pub fn new() -> Result<Self, HostError> {
		let window = web_sys::window().ok_or(HostError::NoWindow)?;
		let document = window.document().ok_or(HostError::NoDocument)?;
		Ok(Self {
			window,
			document,
			listeners: RefCell::new(HashMap::new()),
			next_listener: Cell::new(1),
		})
	}

	/// The window's document.
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Theme named by the root element's `data-theme` attribute, if any.
	pub fn document_theme(&self) -> Option<ThemeMode> {
		self.document
			.document_element()?
			.get_attribute("data-theme")?
			.parse()
			.ok()
	}

	/// Keeps the element matching `selector` centred on the pointer.
	///
	/// Does nothing (and registers nothing) when no element matches.
	pub fn track_cursor_glow(&self, selector: &str) -> Result<Option<ListenerId>, HostError> {
		let Some(glow) = self
			.document
			.query_selector(selector)
			.ok()
			.flatten()
			.and_then(|el| el.dyn_into::<HtmlElement>().ok())
		else {
			debug!("neural-bg: no {} element, cursor glow disabled", selector);
			return Ok(None);
		};

		let on_move = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
				let style = glow.style();
				let _ = style.set_property("left", &format!("{}px", ev.client_x()));
				let _ = style.set_property("top", &format!("{}px", ev.client_y()));
			}
		});
		self.register(vec![("mousemove", on_move)]).map(Some)
	}

	/// Runs `on_hide` on `pagehide` and `on_show(persisted)` on `pageshow`.
	///
	/// `persisted` is true when the page is restored from the back/forward cache.
	pub fn on_page_transition(
		&self,
		mut on_hide: impl FnMut() + 'static,
		mut on_show: impl FnMut(bool) + 'static,
	) -> Result<ListenerId, HostError> {
		let hide = Closure::<dyn FnMut(Event)>::new(move |_: Event| on_hide());
		let show = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			let persisted = ev
				.dyn_ref::<PageTransitionEvent>()
				.is_some_and(|ev| ev.persisted());
			on_show(persisted);
		});
		self.register(vec![("pagehide", hide), ("pageshow", show)])
	}

	fn register(&self, listeners: Vec<Listener>) -> Result<ListenerId, HostError> {
		for (i, (event, cb)) in listeners.iter().enumerate() {
			if let Err(e) = self
				.window
				.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
			{
				for (event, cb) in &listeners[..i] {
					let _ = self
						.window
						.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
				}
				return Err(HostError::listener(*event, e));
			}
		}

		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.listeners.borrow_mut().insert(id, listeners);
		Ok(id)
	}
}

impl FrameClock for WebEnvironment {
	fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, HostError> {
		// Frees itself once called. A cancelled request leaks its closure.
		let closure = Closure::once_into_js(move || callback());
		self.window
			.request_animation_frame(closure.unchecked_ref())
			.map(FrameHandle)
			.map_err(HostError::frame_request)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}

	fn now(&self) -> f64 {
		self.window
			.performance()
			.map(|p| p.now())
			.unwrap_or_else(js_sys::Date::now)
	}
}

impl Environment for WebEnvironment {
	type Surface = CanvasSurface;

	fn surface(&self, id: &str) -> Option<CanvasSurface> {
		let element = self.document.get_element_by_id(id)?;
		match element.dyn_into::<HtmlCanvasElement>() {
			Ok(canvas) => CanvasSurface::new(canvas),
			Err(_) => {
				warn!("neural-bg: #{} is not a canvas", id);
				None
			}
		}
	}

	fn viewport_size(&self) -> (f64, f64) {
		let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		(dim(self.window.inner_width()), dim(self.window.inner_height()))
	}

	fn subscribe(&self, sink: EventSink) -> Result<ListenerId, HostError> {
		let on_resize = {
			let sink = sink.clone();
			Closure::<dyn FnMut(Event)>::new(move |_: Event| sink(HostEvent::Resize))
		};

		let on_move = {
			let sink = sink.clone();
			Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
				if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
					sink(HostEvent::PointerMove {
						x: ev.client_x() as f64,
						y: ev.client_y() as f64,
					});
				}
			})
		};

		// `mouseout` bubbles from every element; only a null related target
		// means the pointer left the window.
		let on_out = {
			let sink = sink.clone();
			Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
				let left_window = ev
					.dyn_ref::<MouseEvent>()
					.is_none_or(|ev| ev.related_target().is_none());
				if left_window {
					sink(HostEvent::PointerLeave);
				}
			})
		};

		let on_theme = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			let theme = ev
				.dyn_ref::<CustomEvent>()
				.and_then(|ev| js_sys::Reflect::get(&ev.detail(), &JsValue::from_str("theme")).ok())
				.and_then(|v| v.as_string())
				.and_then(|s| s.parse::<ThemeMode>().ok());
			match theme {
				Some(theme) => sink(HostEvent::ThemeChange(theme)),
				None => debug!("neural-bg: ignoring {} without a known theme", THEME_CHANGE_EVENT),
			}
		});

		self.register(vec![
			("resize", on_resize),
			("mousemove", on_move),
			("mouseout", on_out),
			(THEME_CHANGE_EVENT, on_theme),
		])
	}

	fn unsubscribe(&self, id: ListenerId) {
		let Some(listeners) = self.listeners.borrow_mut().remove(&id) else {
			return;
		};
		for (event, cb) in &listeners {
			let _ = self
				.window
				.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
	}

	fn entropy_seed(&self) -> u64 {
		let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
		let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
		(hi << 32) | lo
	}
}

impl Drop for WebEnvironment {
	fn drop(&mut self) {
		let ids: Vec<ListenerId> = self.listeners.borrow().keys().copied().collect();
		for id in ids {
			self.unsubscribe(id);
		}
	}
}
