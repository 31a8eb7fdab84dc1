//! The host boundary: what an animation needs from its environment.
//!
//! The browser implementation lives in `web.rs`; tests use a recording
//! implementation so frames and event delivery can be driven by hand.

use std::rc::Rc;

use super::config::ThemeMode;
use crate::error::HostError;

/// A 2D drawing target with canvas-style state (fill/stroke style, alpha, line width).
///
/// The pixel buffer dimensions are set explicitly through [`DrawingSurface::set_size`].
pub trait DrawingSurface {
	/// Resizes the pixel buffer, which also clears it.
	fn set_size(&mut self, width: f64, height: f64);
	/// Erases a rectangle to transparent.
	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
	/// Paints a rectangle with the current fill style and alpha.
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
	/// CSS color used by `fill`, `fill_rect` and `fill_text`.
	fn set_fill_style(&mut self, style: &str);
	/// CSS color used by `stroke`.
	fn set_stroke_style(&mut self, style: &str);
	/// Opacity multiplier in `[0, 1]` for everything drawn next.
	fn set_global_alpha(&mut self, alpha: f64);
	/// Stroke width in pixels.
	fn set_line_width(&mut self, width: f64);
	/// CSS font shorthand used by `fill_text`.
	fn set_font(&mut self, font: &str);
	/// Starts a new path, discarding the previous one.
	fn begin_path(&mut self);
	/// Adds a circular arc, angles in radians.
	fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
	/// Fills the current path.
	fn fill(&mut self);
	/// Starts a subpath at `(x, y)`.
	fn move_to(&mut self, x: f64, y: f64);
	/// Adds a straight segment to `(x, y)`.
	fn line_to(&mut self, x: f64, y: f64);
	/// Strokes the current path.
	fn stroke(&mut self);
	/// Draws `text` with its baseline starting at `(x, y)`.
	fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// A callback run once on the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Identifies a pending frame request so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Paces animations to the display refresh.
pub trait FrameClock {
	/// Runs `callback` once, soon, roughly aligned to the next display refresh.
	fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, HostError>;
	/// Drops a pending request. Unknown or already-fired handles are ignored.
	fn cancel_frame(&self, handle: FrameHandle);
	/// Monotonic time in milliseconds.
	fn now(&self) -> f64;
}

/// Notifications delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
	/// The viewport changed size; read the new size with [`Environment::viewport_size`].
	Resize,
	/// The pointer moved within the viewport.
	PointerMove {
		/// Viewport x in pixels
		x: f64,
		/// Viewport y in pixels
		y: f64,
	},
	/// The pointer left the viewport.
	PointerLeave,
	/// The page switched color scheme.
	ThemeChange(ThemeMode),
}

/// Receives host notifications.
pub type EventSink = Rc<dyn Fn(HostEvent)>;

/// Identifies a subscription so it can be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Everything an animation needs from the page: surfaces, a clock, events and
/// the viewport size.
pub trait Environment: FrameClock + 'static {
	/// What [`Environment::surface`] hands out.
	type Surface: DrawingSurface + 'static;

	/// Looks up a drawing surface by element id. `None` when it does not exist.
	fn surface(&self, id: &str) -> Option<Self::Surface>;
	/// Current viewport `(width, height)` in pixels.
	fn viewport_size(&self) -> (f64, f64);
	/// Delivers every [`HostEvent`] to `sink` until unsubscribed.
	fn subscribe(&self, sink: EventSink) -> Result<ListenerId, HostError>;
	/// Removes a subscription. Unknown ids are ignored.
	fn unsubscribe(&self, id: ListenerId);
	/// Seed for animations that were not given a fixed one.
	fn entropy_seed(&self) -> u64;
}
