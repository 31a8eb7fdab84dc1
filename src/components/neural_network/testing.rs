//! Test doubles: a surface that records what was drawn and an environment
//! whose frames and events are driven by hand.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::host::{
	DrawingSurface, Environment, EventSink, FrameCallback, FrameClock, FrameHandle, HostEvent,
	ListenerId,
};
use crate::error::HostError;

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub style: String,
	pub width: f64,
	pub alpha: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Disc {
	pub center: (f64, f64),
	pub radius: f64,
	pub style: String,
	pub alpha: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
	SetSize(f64, f64),
	ClearRect(f64, f64, f64, f64),
	FillRect { rect: (f64, f64, f64, f64), style: String, alpha: f64 },
	Line(Line),
	Disc(Disc),
	Text { text: String, x: f64, y: f64, style: String, font: String },
}

#[derive(Clone, Debug)]
enum PathOp {
	MoveTo(f64, f64),
	LineTo(f64, f64),
	Arc(f64, f64, f64),
}

/// Records draw operations together with the style state active at the time.
#[derive(Debug)]
pub struct RecordingSurface {
	pub calls: Vec<DrawCall>,
	/// Number of style setter calls (fill/stroke style, alpha, width, font).
	pub state_changes: usize,
	pub size: (f64, f64),
	pub global_alpha: f64,
	fill_style: String,
	stroke_style: String,
	line_width: f64,
	font: String,
	path: Vec<PathOp>,
}

impl Default for RecordingSurface {
	fn default() -> Self {
		Self {
			calls: Vec::new(),
			state_changes: 0,
			size: (0.0, 0.0),
			global_alpha: 1.0,
			fill_style: "#000000".into(),
			stroke_style: "#000000".into(),
			line_width: 1.0,
			font: "10px sans-serif".into(),
			path: Vec::new(),
		}
	}
}

impl RecordingSurface {
	pub fn lines(&self) -> Vec<Line> {
		self.calls
			.iter()
			.filter_map(|c| match c {
				DrawCall::Line(l) => Some(l.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn discs(&self) -> Vec<Disc> {
		self.calls
			.iter()
			.filter_map(|c| match c {
				DrawCall::Disc(d) => Some(d.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn texts(&self) -> usize {
		self.calls
			.iter()
			.filter(|c| matches!(c, DrawCall::Text { .. }))
			.count()
	}

	pub fn is_untouched(&self) -> bool {
		self.calls.is_empty() && self.state_changes == 0
	}

	pub fn reset(&mut self) {
		self.calls.clear();
		self.state_changes = 0;
	}
}

impl DrawingSurface for RecordingSurface {
	fn set_size(&mut self, width: f64, height: f64) {
		self.size = (width, height);
		self.calls.push(DrawCall::SetSize(width, height));
	}

	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.calls.push(DrawCall::ClearRect(x, y, width, height));
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.calls.push(DrawCall::FillRect {
			rect: (x, y, width, height),
			style: self.fill_style.clone(),
			alpha: self.global_alpha,
		});
	}

	fn set_fill_style(&mut self, style: &str) {
		self.state_changes += 1;
		self.fill_style = style.to_string();
	}

	fn set_stroke_style(&mut self, style: &str) {
		self.state_changes += 1;
		self.stroke_style = style.to_string();
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.state_changes += 1;
		self.global_alpha = alpha;
	}

	fn set_line_width(&mut self, width: f64) {
		self.state_changes += 1;
		self.line_width = width;
	}

	fn set_font(&mut self, font: &str) {
		self.state_changes += 1;
		self.font = font.to_string();
	}

	fn begin_path(&mut self) {
		self.path.clear();
	}

	fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, _end_angle: f64) {
		self.path.push(PathOp::Arc(x, y, radius));
	}

	fn fill(&mut self) {
		for op in &self.path {
			if let PathOp::Arc(x, y, radius) = *op {
				self.calls.push(DrawCall::Disc(Disc {
					center: (x, y),
					radius,
					style: self.fill_style.clone(),
					alpha: self.global_alpha,
				}));
			}
		}
	}

	fn move_to(&mut self, x: f64, y: f64) {
		self.path.push(PathOp::MoveTo(x, y));
	}

	fn line_to(&mut self, x: f64, y: f64) {
		self.path.push(PathOp::LineTo(x, y));
	}

	fn stroke(&mut self) {
		let mut cursor = None;
		for op in &self.path {
			match *op {
				PathOp::MoveTo(x, y) => cursor = Some((x, y)),
				PathOp::LineTo(x, y) => {
					if let Some(from) = cursor {
						self.calls.push(DrawCall::Line(Line {
							from,
							to: (x, y),
							style: self.stroke_style.clone(),
							width: self.line_width,
							alpha: self.global_alpha,
						}));
					}
					cursor = Some((x, y));
				}
				PathOp::Arc(..) => {}
			}
		}
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64) {
		self.calls.push(DrawCall::Text {
			text: text.to_string(),
			x,
			y,
			style: self.fill_style.clone(),
			font: self.font.clone(),
		});
	}
}

/// A [`RecordingSurface`] the test keeps a handle to after the environment hands it out.
#[derive(Clone, Debug, Default)]
pub struct SharedSurface(pub Rc<RefCell<RecordingSurface>>);

impl DrawingSurface for SharedSurface {
	fn set_size(&mut self, width: f64, height: f64) {
		self.0.borrow_mut().set_size(width, height)
	}

	fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.0.borrow_mut().clear_rect(x, y, width, height)
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.0.borrow_mut().fill_rect(x, y, width, height)
	}

	fn set_fill_style(&mut self, style: &str) {
		self.0.borrow_mut().set_fill_style(style)
	}

	fn set_stroke_style(&mut self, style: &str) {
		self.0.borrow_mut().set_stroke_style(style)
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.0.borrow_mut().set_global_alpha(alpha)
	}

	fn set_line_width(&mut self, width: f64) {
		self.0.borrow_mut().set_line_width(width)
	}

	fn set_font(&mut self, font: &str) {
		self.0.borrow_mut().set_font(font)
	}

	fn begin_path(&mut self) {
		self.0.borrow_mut().begin_path()
	}

	fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
		self.0.borrow_mut().arc(x, y, radius, start_angle, end_angle)
	}

	fn fill(&mut self) {
		self.0.borrow_mut().fill()
	}

	fn move_to(&mut self, x: f64, y: f64) {
		self.0.borrow_mut().move_to(x, y)
	}

	fn line_to(&mut self, x: f64, y: f64) {
		self.0.borrow_mut().line_to(x, y)
	}

	fn stroke(&mut self) {
		self.0.borrow_mut().stroke()
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64) {
		self.0.borrow_mut().fill_text(text, x, y)
	}
}

/// Subscriptions, shared so tests can inspect them after the environment is dropped.
pub type Sinks = Rc<RefCell<Vec<(ListenerId, EventSink)>>>;

/// Environment with a hand-cranked frame queue, clock and event bus.
pub struct ManualEnvironment {
	surfaces: RefCell<HashMap<String, SharedSurface>>,
	viewport: Cell<(f64, f64)>,
	frames: RefCell<Vec<(FrameHandle, FrameCallback)>>,
	next_frame: Cell<i32>,
	sinks: Sinks,
	next_listener: Cell<u32>,
	clock: Cell<f64>,
	/// When set, `request_frame` fails.
	pub fail_frames: Cell<bool>,
}

impl ManualEnvironment {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			surfaces: RefCell::new(HashMap::new()),
			viewport: Cell::new((width, height)),
			frames: RefCell::new(Vec::new()),
			next_frame: Cell::new(1),
			sinks: Rc::new(RefCell::new(Vec::new())),
			next_listener: Cell::new(1),
			clock: Cell::new(0.0),
			fail_frames: Cell::new(false),
		}
	}

	/// Registers an empty canvas under `id`.
	pub fn with_canvas(self, id: &str) -> Self {
		self.surfaces
			.borrow_mut()
			.insert(id.to_string(), SharedSurface::default());
		self
	}

	pub fn canvas(&self, id: &str) -> Rc<RefCell<RecordingSurface>> {
		self.surfaces.borrow()[id].0.clone()
	}

	pub fn set_viewport(&self, width: f64, height: f64) {
		self.viewport.set((width, height));
	}

	pub fn advance(&self, ms: f64) {
		self.clock.set(self.clock.get() + ms);
	}

	pub fn pending_frames(&self) -> usize {
		self.frames.borrow().len()
	}

	pub fn listener_count(&self) -> usize {
		self.sinks.borrow().len()
	}

	/// Runs every frame callback queued so far. Returns how many ran.
	pub fn fire_frames(&self) -> usize {
		let frames = self.take_frames();
		let count = frames.len();
		for callback in frames {
			callback();
		}
		count
	}

	/// Removes queued callbacks without running them, as if the host had
	/// already dequeued them when a cancellation arrived.
	pub fn take_frames(&self) -> Vec<FrameCallback> {
		std::mem::take(&mut *self.frames.borrow_mut())
			.into_iter()
			.map(|(_, callback)| callback)
			.collect()
	}

	pub fn sinks(&self) -> Sinks {
		self.sinks.clone()
	}

	pub fn emit(&self, event: HostEvent) {
		let sinks: Vec<EventSink> = self.sinks.borrow().iter().map(|(_, s)| s.clone()).collect();
		for sink in sinks {
			sink(event);
		}
	}
}

impl FrameClock for ManualEnvironment {
	fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle, HostError> {
		if self.fail_frames.get() {
			return Err(HostError::FrameRequest("frame requests disabled".into()));
		}
		let handle = FrameHandle(self.next_frame.get());
		self.next_frame.set(handle.0 + 1);
		self.frames.borrow_mut().push((handle, callback));
		Ok(handle)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		self.frames.borrow_mut().retain(|(h, _)| *h != handle);
	}

	fn now(&self) -> f64 {
		self.clock.get()
	}
}

impl Environment for ManualEnvironment {
	type Surface = SharedSurface;

	fn surface(&self, id: &str) -> Option<Self::Surface> {
		self.surfaces.borrow().get(id).cloned()
	}

	fn viewport_size(&self) -> (f64, f64) {
		self.viewport.get()
	}

	fn subscribe(&self, sink: EventSink) -> Result<ListenerId, HostError> {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.sinks.borrow_mut().push((id, sink));
		Ok(id)
	}

	fn unsubscribe(&self, id: ListenerId) {
		self.sinks.borrow_mut().retain(|(l, _)| *l != id);
	}

	fn entropy_seed(&self) -> u64 {
		0x5eed
	}
}
