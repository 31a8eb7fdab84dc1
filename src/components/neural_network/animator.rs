//! Frame-loop driver shared by the background effects.
//!
//! An [`Animator`] owns one [`Scene`] and binds it to a drawing surface found
//! by element id. While running it redraws on every frame-clock tick and
//! forwards host notifications to the scene. The loop is a self-rescheduling
//! frame callback guarded by an explicit `running` flag: [`Animator::destroy`]
//! clears the flag, cancels the pending request and unsubscribes, so a callback
//! the host had already dequeued finds nothing to do.
//!
//! Callbacks handed to the host hold only `Weak` references to the animator's
//! state, so dropping the animator also makes them inert. Each mount carries a
//! generation number that its callbacks capture; a callback from an earlier
//! mount does nothing after `destroy` and a later `initialize`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

use super::config::ThemeMode;
use super::host::{DrawingSurface, Environment, EventSink, FrameHandle, HostEvent, ListenerId};

/// An animation that can be driven by an [`Animator`].
pub trait Scene: Sized + 'static {
	/// Settings the scene is built from.
	type Config: Clone + 'static;

	/// Short name used in log messages.
	const NAME: &'static str;

	/// Builds the scene for a `width` x `height` viewport.
	fn create(config: &Self::Config, width: f64, height: f64, seed: u64) -> Self;

	/// The viewport changed to `width` x `height`.
	fn resize(&mut self, width: f64, height: f64);

	/// The pointer moved to `(x, y)` in viewport pixels.
	fn pointer_moved(&mut self, _x: f64, _y: f64) {}

	/// The pointer left the viewport.
	fn pointer_left(&mut self) {}

	/// The page switched color scheme.
	fn theme_changed(&mut self, _theme: ThemeMode) {}

	/// Draws (and advances) one frame. `now` is the frame clock's time in ms.
	fn frame<S: DrawingSurface>(&mut self, surface: &mut S, now: f64);
}

/// State that exists only between `initialize` and `destroy`.
struct Mounted<S, Sc> {
	generation: u64,
	surface: S,
	scene: Sc,
	running: bool,
	frame: Option<FrameHandle>,
	listener: Option<ListenerId>,
	adopted: Vec<ListenerId>,
}

type Slot<S, Sc> = Rc<RefCell<Option<Mounted<S, Sc>>>>;

/// Drives a [`Scene`] on a surface provided by an [`Environment`].
pub struct Animator<E: Environment, Sc: Scene> {
	env: Rc<E>,
	config: Sc::Config,
	mounted: Slot<E::Surface, Sc>,
	generations: Cell<u64>,
}

impl<E: Environment, Sc: Scene> Animator<E, Sc> {
	/// Creates a stopped animator. Nothing touches the host until [`Animator::initialize`].
	pub fn new(env: E, config: Sc::Config) -> Self {
		Self {
			env: Rc::new(env),
			config,
			mounted: Rc::new(RefCell::new(None)),
			generations: Cell::new(0),
		}
	}

	/// The host this animator draws through.
	pub fn env(&self) -> &E {
		&self.env
	}

	/// Whether the frame loop is live.
	pub fn is_running(&self) -> bool {
		self.mounted.borrow().as_ref().is_some_and(|m| m.running)
	}

	/// Binds to the surface named `surface_id` and starts the loop.
	///
	/// Returns `false`, leaving nothing registered, when the surface does not
	/// exist. Pages without the canvas simply get no animation.
	pub fn initialize(&self, surface_id: &str) -> bool {
		if self.is_running() {
			warn!("neural-bg: {} already running, ignoring initialize", Sc::NAME);
			return true;
		}
		// A loop that stopped on its own still holds a subscription.
		self.destroy();

		let Some(mut surface) = self.env.surface(surface_id) else {
			debug!("neural-bg: no surface #{}, {} stays inactive", surface_id, Sc::NAME);
			return false;
		};

		let (width, height) = self.env.viewport_size();
		surface.set_size(width, height);
		let scene = Sc::create(&self.config, width, height, self.env.entropy_seed());
		let generation = self.generations.get() + 1;
		self.generations.set(generation);

		*self.mounted.borrow_mut() = Some(Mounted {
			generation,
			surface,
			scene,
			running: true,
			frame: None,
			listener: None,
			adopted: Vec::new(),
		});

		match self.env.subscribe(self.event_sink(generation)) {
			Ok(id) => {
				if let Some(m) = self.mounted.borrow_mut().as_mut() {
					m.listener = Some(id);
				}
			}
			Err(e) => warn!("neural-bg: {} runs without host events: {}", Sc::NAME, e),
		}

		Self::schedule(&self.mounted, &self.env, generation);
		info!(
			"neural-bg: {} started on #{} ({}x{})",
			Sc::NAME, surface_id, width, height
		);
		true
	}

	/// Stops the loop and unregisters from host events. Safe to call repeatedly.
	pub fn destroy(&self) {
		let Some(mut mounted) = self.mounted.borrow_mut().take() else {
			return;
		};
		mounted.running = false;
		if let Some(handle) = mounted.frame.take() {
			self.env.cancel_frame(handle);
		}
		if let Some(id) = mounted.listener.take() {
			self.env.unsubscribe(id);
		}
		for id in mounted.adopted.drain(..) {
			self.env.unsubscribe(id);
		}
		info!("neural-bg: {} destroyed", Sc::NAME);
	}

	/// Draws one frame immediately, outside the scheduled loop.
	pub fn render_frame(&self) {
		Self::draw(&self.mounted, self.env.now());
	}

	/// Re-reads the viewport size, resizes the surface and rebuilds the scene for it.
	pub fn on_resize(&self) {
		Self::dispatch(&self.mounted, &*self.env, HostEvent::Resize);
	}

	/// Forwards a pointer position, as the host subscription would.
	pub fn on_pointer_move(&self, x: f64, y: f64) {
		Self::dispatch(&self.mounted, &*self.env, HostEvent::PointerMove { x, y });
	}

	/// Forwards the pointer leaving the viewport.
	pub fn on_pointer_leave(&self) {
		Self::dispatch(&self.mounted, &*self.env, HostEvent::PointerLeave);
	}

	/// Forwards a theme switch.
	pub fn on_theme_change(&self, theme: ThemeMode) {
		Self::dispatch(&self.mounted, &*self.env, HostEvent::ThemeChange(theme));
	}

	/// Hands a host listener registered elsewhere to the current mount, so
	/// `destroy` removes it with the animator's own subscription. When nothing is
	/// mounted the listener is removed immediately.
	pub fn adopt_listener(&self, id: ListenerId) {
		if let Some(m) = self.mounted.borrow_mut().as_mut() {
			m.adopted.push(id);
			return;
		}
		self.env.unsubscribe(id);
	}

	/// Read access to the scene while mounted.
	pub fn with_scene<R>(&self, f: impl FnOnce(&Sc) -> R) -> Option<R> {
		self.mounted.borrow().as_ref().map(|m| f(&m.scene))
	}

	/// Write access to the scene while mounted.
	pub fn with_scene_mut<R>(&self, f: impl FnOnce(&mut Sc) -> R) -> Option<R> {
		self.mounted.borrow_mut().as_mut().map(|m| f(&mut m.scene))
	}

	fn event_sink(&self, generation: u64) -> EventSink {
		let (mounted, env) = (Rc::downgrade(&self.mounted), Rc::downgrade(&self.env));
		Rc::new(move |event: HostEvent| {
			let (Some(mounted), Some(env)) = (mounted.upgrade(), env.upgrade()) else {
				return;
			};
			if Self::is_current(&mounted, generation) {
				Self::dispatch(&mounted, &*env, event);
			}
		})
	}

	fn is_current(mounted: &Slot<E::Surface, Sc>, generation: u64) -> bool {
		mounted
			.borrow()
			.as_ref()
			.is_some_and(|m| m.generation == generation)
	}

	fn dispatch(mounted: &Slot<E::Surface, Sc>, env: &E, event: HostEvent) {
		let mut guard = mounted.borrow_mut();
		let Some(m) = guard.as_mut().filter(|m| m.running) else {
			return;
		};
		match event {
			HostEvent::Resize => {
				let (width, height) = env.viewport_size();
				m.surface.set_size(width, height);
				m.scene.resize(width, height);
				debug!("neural-bg: {} resized to {}x{}", Sc::NAME, width, height);
			}
			HostEvent::PointerMove { x, y } => m.scene.pointer_moved(x, y),
			HostEvent::PointerLeave => m.scene.pointer_left(),
			HostEvent::ThemeChange(theme) => m.scene.theme_changed(theme),
		}
	}

	fn draw(mounted: &Slot<E::Surface, Sc>, now: f64) -> bool {
		let mut guard = mounted.borrow_mut();
		match guard.as_mut() {
			Some(m) if m.running => {
				m.scene.frame(&mut m.surface, now);
				true
			}
			_ => false,
		}
	}

	/// Requests the next tick. The callback draws, then reschedules itself
	/// only if the animator is still running.
	fn schedule(mounted: &Slot<E::Surface, Sc>, env: &Rc<E>, generation: u64) {
		let (weak_mounted, weak_env): (Weak<_>, Weak<E>) =
			(Rc::downgrade(mounted), Rc::downgrade(env));
		let tick = Box::new(move || {
			let (Some(mounted), Some(env)) = (weak_mounted.upgrade(), weak_env.upgrade()) else {
				return;
			};
			match mounted.borrow_mut().as_mut() {
				Some(m) if m.generation == generation => m.frame = None,
				_ => return,
			}
			if Self::draw(&mounted, env.now()) {
				Self::schedule(&mounted, &env, generation);
			}
		});

		match env.request_frame(tick) {
			Ok(handle) => {
				if let Some(m) = mounted.borrow_mut().as_mut().filter(|m| m.generation == generation) {
					m.frame = Some(handle);
				}
			}
			Err(e) => {
				warn!("neural-bg: {} stopped, frame request failed: {}", Sc::NAME, e);
				if let Some(m) = mounted.borrow_mut().as_mut().filter(|m| m.generation == generation) {
					m.running = false;
				}
			}
		}
	}
}

impl<E: Environment, Sc: Scene> Drop for Animator<E, Sc> {
	fn drop(&mut self) {
		self.destroy();
	}
}
