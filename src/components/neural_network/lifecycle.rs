//! Keeps an animator in step with page visibility.
//!
//! `pagehide` fires on real navigation and also when the page is frozen into
//! the back/forward cache. The animator is destroyed either way; a `pageshow`
//! with `persisted` set means the frozen page came back, so it is started
//! again and its mount hook rerun.

use log::debug;

use super::animator::{Animator, Scene};
use super::host::Environment;

type MountHook<E, Sc> = Box<dyn Fn(&Animator<E, Sc>)>;

/// An animator plus the surface it mounts on and the setup to repeat on every mount.
pub struct PageBinding<E: Environment, Sc: Scene> {
	animator: Animator<E, Sc>,
	surface_id: String,
	on_mount: MountHook<E, Sc>,
}

impl<E: Environment, Sc: Scene> PageBinding<E, Sc> {
	/// `on_mount` runs after each successful initialize, e.g. to apply the
	/// current theme or adopt extra listeners.
	pub fn new(
		animator: Animator<E, Sc>,
		surface_id: impl Into<String>,
		on_mount: impl Fn(&Animator<E, Sc>) + 'static,
	) -> Self {
		Self {
			animator,
			surface_id: surface_id.into(),
			on_mount: Box::new(on_mount),
		}
	}

	/// The bound animator.
	pub fn animator(&self) -> &Animator<E, Sc> {
		&self.animator
	}

	/// Mounts the animator unless it is already running. `false` when the surface is missing.
	pub fn start(&self) -> bool {
		if self.animator.is_running() {
			return true;
		}
		if !self.animator.initialize(&self.surface_id) {
			return false;
		}
		(self.on_mount)(&self.animator);
		true
	}

	/// `pagehide`: stop everything, whether or not the page is being cached.
	pub fn page_hidden(&self) {
		self.animator.destroy();
	}

	/// `pageshow`: restart only when the page comes back from the back/forward cache.
	pub fn page_shown(&self, persisted: bool) {
		if persisted && !self.animator.is_running() {
			debug!("neural-bg: {} restored from page cache", Sc::NAME);
			self.start();
		}
	}
}
