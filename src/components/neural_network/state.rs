//! Particle network simulation state.
//!
//! Combines the particle field with the pointer, viewport and theme, and
//! applies the notification rules: resize regenerates the field, pointer
//! updates are dropped when interaction is disabled, theme changes swap the
//! palette.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{NetworkConfig, Palette, ThemeMode};
use super::particles::{ParticleField, Pointer};

/// Core simulation state, created once per mounted canvas and mutated each frame.
pub struct SimulationState {
	/// Particles and viewport bounds
	pub field: ParticleField,
	/// Last known pointer position, `None` while outside the viewport
	pub pointer: Option<Pointer>,
	/// Selects the palette
	pub theme: ThemeMode,
	config: NetworkConfig,
}

impl SimulationState {
	/// `seed` is used only when the config does not pin one.
	pub fn new(config: NetworkConfig, width: f64, height: f64, seed: u64) -> Self {
		let rng = SmallRng::seed_from_u64(config.seed.unwrap_or(seed));
		Self {
			field: ParticleField::new(&config, width, height, rng),
			pointer: None,
			theme: ThemeMode::default(),
			config,
		}
	}

	/// Configuration the simulation was built from.
	pub fn config(&self) -> &NetworkConfig {
		&self.config
	}

	/// Palette for the current theme.
	pub fn palette(&self) -> &Palette {
		self.config.palette(self.theme)
	}

	/// Viewport width.
	pub fn width(&self) -> f64 {
		self.field.width()
	}

	/// Viewport height.
	pub fn height(&self) -> f64 {
		self.field.height()
	}

	/// Regenerates every particle for the new viewport.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.field.regenerate(&self.config, width, height);
	}

	/// Records the pointer. Ignored when pointer interaction is disabled.
	pub fn set_pointer(&mut self, x: f64, y: f64) {
		if self.config.mouse_interaction {
			self.pointer = Some(Pointer { x, y });
		}
	}

	/// Forgets the pointer after it leaves the viewport.
	pub fn clear_pointer(&mut self) {
		self.pointer = None;
	}

	/// Switches palettes; takes effect on the next frame.
	pub fn set_theme(&mut self, theme: ThemeMode) {
		self.theme = theme;
	}

	/// Whether either endpoint of a connection should use the near-pointer style.
	pub fn near_pointer(&self, x: f64, y: f64) -> bool {
		self.active_pointer()
			.is_some_and(|p| (x - p.x).hypot(y - p.y) < self.config.pointer_radius)
	}

	fn active_pointer(&self) -> Option<Pointer> {
		self.pointer.filter(|_| self.config.mouse_interaction)
	}

	/// Update pass: motion, edge bounce and pointer repulsion.
	pub fn tick(&mut self) {
		let pointer = self.active_pointer();
		self.field.update(pointer, self.config.pointer_radius);
	}
}
