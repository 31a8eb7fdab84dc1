//! The particle network as an animated scene.

use super::animator::{Animator, Scene};
use super::config::{NetworkConfig, ThemeMode};
use super::host::DrawingSurface;
use super::render;
use super::state::SimulationState;

/// Particle network background bound to a host environment.
///
/// ```ignore
/// let network = NeuralNetwork::new(WebEnvironment::new()?, NetworkConfig::default());
/// network.initialize("neural-bg");
/// // ...
/// network.destroy();
/// ```
pub type NeuralNetwork<E> = Animator<E, SimulationState>;

impl Scene for SimulationState {
	type Config = NetworkConfig;

	const NAME: &'static str = "particle network";

	fn create(config: &NetworkConfig, width: f64, height: f64, seed: u64) -> Self {
		SimulationState::new(config.clone(), width, height, seed)
	}

	fn resize(&mut self, width: f64, height: f64) {
		SimulationState::resize(self, width, height);
	}

	fn pointer_moved(&mut self, x: f64, y: f64) {
		self.set_pointer(x, y);
	}

	fn pointer_left(&mut self) {
		self.clear_pointer();
	}

	fn theme_changed(&mut self, theme: ThemeMode) {
		self.set_theme(theme);
	}

	/// Draws pre-update positions, then advances the simulation.
	fn frame<S: DrawingSurface>(&mut self, surface: &mut S, _now: f64) {
		render::render(self, surface);
		self.tick();
	}
}
