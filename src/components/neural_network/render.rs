//! Drawing for the particle network.
//!
//! A frame is drawn in three passes:
//! 1. Opaque clear of the whole surface
//! 2. Connections between every pair closer than the connection distance
//! 3. Particles on top

use std::f64::consts::TAU;

use super::host::DrawingSurface;
use super::state::SimulationState;

/// Alpha for a connection of length `distance`: 1 when touching, 0 at `max_distance`.
pub fn connection_alpha(distance: f64, max_distance: f64) -> f64 {
	(1.0 - distance / max_distance).clamp(0.0, 1.0)
}

/// Renders the current state without mutating it.
pub fn render<S: DrawingSurface>(state: &SimulationState, surface: &mut S) {
	surface.clear_rect(0.0, 0.0, state.width(), state.height());
	draw_connections(state, surface);
	draw_particles(state, surface);
}

fn draw_connections<S: DrawingSurface>(state: &SimulationState, surface: &mut S) {
	let config = state.config();
	let palette = state.palette();
	let (base, hover) = (palette.connection.to_css(), palette.connection_hover.to_css());

	state
		.field
		.visit_connections(config.connection_distance, |a, b, distance| {
			let near = state.near_pointer(a.x, a.y) || state.near_pointer(b.x, b.y);

			surface.begin_path();
			if near {
				surface.set_stroke_style(&hover);
				surface.set_line_width(config.hover_connection_width);
			} else {
				surface.set_stroke_style(&base);
				surface.set_line_width(config.connection_width);
			}
			surface.set_global_alpha(connection_alpha(distance, config.connection_distance));
			surface.move_to(a.x, a.y);
			surface.line_to(b.x, b.y);
			surface.stroke();
			surface.set_global_alpha(1.0);
		});
}

fn draw_particles<S: DrawingSurface>(state: &SimulationState, surface: &mut S) {
	let fill = state.palette().particle.to_css();

	for p in &state.field.particles {
		surface.begin_path();
		surface.arc(p.x, p.y, p.size, 0.0, TAU);
		surface.set_fill_style(&fill);
		surface.set_global_alpha(p.opacity);
		surface.fill();
	}
	surface.set_global_alpha(1.0);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::neural_network::config::{NetworkConfig, Palette, ThemeMode};
	use crate::components::neural_network::particles::Particle;
	use crate::components::neural_network::testing::{DrawCall, RecordingSurface};

	fn at(x: f64, y: f64) -> Particle {
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size: 2.0,
			opacity: 0.75,
		}
	}

	fn state_with(particles: Vec<Particle>, connection_distance: f64) -> SimulationState {
		let config = NetworkConfig {
			particle_count: particles.len(),
			connection_distance,
			..NetworkConfig::default()
		};
		let mut state = SimulationState::new(config, 1000.0, 1000.0, 3);
		state.field.particles = particles;
		state
	}

	#[test]
	fn test_two_particle_scenario_alpha() {
		let state = state_with(vec![at(0.0, 0.0), at(50.0, 0.0)], 100.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		let lines = surface.lines();
		assert_eq!(lines.len(), 1);
		assert_eq!(lines[0].from, (0.0, 0.0));
		assert_eq!(lines[0].to, (50.0, 0.0));
		assert!((lines[0].alpha - 0.5).abs() < 1e-12);
		assert_eq!(lines[0].style, Palette::dark().connection.to_css());
		assert_eq!(lines[0].width, 0.5);
	}

	#[test]
	fn test_frame_starts_with_full_clear() {
		let state = state_with(vec![at(10.0, 10.0)], 100.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert_eq!(
			surface.calls.first(),
			Some(&DrawCall::ClearRect(0.0, 0.0, 1000.0, 1000.0))
		);
	}

	#[test]
	fn test_connection_drawn_iff_closer_than_threshold() {
		let particles = vec![
			at(0.0, 0.0),
			at(99.0, 0.0),
			at(0.0, 100.0),
			at(300.0, 300.0),
			at(360.0, 380.0),
		];
		let state = state_with(particles.clone(), 100.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		let lines = surface.lines();

		let mut expected = 0;
		for (i, a) in particles.iter().enumerate() {
			for b in &particles[i + 1..] {
				let d = a.distance_to(b);
				let drawn = lines
					.iter()
					.find(|l| l.from == (a.x, a.y) && l.to == (b.x, b.y));
				if d < 100.0 {
					expected += 1;
					let line = drawn.expect("connection should be drawn");
					assert!((line.alpha - (1.0 - d / 100.0)).abs() < 1e-12);
					assert!((0.0..=1.0).contains(&line.alpha));
				} else {
					assert!(drawn.is_none(), "no connection at distance {}", d);
				}
			}
		}
		assert_eq!(lines.len(), expected);
	}

	#[test]
	fn test_near_pointer_connections_use_hover_style() {
		let mut state = state_with(
			vec![at(0.0, 0.0), at(50.0, 0.0), at(600.0, 600.0), at(650.0, 600.0)],
			100.0,
		);
		state.set_pointer(20.0, 20.0);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		let lines = surface.lines();
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0].style, Palette::dark().connection_hover.to_css());
		assert_eq!(lines[0].width, 1.5);
		assert_eq!(lines[1].style, Palette::dark().connection.to_css());
		assert_eq!(lines[1].width, 0.5);
	}

	#[test]
	fn test_particles_drawn_with_opacity_and_theme_color() {
		let mut state = state_with(vec![at(10.0, 20.0), at(500.0, 500.0)], 100.0);
		state.set_theme(ThemeMode::Light);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		let discs = surface.discs();
		assert_eq!(discs.len(), 2);
		assert_eq!(discs[0].center, (10.0, 20.0));
		assert_eq!(discs[0].radius, 2.0);
		assert_eq!(discs[0].alpha, 0.75);
		assert_eq!(discs[0].style, Palette::light().particle.to_css());
		assert_eq!(surface.global_alpha, 1.0);
	}

	#[test]
	fn test_connection_alpha_bounds() {
		assert_eq!(connection_alpha(0.0, 150.0), 1.0);
		assert_eq!(connection_alpha(150.0, 150.0), 0.0);
		assert_eq!(connection_alpha(200.0, 150.0), 0.0);
		assert!((connection_alpha(75.0, 150.0) - 0.5).abs() < 1e-12);
	}
}
