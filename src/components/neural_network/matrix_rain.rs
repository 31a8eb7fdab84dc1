//! Falling-glyph "matrix rain" backdrop.
//!
//! Unlike the particle network this effect never clears: each step paints a
//! translucent overlay so older glyphs fade into trails. Steps are coalesced
//! to a fixed interval on top of the shared frame clock.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::animator::{Animator, Scene};
use super::config::MatrixRainConfig;
use super::host::DrawingSurface;
use super::particles::unit;

/// Matrix rain bound to a host environment.
pub type MatrixRainEffect<E> = Animator<E, MatrixRain>;

/// Falling glyph columns over a fading canvas.
pub struct MatrixRain {
	/// Current row (in glyph units) of each column's head
	pub drops: Vec<f64>,
	width: f64,
	height: f64,
	glyphs: Vec<char>,
	font: String,
	last_step: Option<f64>,
	rng: SmallRng,
	config: MatrixRainConfig,
}

impl MatrixRain {
	/// Seeds one drop per column at a random row. `config.seed` wins over `seed`.
	pub fn new(config: MatrixRainConfig, width: f64, height: f64, seed: u64) -> Self {
		let mut glyphs: Vec<char> = config.glyphs.chars().collect();
		if glyphs.is_empty() {
			glyphs.push('0');
		}
		let mut rain = Self {
			drops: Vec::new(),
			width,
			height,
			glyphs,
			font: format!("{}px monospace", config.font_size),
			last_step: None,
			rng: SmallRng::seed_from_u64(config.seed.unwrap_or(seed)),
			config,
		};
		rain.fit_columns();
		rain
	}

	/// Number of glyph columns across the viewport.
	pub fn columns(&self) -> usize {
		self.drops.len()
	}

	/// Grows or shrinks the column set to the current width. Surviving columns
	/// keep their drop; new ones start at a random row.
	fn fit_columns(&mut self) {
		let columns = (self.width / self.config.font_size).floor().max(0.0) as usize;
		let rows = self.height / self.config.font_size;
		self.drops.truncate(columns);
		while self.drops.len() < columns {
			let row = unit(&mut self.rng) * rows;
			self.drops.push(row);
		}
	}

	/// Whether enough time has passed since the last drawn step.
	fn due(&self, now: f64) -> bool {
		self.last_step
			.is_none_or(|last| now - last >= self.config.interval_ms)
	}

	/// Draws one step unconditionally.
	pub fn step<S: DrawingSurface>(&mut self, surface: &mut S) {
		let font_size = self.config.font_size;

		surface.set_fill_style(&self.config.fade.to_css());
		surface.fill_rect(0.0, 0.0, self.width, self.height);

		surface.set_fill_style(&self.config.glyph.to_css());
		surface.set_font(&self.font);

		let mut buf = [0u8; 4];
		for (i, head) in self.drops.iter_mut().enumerate() {
			let pick = (unit(&mut self.rng) * self.glyphs.len() as f64) as usize;
			let glyph = self.glyphs[pick.min(self.glyphs.len() - 1)];
			surface.fill_text(glyph.encode_utf8(&mut buf), i as f64 * font_size, *head * font_size);

			if *head * font_size > self.height && unit(&mut self.rng) < self.config.reset_chance {
				*head = 0.0;
			}
			*head += 1.0;
		}
	}
}

impl Scene for MatrixRain {
	type Config = MatrixRainConfig;

	const NAME: &'static str = "matrix rain";

	fn create(config: &MatrixRainConfig, width: f64, height: f64, seed: u64) -> Self {
		MatrixRain::new(config.clone(), width, height, seed)
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit_columns();
	}

	fn frame<S: DrawingSurface>(&mut self, surface: &mut S, now: f64) {
		if !self.due(now) {
			return;
		}
		self.last_step = Some(now);
		self.step(surface);
	}
}
