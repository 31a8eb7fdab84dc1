//! Particles and the per-step motion rules.

use rand::Rng;
use rand::distributions::Standard;
use rand::rngs::SmallRng;

use super::config::NetworkConfig;

/// Pixels a particle is pushed per step when it sits right on the pointer.
const REPULSION_STRENGTH: f64 = 2.0;

/// A single drifting particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position in pixels
	pub x: f64,
	/// Vertical position in pixels
	pub y: f64,
	/// Horizontal velocity in pixels per step
	pub vx: f64,
	/// Vertical velocity in pixels per step
	pub vy: f64,
	/// Radius, fixed at creation
	pub size: f64,
	/// Fill opacity in `[0.5, 1.0]`, fixed at creation
	pub opacity: f64,
}

/// Pointer position while it is over the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
	/// Viewport x in pixels
	pub x: f64,
	/// Viewport y in pixels
	pub y: f64,
}

impl Pointer {
	/// Euclidean distance to `p`.
	pub fn distance_to(&self, p: &Particle) -> f64 {
		(p.x - self.x).hypot(p.y - self.y)
	}
}

impl Particle {
	/// Samples a particle uniformly over a `width` x `height` viewport.
	pub fn random(config: &NetworkConfig, width: f64, height: f64, rng: &mut SmallRng) -> Self {
		let size = &config.particle_size;
		Self {
			x: unit(rng) * width,
			y: unit(rng) * height,
			vx: (unit(rng) - 0.5) * config.particle_speed,
			vy: (unit(rng) - 0.5) * config.particle_speed,
			size: size.min + unit(rng) * (size.max - size.min),
			opacity: 0.5 + unit(rng) * 0.5,
		}
	}

	/// Euclidean distance between centres.
	pub fn distance_to(&self, other: &Particle) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}

	/// Advances one integration step and reflects velocity off the viewport edges.
	///
	/// The step is not time-scaled. A particle that crossed an edge has the
	/// matching velocity component negated; [`Particle::clamp`] pulls it back.
	pub fn advance(&mut self, width: f64, height: f64) {
		self.x += self.vx;
		self.y += self.vy;

		if self.x < 0.0 || self.x > width {
			self.vx = -self.vx;
		}
		if self.y < 0.0 || self.y > height {
			self.vy = -self.vy;
		}
	}

	/// Nudges the particle directly away from the pointer when inside `radius`.
	///
	/// The push is positional and does not persist: `(radius - d) / radius * 2`
	/// pixels along the pointer-to-particle direction.
	pub fn repel(&mut self, pointer: Pointer, radius: f64) {
		let (dx, dy) = (self.x - pointer.x, self.y - pointer.y);
		let distance = dx.hypot(dy);
		if distance >= radius {
			return;
		}

		let force = (radius - distance) / radius;
		let angle = dy.atan2(dx);
		self.x += angle.cos() * force * REPULSION_STRENGTH;
		self.y += angle.sin() * force * REPULSION_STRENGTH;
	}

	/// Pulls the position back inside `[0, width] x [0, height]`.
	pub fn clamp(&mut self, width: f64, height: f64) {
		self.x = self.x.clamp(0.0, width.max(0.0));
		self.y = self.y.clamp(0.0, height.max(0.0));
	}
}

/// The fixed-size particle set and the RNG it is (re)generated from.
pub struct ParticleField {
	/// Particles in draw order
	pub particles: Vec<Particle>,
	width: f64,
	height: f64,
	rng: SmallRng,
}

impl ParticleField {
	/// Samples `config.particle_count` particles over the viewport.
	pub fn new(config: &NetworkConfig, width: f64, height: f64, rng: SmallRng) -> Self {
		let mut field = Self {
			particles: Vec::with_capacity(config.particle_count),
			width,
			height,
			rng,
		};
		field.populate(config);
		field
	}

	fn populate(&mut self, config: &NetworkConfig) {
		self.particles.clear();
		for _ in 0..config.particle_count {
			let p = Particle::random(config, self.width, self.height, &mut self.rng);
			self.particles.push(p);
		}
	}

	/// Discards every particle and samples a fresh set for the new bounds.
	pub fn regenerate(&mut self, config: &NetworkConfig, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.populate(config);
	}

	/// Viewport width the field was generated for.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Viewport height the field was generated for.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Moves every particle one step: advance, bounce, repel, clamp.
	pub fn update(&mut self, pointer: Option<Pointer>, pointer_radius: f64) {
		for p in &mut self.particles {
			p.advance(self.width, self.height);
			if let Some(pointer) = pointer {
				p.repel(pointer, pointer_radius);
			}
			p.clamp(self.width, self.height);
		}
	}

	/// Calls `f(a, b, distance)` for every unordered pair closer than `max_distance`.
	///
	/// Pairs are visited as `(i, j)` with `i < j` in particle order.
	pub fn visit_connections<F>(&self, max_distance: f64, mut f: F)
	where
		F: FnMut(&Particle, &Particle, f64),
	{
		for (i, a) in self.particles.iter().enumerate() {
			for b in &self.particles[i + 1..] {
				let distance = a.distance_to(b);
				if distance < max_distance {
					f(a, b, distance);
				}
			}
		}
	}
}

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit(rng: &mut SmallRng) -> f64 {
	rng.sample(Standard)
}
