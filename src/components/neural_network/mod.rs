//! Animated canvas backgrounds for the portfolio site.
//!
//! Two effects share one frame-loop driver:
//! - a particle network whose nearby particles are joined by fading lines and
//!   which pushes particles away from the pointer
//! - a falling-glyph "matrix rain" backdrop
//!
//! The simulation and drawing code only talk to the host through the traits in
//! [`host`], so everything except [`web`] runs under plain unit tests.
//!
//! # Example
//!
//! ```ignore
//! use neural_bg::{NeuralBackground, NetworkConfig};
//!
//! let config = NetworkConfig { particle_count: 120, ..NetworkConfig::default() };
//! view! { <NeuralBackground config=config /> }
//! ```

mod animator;
mod component;
pub mod config;
pub mod host;
mod lifecycle;
mod matrix_rain;
mod network;
mod particles;
mod render;
mod state;
#[cfg(test)]
mod testing;
pub mod web;

pub use animator::{Animator, Scene};
pub use component::{MatrixRainCanvas, NeuralBackground};
pub use config::{Color, MatrixRainConfig, NetworkConfig, Palette, SiteConfig, SizeRange, ThemeMode};
pub use host::{DrawingSurface, Environment, FrameClock, HostEvent};
pub use lifecycle::PageBinding;
pub use matrix_rain::{MatrixRain, MatrixRainEffect};
pub use network::NeuralNetwork;
pub use particles::{Particle, ParticleField, Pointer};
pub use state::SimulationState;
pub use web::{CanvasSurface, WebEnvironment};
