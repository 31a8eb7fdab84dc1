//! Configuration records for the background effects.
//!
//! All records deserialize from camelCase JSON with every field optional, so a
//! page can override just the values it cares about:
//!
//! ```json
//! { "network": { "particleCount": 120, "colors": { "particle": "#ff8800" } } }
//! ```

use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	/// Red channel
	pub r: u8,
	/// Green channel
	pub g: u8,
	/// Blue channel
	pub b: u8,
	/// Alpha in `[0, 1]`
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha `a` in `[0, 1]`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same channels, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS text: `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Parses CSS hex (`#rgb`, `#rrggbb`, `#rrggbbaa`) and `rgb()`/`rgba()` notation.
impl FromStr for Color {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || ConfigError::InvalidColor(s.to_string());
		let trimmed = s.trim();

		if let Some(hex) = trimmed.strip_prefix('#') {
			if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
				return Err(invalid());
			}
			let channel = |range: std::ops::Range<usize>| {
				u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
			};
			return match hex.len() {
				3 => {
					let nibble = |i: usize| channel(i..i + 1).map(|v| v * 17);
					Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
				}
				6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
				8 => Ok(Color::rgba(
					channel(0..2)?,
					channel(2..4)?,
					channel(4..6)?,
					channel(6..8)? as f64 / 255.0,
				)),
				_ => Err(invalid()),
			};
		}

		let inner = trimmed
			.strip_prefix("rgba(")
			.or_else(|| trimmed.strip_prefix("rgb("))
			.and_then(|rest| rest.strip_suffix(')'))
			.ok_or_else(invalid)?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		if parts.len() != 3 && parts.len() != 4 {
			return Err(invalid());
		}
		let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
		let a = match parts.get(3) {
			Some(a) => a
				.parse::<f64>()
				.ok()
				.filter(|a| (0.0..=1.0).contains(a))
				.ok_or_else(invalid)?,
			None => 1.0,
		};
		Ok(Color::rgba(
			channel(parts[0])?,
			channel(parts[1])?,
			channel(parts[2])?,
			a,
		))
	}
}

impl TryFrom<String> for Color {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

/// Page color scheme, mirrored from the document's `data-theme` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
	/// Dark background (the page default)
	#[default]
	Dark,
	/// Light background
	Light,
}

impl FromStr for ThemeMode {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"dark" => Ok(ThemeMode::Dark),
			"light" => Ok(ThemeMode::Light),
			_ => Err(()),
		}
	}
}

/// Colors used by the particle network.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
	/// Particle fill
	pub particle: Color,
	/// Base connection stroke (its alpha multiplies the distance fade)
	pub connection: Color,
	/// Connection stroke when either endpoint is near the pointer
	pub connection_hover: Color,
}

impl Palette {
	/// Neon green on dark backgrounds (default)
	pub fn dark() -> Self {
		Self {
			particle: Color::rgb(0, 255, 136),
			connection: Color::rgba(0, 255, 136, 0.15),
			connection_hover: Color::rgba(0, 212, 255, 0.3),
		}
	}

	/// Deeper greens and blues that stay visible on light backgrounds
	pub fn light() -> Self {
		Self {
			particle: Color::rgb(0, 150, 100),
			connection: Color::rgba(0, 150, 100, 0.25),
			connection_hover: Color::rgba(0, 120, 200, 0.4),
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::dark()
	}
}

/// Inclusive `{min, max}` sampling range.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct SizeRange {
	/// Lower bound
	pub min: f64,
	/// Upper bound
	pub max: f64,
}

/// Particle network configuration. Immutable once a simulation is built from it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
	/// Number of particles maintained.
	pub particle_count: usize,
	/// Radius sampling range.
	pub particle_size: SizeRange,
	/// Per-axis velocity is sampled as `(random - 0.5) * particle_speed`.
	pub particle_speed: f64,
	/// Maximum distance at which two particles are linked.
	pub connection_distance: f64,
	/// Enables pointer repulsion, near-pointer highlighting and cursor glow.
	pub mouse_interaction: bool,
	/// Pointer influence radius for both highlighting and repulsion.
	pub pointer_radius: f64,
	/// Stroke width of an ordinary connection.
	pub connection_width: f64,
	/// Stroke width of a connection near the pointer.
	pub hover_connection_width: f64,
	/// Palette for the dark theme.
	pub colors: Palette,
	/// Palette for the light theme.
	pub light_colors: Palette,
	/// Fixed RNG seed. Seeded from host entropy when absent.
	pub seed: Option<u64>,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			particle_count: 80,
			particle_size: SizeRange { min: 1.0, max: 3.0 },
			particle_speed: 0.5,
			connection_distance: 150.0,
			mouse_interaction: true,
			pointer_radius: 150.0,
			connection_width: 0.5,
			hover_connection_width: 1.5,
			colors: Palette::dark(),
			light_colors: Palette::light(),
			seed: None,
		}
	}
}

impl NetworkConfig {
	/// Palette for the given page theme.
	pub fn palette(&self, theme: ThemeMode) -> &Palette {
		match theme {
			ThemeMode::Dark => &self.colors,
			ThemeMode::Light => &self.light_colors,
		}
	}

	/// Checks the numeric invariants the simulation relies on.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let SizeRange { min, max } = self.particle_size;
		if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
			return Err(ConfigError::InvalidRange {
				field: "particleSize",
				min,
				max,
			});
		}
		non_negative("particleSpeed", self.particle_speed)?;
		positive("connectionDistance", self.connection_distance)?;
		positive("pointerRadius", self.pointer_radius)?;
		non_negative("connectionWidth", self.connection_width)?;
		non_negative("hoverConnectionWidth", self.hover_connection_width)?;
		Ok(())
	}
}

/// Glyphs used by the matrix rain: katakana, digits and Latin capitals.
pub const MATRIX_GLYPHS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Matrix rain configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatrixRainConfig {
	/// Glyph size in pixels; also the column and row pitch.
	pub font_size: f64,
	/// Minimum milliseconds between drawn steps.
	pub interval_ms: f64,
	/// Translucent overlay painted each step to fade older glyphs.
	pub fade: Color,
	/// Glyph fill.
	pub glyph: Color,
	/// Chance per step that a drop past the bottom edge restarts at the top.
	pub reset_chance: f64,
	/// Characters a glyph is picked from.
	pub glyphs: String,
	/// Fixed RNG seed. Seeded from host entropy when absent.
	pub seed: Option<u64>,
}

impl Default for MatrixRainConfig {
	fn default() -> Self {
		Self {
			font_size: 14.0,
			interval_ms: 50.0,
			fade: Color::rgba(10, 10, 15, 0.05),
			// #00ff8830
			glyph: Color::rgba(0, 255, 136, 0x30 as f64 / 255.0),
			reset_chance: 0.025,
			glyphs: MATRIX_GLYPHS.to_string(),
			seed: None,
		}
	}
}

impl MatrixRainConfig {
	/// Checks the pitch, interval and reset probability.
	pub fn validate(&self) -> Result<(), ConfigError> {
		positive("fontSize", self.font_size)?;
		non_negative("intervalMs", self.interval_ms)?;
		if !(0.0..=1.0).contains(&self.reset_chance) {
			return Err(ConfigError::InvalidRange {
				field: "resetChance",
				min: 0.0,
				max: 1.0,
			});
		}
		Ok(())
	}
}

/// Everything the page can configure, read from the `neural-config` script block.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
	/// Particle network settings
	pub network: NetworkConfig,
	/// Matrix rain settings
	pub matrix_rain: MatrixRainConfig,
}

impl SiteConfig {
	/// Parses and validates a JSON configuration block.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: SiteConfig = serde_json::from_str(json)?;
		config.network.validate()?;
		config.matrix_rain.validate()?;
		Ok(config)
	}
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(ConfigError::NonPositive { field, value })
	}
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() && value >= 0.0 {
		Ok(())
	} else {
		Err(ConfigError::Negative { field, value })
	}
}
