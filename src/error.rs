//! Error types for configuration loading and host (browser) access.

use std::fmt;

use wasm_bindgen::JsValue;

/// Errors raised while parsing or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
	/// A color string that is not `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()` or `rgba()`.
	InvalidColor(String),
	/// A `{min, max}` range with `min > max` or negative bounds.
	InvalidRange {
		/// JSON key of the offending value
		field: &'static str,
		/// Lower bound as given
		min: f64,
		/// Upper bound as given
		max: f64,
	},
	/// A value that must be strictly positive (and finite).
	NonPositive {
		/// JSON key of the offending value
		field: &'static str,
		/// Value as given
		value: f64,
	},
	/// A value that must be non-negative (and finite).
	Negative {
		/// JSON key of the offending value
		field: &'static str,
		/// Value as given
		value: f64,
	},
	/// Malformed JSON in the page configuration block.
	Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::InvalidColor(s) => write!(f, "invalid color: {:?}", s),
			ConfigError::InvalidRange { field, min, max } => {
				write!(f, "invalid range for {}: min {} > max {} or negative", field, min, max)
			}
			ConfigError::NonPositive { field, value } => {
				write!(f, "{} must be positive, got {}", field, value)
			}
			ConfigError::Negative { field, value } => {
				write!(f, "{} must not be negative, got {}", field, value)
			}
			ConfigError::Parse(e) => write!(f, "failed to parse configuration: {}", e),
		}
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigError::Parse(e) => Some(e),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		ConfigError::Parse(e)
	}
}

/// Errors raised by the host environment.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
	/// No global `window` (not running in a browser main thread).
	NoWindow,
	/// The window has no document.
	NoDocument,
	/// `requestAnimationFrame` threw.
	FrameRequest(String),
	/// Registering an event listener threw.
	Listener {
		/// DOM event name
		event: &'static str,
		/// Text of the thrown JS value
		message: String,
	},
}

impl HostError {
	pub(crate) fn frame_request(err: JsValue) -> Self {
		HostError::FrameRequest(js_message(&err))
	}

	pub(crate) fn listener(event: &'static str, err: JsValue) -> Self {
		HostError::Listener {
			event,
			message: js_message(&err),
		}
	}
}

impl fmt::Display for HostError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HostError::NoWindow => write!(f, "no global window available"),
			HostError::NoDocument => write!(f, "window has no document"),
			HostError::FrameRequest(msg) => write!(f, "requestAnimationFrame failed: {}", msg),
			HostError::Listener { event, message } => {
				write!(f, "failed to register {:?} listener: {}", event, message)
			}
		}
	}
}

impl std::error::Error for HostError {}

/// Best-effort text for a thrown JS value.
fn js_message(err: &JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
