//! neural-bg: animated canvas backgrounds for a portfolio site.
//!
//! This crate provides WASM components that draw a pointer-reactive particle
//! network and a matrix rain backdrop behind the page content.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::neural_network::{
	MatrixRainCanvas, MatrixRainConfig, NetworkConfig, NeuralBackground, NeuralNetwork, SiteConfig,
	ThemeMode,
};
pub use error::{ConfigError, HostError};

/// Id of the optional JSON script block configuring the backgrounds.
pub const CONFIG_ELEMENT_ID: &str = "neural-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("neural-bg: logging initialized");
}

/// Load the site configuration from a script element with id="neural-config".
/// Falls back to defaults when the element is absent or its content is invalid.
pub fn load_site_config() -> SiteConfig {
	let Some(json_text) = config_text() else {
		debug!("neural-bg: no #{} block, using defaults", CONFIG_ELEMENT_ID);
		return SiteConfig::default();
	};

	match SiteConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"neural-bg: loaded config, {} particles",
				config.network.particle_count
			);
			config
		}
		Err(e) => {
			warn!("neural-bg: ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
			SiteConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Loads the configuration from the DOM and layers both backgrounds behind the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let SiteConfig {
		network,
		matrix_rain,
	} = load_site_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<MatrixRainCanvas config=matrix_rain />
		<NeuralBackground config=network />
		<div class="cursor-glow"></div>
	}
}
