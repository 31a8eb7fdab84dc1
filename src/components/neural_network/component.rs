//! Leptos components mounting the background canvases.
//!
//! Each component renders a full-viewport canvas and, once it is in the DOM,
//! starts an [`Animator`] over the browser window. The animator stops when the
//! page is hidden and resumes if the page returns from the back/forward cache.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;

use super::animator::{Animator, Scene};
use super::config::{MatrixRainConfig, NetworkConfig};
use super::lifecycle::PageBinding;
use super::matrix_rain::MatrixRain;
use super::state::SimulationState;
use super::web::WebEnvironment;

const CURSOR_GLOW_SELECTOR: &str = ".cursor-glow";

const CANVAS_STYLE: &str =
	"position: fixed; top: 0; left: 0; width: 100vw; height: 100vh; pointer-events: none;";

type Binding<Sc> = PageBinding<WebEnvironment, Sc>;

type Mounted<Sc> = Rc<RefCell<Option<Rc<Binding<Sc>>>>>;

/// Starts `Sc` on canvas `id`, runs `on_mount` after every (re)start and ties
/// the animator to `pagehide`/`pageshow`. `None` when there is no browser
/// window or no such canvas.
fn start<Sc: Scene>(
	id: &str,
	config: Sc::Config,
	on_mount: impl Fn(&Animator<WebEnvironment, Sc>) + 'static,
) -> Option<Rc<Binding<Sc>>> {
	let env = match WebEnvironment::new() {
		Ok(env) => env,
		Err(e) => {
			warn!("neural-bg: {} not started: {}", Sc::NAME, e);
			return None;
		}
	};

	let binding = Rc::new(PageBinding::new(Animator::new(env, config), id, on_mount));
	if !binding.start() {
		return None;
	}

	let (hidden, shown) = (Rc::downgrade(&binding), Rc::downgrade(&binding));
	let registered = binding.animator().env().on_page_transition(
		move || {
			if let Some(binding) = hidden.upgrade() {
				binding.page_hidden();
			}
		},
		move |persisted| {
			if let Some(binding) = shown.upgrade() {
				binding.page_shown(persisted);
			}
		},
	);
	if let Err(e) = registered {
		warn!("neural-bg: {} will not follow page visibility: {}", Sc::NAME, e);
	}
	Some(binding)
}

/// Renders the particle network background on a fixed, full-viewport canvas.
///
/// Follows the document's `data-theme` and `themeChange` events, and moves a
/// `.cursor-glow` element with the pointer when pointer interaction is on.
#[component]
pub fn NeuralBackground(
	/// Simulation settings; defaults when omitted.
	#[prop(optional)]
	config: NetworkConfig,
	/// Id of the rendered canvas.
	#[prop(default = "neural-bg")]
	id: &'static str,
) -> impl IntoView {
	let mounted: Mounted<SimulationState> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		if mounted.borrow().is_some() {
			return;
		}
		let mouse_interaction = config.mouse_interaction;
		let network = start::<SimulationState>(id, config.clone(), move |network| {
			if let Some(theme) = network.env().document_theme() {
				network.on_theme_change(theme);
			}
			if !mouse_interaction {
				return;
			}
			match network.env().track_cursor_glow(CURSOR_GLOW_SELECTOR) {
				Ok(Some(glow)) => network.adopt_listener(glow),
				Ok(None) => {}
				Err(e) => warn!("neural-bg: cursor glow unavailable: {}", e),
			}
		});
		*mounted.borrow_mut() = network;
	});

	view! { <canvas id=id class="neural-bg" style=CANVAS_STYLE /> }
}

/// Renders the matrix rain backdrop on a fixed, full-viewport canvas.
#[component]
pub fn MatrixRainCanvas(
	/// Rain settings; defaults when omitted.
	#[prop(optional)]
	config: MatrixRainConfig,
	/// Id of the rendered canvas.
	#[prop(default = "matrix-rain")]
	id: &'static str,
) -> impl IntoView {
	let mounted: Mounted<MatrixRain> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		if mounted.borrow().is_some() {
			return;
		}
		*mounted.borrow_mut() = start::<MatrixRain>(id, config.clone(), |_| {});
	});

	view! { <canvas id=id class="matrix-rain" style=CANVAS_STYLE /> }
}
