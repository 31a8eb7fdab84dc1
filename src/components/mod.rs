//! Leptos components rendered by the site shell.

pub mod neural_network;
