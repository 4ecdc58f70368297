/// AEM Environment Switcher - Chrome Extension for jumping between
/// author/preview/publish tiers
/// Built with Rust + WASM + Yew

mod content_path;
mod env_config;
mod transform;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the content-path extractor for JavaScript access
#[wasm_bindgen]
pub fn extract_content_path(url: &str) -> String {
    content_path::extract_content_path(url)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
