mod app;
mod components;
mod download;
mod layers_panel;
mod layout;
mod toolbar;
mod utils;

pub mod config;
pub mod error;
pub mod interaction;
pub mod loader;
pub mod raster;
pub mod scene;
pub mod session;
pub mod surface;
pub mod tools;
pub mod types;
pub mod uploads;

use std::rc::Rc;

use app::{App, AppProps};
use config::EditorConfig;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    let config = EditorConfig::from_document();
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
