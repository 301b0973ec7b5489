pub mod config;
pub mod error;
pub mod gate;
pub mod graph;
pub mod logging;
pub mod reconciler;
pub mod relay;
pub mod sound;
pub mod web;

use wasm_bindgen::prelude::*;

pub use crate::config::BridgeConfig;
pub use crate::error::BridgeError;
pub use crate::reconciler::{Reconciler, ReconcileStats};
pub use crate::sound::{SoundSpec, WaveType};
use crate::web::Bridge;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the menro-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: wire the audio bridge to an already initialised Elm app.
///
/// `config` may be `undefined` for the defaults.
#[wasm_bindgen]
pub fn attach(app: JsValue, config: JsValue) -> Result<Bridge, JsValue> {
    let config = web::bridge::prepare(config)?;
    Ok(web::attach_with(&app, &config)?)
}

/// WASM-exposed: initialise the Elm app from the global `Elm` namespace,
/// mount it, and wire the audio bridge to it.
#[wasm_bindgen]
pub fn boot(config: JsValue) -> Result<Bridge, JsValue> {
    let config = web::bridge::prepare(config)?;
    Ok(web::boot_with(&config)?)
}
