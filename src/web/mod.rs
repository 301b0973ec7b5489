//! Browser side of the bridge: Web Audio, Elm ports and document events.
//!
//! Everything here only does something useful when compiled to
//! `wasm32-unknown-unknown` and loaded in a page.

pub mod audio;
pub mod bridge;
pub mod ports;

pub use audio::WebAudioGraph;
pub use bridge::{Bridge, attach_with, boot_with};
