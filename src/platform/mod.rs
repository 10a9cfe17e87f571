//! Platform abstraction layer
//!
//! - `input`: key names to engine inputs
//! - `text`: terminal board rendering
//! - `web`: browser bindings (wasm32 only)

pub mod input;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{parse_key, parse_line};
