//! Platform abstraction layer
//!
//! The simulation never reads a clock or an input device itself; hosts feed
//! frame time, clock readings and input through these bindings.

#[cfg(target_arch = "wasm32")]
pub mod web;
