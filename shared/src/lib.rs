//! Shared types and models for the water monitoring platform
//!
//! This crate holds the pure analysis pipeline and the wire types shared
//! between the backend, the browser (via WASM), and other components.

pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use models::*;
pub use pipeline::*;
pub use types::*;
pub use validation::*;
