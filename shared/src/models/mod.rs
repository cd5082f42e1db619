//! Domain models for the water monitoring platform

mod analysis;
mod geometry;
mod insight;
mod water_index;
mod weather;
mod zone;

pub use analysis::*;
pub use geometry::*;
pub use insight::*;
pub use water_index::*;
pub use weather::*;
pub use zone::*;
