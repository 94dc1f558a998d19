//! Terrain analysis algorithms
//!
//! Gradient-based products derived from Digital Elevation Models:
//! - Slope: steepness of the surface
//! - Aspect: direction the surface rises towards

mod aspect;
mod gradient;
mod slope;
mod units;

pub use aspect::{aspect, AspectParams};
pub use gradient::gradient;
pub use slope::{slope, SlopeParams};
pub use units::AngleUnits;
