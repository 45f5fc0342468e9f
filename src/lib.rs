//! Locates anatomical points on a loaded 3D body model and drives the
//! markers that show them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod locator;
pub mod marker;
pub mod math;
pub mod model;
pub mod point;
pub mod resolve;
pub mod status;

#[cfg(test)]
mod test_support;

pub use catalog::{PointCatalog, PointFilter};
pub use config::LocatorConfig;
pub use error::{LocatorError, Result};
pub use locator::{LoadState, PointLocator};
pub use marker::{HighlightRequest, MarkerManager, RenderHost};
pub use point::{Coordinate, PointId, Side};
pub use status::{Status, StatusSink};
