//! Geometry and animation that feed the galaxy renderer.

pub mod palette;
pub mod spiral;
pub mod curve;
pub mod spline;
pub mod relations;
pub mod constellation;
pub mod camera;
pub mod bubble;
pub mod vertex;
