//! Camera-space frustum clipping.
//!
//! Triangles are clipped with the Sutherland-Hodgman algorithm against six
//! planes defined by a point and a unit normal in camera space, then
//! re-triangulated as a fan:
//!
//! - [`polygon`]: the fixed-capacity polygon and per-plane clipping step.
//! - [`frustum`]: the six planes built from the projection parameters.
//!
//! Clipping happens before projection so geometry behind the camera never
//! reaches the perspective divide.

pub mod frustum;
pub mod polygon;

pub use frustum::{Frustum, FrustumPlane, PlaneSide};
pub use polygon::{ClipVertex, Polygon, MAX_POLYGON_VERTICES};
