//! Planar Voronoi diagrams via Fortune's sweepline.
//!
//! Purpose
//! - Compute the Voronoi edge set of a planar point set by sweeping a
//!   horizontal directrix downward (increasing y) over the sites.
//! - Keep the numerics explicit (eps-aware via `GeomCfg`) and the state
//!   inspectable: beachline, pending events, and open rays are all
//!   queryable between steps.
//!
//! Layout
//! - `geom`: points, working rectangle, tolerances, and the parabola /
//!   circumcircle kernel the sweep is built on.
//! - `sweep`: event queue, beachline, half-edge assembly, and the driver
//!   that ties them together.

pub mod geom;
pub mod sweep;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{GeomCfg, Point, Rect};
pub use nalgebra::Vector2 as Vec2;
pub use sweep::{Edge, SweepError, VoronoiSweep};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom::{uniform_sites, GeomCfg, GeomError, Point, Rect};
    pub use crate::sweep::{Edge, SweepError, SweepPhase, VoronoiSweep};
    pub use nalgebra::Vector2 as Vec2;
}
