//! 2D geometry for the sweepline (screen coordinates, y grows downward).
//!
//! Purpose
//! - Provide the point/rect/tolerance types shared across the sweep and a
//!   small closed-form kernel: parabola evaluation, breakpoint roots,
//!   circumcircles, reflections.
//! - Keep every tolerance in `GeomCfg` so callers can run the exact paths
//!   (all epsilons zero) or the nudged production defaults.
//!
//! Conventions
//! - The directrix is a horizontal line `y = sweep_y`; a site's arc only
//!   exists while `site.y < sweep_y`.
//! - All kernel functions are free functions over `Point`; no hidden state.

mod kernel;
pub mod rand;
mod types;

pub use kernel::{
    breakpoint_x, circumcircle, mirror_point, parabola_derivative, parabola_y, perp, unit_or_zero,
};
pub use self::rand::uniform_sites;
pub use types::{Circle, GeomCfg, GeomError, Point, Rect};
