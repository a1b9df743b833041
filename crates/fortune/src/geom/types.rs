//! Basic types and tolerances for the sweep.
//!
//! - `GeomCfg`: centralizes the root nudge, the sweep advance, and the
//!   vertex-merge tolerance.
//! - `Point`: plain 2D point in screen coordinates (y grows downward), with
//!   bitwise hashing so site pairs can key hash maps.
//! - `Rect`: axis-aligned working area; geometry is clipped to it with a
//!   fixed one-unit margin.

use nalgebra::Vector2;
use thiserror::Error;

/// Geometry configuration (tolerances).
///
/// Defaults match the production sweep; zero all fields to exercise the
/// exact closed-form paths in tests.
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Symmetric offset applied to the two quadratic roots of a breakpoint,
    /// pushing them apart so near-tangent parabolas keep distinct crossings.
    pub root_nudge: f64,
    /// Amount the sweepline moves past an event's coordinate before the
    /// event is handled; keeps `site.y < sweep_y` strict for every live arc.
    pub sweep_advance: f64,
    /// Distance under which a ray closed at the vertex it was born at is
    /// treated as degenerate and re-opened outward instead of recorded.
    pub vertex_merge: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            root_nudge: 1e-5,
            sweep_advance: 1e-9,
            vertex_merge: 1e-3,
        }
    }
}

impl GeomCfg {
    /// All tolerances zero; closed-form results without nudges.
    pub fn exact() -> Self {
        Self {
            root_nudge: 0.0,
            sweep_advance: 0.0,
            vertex_merge: 0.0,
        }
    }
}

/// 2D point, screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn coords(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.coords() - other.coords()).norm()
    }

    /// Bit pattern of both coordinates; used for hashing and exact keying.
    #[inline]
    pub fn to_bits(self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl std::ops::Add<Vector2<f64>> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Vector2<f64>) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Vector2<f64>;
    #[inline]
    fn sub(self, rhs: Point) -> Vector2<f64> {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Circle with center and radius, as returned by `circumcircle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// y of the circle's lowest point on screen; the sweep position at which
    /// the corresponding arc triple vanishes.
    #[inline]
    pub fn vanish_y(&self) -> f64 {
        self.center.y + self.radius
    }
}

/// Axis-aligned working rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    #[inline]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle with its min corner at the origin.
    #[inline]
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True if `p` lies inside the rectangle grown by `margin` on all sides.
    #[inline]
    pub fn contains_with_margin(&self, p: Point, margin: f64) -> bool {
        p.x >= self.min_x - margin
            && p.x <= self.max_x + margin
            && p.y >= self.min_y - margin
            && p.y <= self.max_y + margin
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::sized(800.0, 600.0)
    }
}

/// Errors from the geometry kernel.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeomError {
    /// Collinear or coincident inputs where a circle was required.
    #[error("degenerate geometry: points are collinear or coincident")]
    DegenerateGeometry,
}
