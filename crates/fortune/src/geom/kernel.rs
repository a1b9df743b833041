//! Closed-form kernel: parabolas, breakpoints, circumcircles, reflections.
//!
//! A site `f` with the directrix at `y = d` (screen coordinates, `f.y < d`)
//! traces the parabola of points equidistant from `f` and the line. The
//! beachline is the pointwise-max envelope of these parabolas; breakpoints
//! are envelope crossings and lie on the bisector of the two foci.

use nalgebra::Vector2;

use super::types::{Circle, GeomCfg, GeomError, Point};

/// y-value of the parabola with focus `focus` and directrix `y = sweep_y`,
/// evaluated at `x`. Requires `focus.y != sweep_y`.
#[inline]
pub fn parabola_y(x: f64, focus: Point, sweep_y: f64) -> f64 {
    let dx = x - focus.x;
    (dx * dx + focus.y * focus.y - sweep_y * sweep_y) / (2.0 * (focus.y - sweep_y))
}

/// Slope dy/dx of the same parabola at `x`.
#[inline]
pub fn parabola_derivative(x: f64, focus: Point, sweep_y: f64) -> f64 {
    (x - focus.x) / (focus.y - sweep_y)
}

/// x of the breakpoint between the arcs of `a` and `b`, for a beachline
/// adjacency with `a`'s arc on the left.
///
/// The two parabolas cross at the roots of a quadratic. Root selection
/// reduces to one comparison: when `a` sits lower on screen than `b`
/// (`a.y > b.y`) the right crossing separates the pair, otherwise the left
/// one. Equal heights degenerate to the vertical bisector midpoint. The
/// roots are pushed apart by `cfg.root_nudge` so near-tangent crossings
/// stay distinct.
pub fn breakpoint_x(a: Point, b: Point, sweep_y: f64, cfg: &GeomCfg) -> f64 {
    let qa = 2.0 * (b.y - a.y);
    if qa == 0.0 {
        return 0.5 * (a.x + b.x);
    }
    let qb = 4.0 * (a.y * b.x - b.y * a.x + sweep_y * a.x - sweep_y * b.x);
    let qc = (a.x * a.x + a.y * a.y - sweep_y * sweep_y) * (2.0 * b.y - 2.0 * sweep_y)
        - (b.x * b.x + b.y * b.y - sweep_y * sweep_y) * (2.0 * a.y - 2.0 * sweep_y);
    // Tangent parabolas can push the discriminant to a tiny negative value.
    let sq = (qb * qb - 4.0 * qa * qc).abs().sqrt();
    let r1 = (-qb + sq) / (2.0 * qa) + cfg.root_nudge;
    let r2 = (-qb - sq) / (2.0 * qa) - cfg.root_nudge;
    if a.y > b.y {
        r1.max(r2)
    } else {
        r1.min(r2)
    }
}

/// Circle through three points. Errors if they are collinear or coincident.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Result<Circle, GeomError> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d == 0.0 {
        return Err(GeomError::DegenerateGeometry);
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point::new(ux, uy);
    Ok(Circle {
        center,
        radius: center.distance_to(a),
    })
}

/// Reflection of `p` across the infinite line through `a` and `b`.
/// Coincident `a` and `b` leave `p` unchanged.
pub fn mirror_point(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len2 = ab.dot(&ab);
    if len2 == 0.0 {
        return p;
    }
    let t = (p - a).dot(&ab) / len2;
    let foot = a + ab * t;
    Point::new(2.0 * foot.x - p.x, 2.0 * foot.y - p.y)
}

/// Counterclockwise perpendicular of `v`.
#[inline]
pub fn perp(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Unit vector in the direction of `v`; zero or non-finite input is
/// returned unchanged.
#[inline]
pub fn unit_or_zero(v: Vector2<f64>) -> Vector2<f64> {
    let n = v.norm();
    if !n.is_finite() || n <= 0.0 {
        v
    } else {
        v / n
    }
}
