//! Half-edge assembly and clipping.
//!
//! Open rays live in a hash map keyed by the (canonicalized) site pair they
//! separate. Opening is idempotent per pair; closing removes the ray and
//! yields a finished segment. Whatever is still open when the queue drains
//! is a true infinite edge and gets clipped against the working rectangle:
//! a ray anchored at a vertex clips one way, a breakpoint-born ray carries
//! the whole bisector line through its start.

use std::collections::HashMap;

use nalgebra::Vector2;

use crate::geom::{Point, Rect};

use super::types::{Edge, HalfEdge, SitePair};

/// Clipping happens against the working rectangle grown by this margin on
/// all sides, so edges visibly leave the area instead of stopping on it.
pub(crate) const CLIP_MARGIN: f64 = 1.0;

/// Open half-edges keyed by site pair.
#[derive(Clone, Debug, Default)]
pub struct HalfEdgeMap {
    open: HashMap<SitePair, HalfEdge>,
}

impl HalfEdgeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a ray for `pair` unless one is already open. `anchored` marks
    /// rays whose start is a diagram vertex rather than a breakpoint birth.
    pub fn open(
        &mut self,
        pair: SitePair,
        start: Point,
        sweep_start: f64,
        direction: Vector2<f64>,
        anchored: bool,
    ) {
        self.open.entry(pair).or_insert(HalfEdge {
            start,
            sweep_start,
            direction,
            pair,
            anchored,
        });
    }

    pub fn get(&self, pair: &SitePair) -> Option<&HalfEdge> {
        self.open.get(pair)
    }

    /// Close the open ray for `pair` at `end`, yielding the finished
    /// segment. `None` if no ray is open for the pair.
    pub fn close(&mut self, pair: &SitePair, end: Point) -> Option<Edge> {
        self.open.remove(pair).map(|he| Edge {
            start: he.start,
            end,
        })
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HalfEdge> {
        self.open.values()
    }

    /// Clip every remaining ray against `rect` (plus margin) and drain the
    /// map. Rays that never enter the area are dropped.
    pub fn clip_all(&mut self, rect: &Rect) -> Vec<Edge> {
        let mut out: Vec<Edge> = self
            .open
            .values()
            .filter_map(|he| {
                if he.anchored {
                    clip_ray(he, rect)
                } else {
                    clip_line(he, rect)
                }
            })
            .collect();
        // Deterministic output order regardless of hash iteration.
        out.sort_by(|a, b| {
            a.start
                .x
                .total_cmp(&b.start.x)
                .then(a.start.y.total_cmp(&b.start.y))
                .then(a.end.x.total_cmp(&b.end.x))
                .then(a.end.y.total_cmp(&b.end.y))
        });
        self.open.clear();
        out
    }
}

/// Parameter window of the rect slab `[lo, hi]` along one axis, (s, d)
/// being start and direction components. `None` means no overlap is
/// possible on this axis.
fn axis_window(s: f64, d: f64, lo: f64, hi: f64) -> Option<(f64, f64)> {
    if d == 0.0 {
        if s < lo || s > hi {
            None
        } else {
            Some((f64::NEG_INFINITY, f64::INFINITY))
        }
    } else {
        let t0 = (lo - s) / d;
        let t1 = (hi - s) / d;
        Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
    }
}

/// Clip a ray to `rect` grown by the standard margin. A ray starting
/// outside is clamped to its entry point; a ray that never enters the area
/// is discarded.
pub fn clip_ray(he: &HalfEdge, rect: &Rect) -> Option<Edge> {
    let (wx, wy) = (
        axis_window(
            he.start.x,
            he.direction.x,
            rect.min_x - CLIP_MARGIN,
            rect.max_x + CLIP_MARGIN,
        )?,
        axis_window(
            he.start.y,
            he.direction.y,
            rect.min_y - CLIP_MARGIN,
            rect.max_y + CLIP_MARGIN,
        )?,
    );
    let t_enter = wx.0.max(wy.0).max(0.0);
    let t_exit = wx.1.min(wy.1);
    if !t_exit.is_finite() || t_exit <= t_enter {
        return None;
    }
    Some(Edge {
        start: he.start + he.direction * t_enter,
        end: he.start + he.direction * t_exit,
    })
}

/// Clip the full line through `he.start` along `he.direction`, both
/// directions, to `rect` grown by the standard margin. Breakpoint-born
/// edges that never met a vertex cover the whole bisector, not just the
/// half the ray points along.
pub fn clip_line(he: &HalfEdge, rect: &Rect) -> Option<Edge> {
    let (wx, wy) = (
        axis_window(
            he.start.x,
            he.direction.x,
            rect.min_x - CLIP_MARGIN,
            rect.max_x + CLIP_MARGIN,
        )?,
        axis_window(
            he.start.y,
            he.direction.y,
            rect.min_y - CLIP_MARGIN,
            rect.max_y + CLIP_MARGIN,
        )?,
    );
    let t_enter = wx.0.max(wy.0);
    let t_exit = wx.1.min(wy.1);
    if !t_enter.is_finite() || !t_exit.is_finite() || t_exit <= t_enter {
        return None;
    }
    Some(Edge {
        start: he.start + he.direction * t_enter,
        end: he.start + he.direction * t_exit,
    })
}

/// Clamp a finished segment to `rect` grown by the standard margin.
/// Segments fully outside, and degenerate zero-length results, are dropped.
pub fn clip_segment(edge: Edge, rect: &Rect) -> Option<Edge> {
    let d = edge.end - edge.start;
    if d.norm() == 0.0 {
        return None;
    }
    let (wx, wy) = (
        axis_window(
            edge.start.x,
            d.x,
            rect.min_x - CLIP_MARGIN,
            rect.max_x + CLIP_MARGIN,
        )?,
        axis_window(
            edge.start.y,
            d.y,
            rect.min_y - CLIP_MARGIN,
            rect.max_y + CLIP_MARGIN,
        )?,
    );
    let t_enter = wx.0.max(wy.0).max(0.0);
    let t_exit = wx.1.min(wy.1).min(1.0);
    if t_exit <= t_enter {
        return None;
    }
    Some(Edge {
        start: edge.start + d * t_enter,
        end: edge.start + d * t_exit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn pair() -> SitePair {
        SitePair::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
    }

    fn ray(start: Point, dir: Vector2<f64>) -> HalfEdge {
        HalfEdge {
            start,
            sweep_start: 0.0,
            direction: dir,
            pair: pair(),
            anchored: true,
        }
    }

    #[test]
    fn open_is_idempotent_per_pair() {
        let mut map = HalfEdgeMap::new();
        let p = pair();
        map.open(p, Point::new(1.0, 1.0), 0.5, Vector2::new(0.0, 1.0), true);
        map.open(p, Point::new(9.0, 9.0), 0.7, Vector2::new(1.0, 0.0), true);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&p).unwrap().start, Point::new(1.0, 1.0));
        // Both orientations of the pair hit the same slot.
        let flipped = SitePair::new(Point::new(10.0, 0.0), Point::new(0.0, 0.0));
        assert!(map.get(&flipped).is_some());
    }

    #[test]
    fn close_unknown_pair_is_none() {
        let mut map = HalfEdgeMap::new();
        assert!(map.close(&pair(), Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn clip_ray_inside_start_runs_to_boundary() {
        let rect = Rect::sized(100.0, 100.0);
        let e = clip_ray(&ray(Point::new(50.0, 50.0), Vector2::new(0.0, 1.0)), &rect).unwrap();
        assert_eq!(e.start, Point::new(50.0, 50.0));
        assert!((e.end.y - 101.0).abs() < 1e-12);
    }

    #[test]
    fn clip_ray_outside_start_clamps_to_entry() {
        let rect = Rect::sized(100.0, 100.0);
        let e = clip_ray(
            &ray(Point::new(50.0, -5.0e12), Vector2::new(0.0, 1.0)),
            &rect,
        )
        .unwrap();
        assert!((e.start.y + 1.0).abs() < 1e-12);
        assert!((e.end.y - 101.0).abs() < 1e-12);
        assert!((e.start.x - 50.0).abs() < 1e-12);
    }

    #[test]
    fn clip_ray_never_entering_is_dropped() {
        let rect = Rect::sized(100.0, 100.0);
        // Pointing away from the area.
        assert!(clip_ray(&ray(Point::new(50.0, 200.0), Vector2::new(0.0, 1.0)), &rect).is_none());
        // Parallel to the area but outside its slab.
        assert!(clip_ray(&ray(Point::new(-50.0, 50.0), Vector2::new(0.0, 1.0)), &rect).is_none());
    }

    #[test]
    fn clip_line_spans_both_directions() {
        let rect = Rect::sized(100.0, 100.0);
        let e = clip_line(&ray(Point::new(50.0, 50.0), Vector2::new(0.0, 1.0)), &rect).unwrap();
        assert!((e.start.y + 1.0).abs() < 1e-12);
        assert!((e.end.y - 101.0).abs() < 1e-12);
        // Outside the slab on a zero-direction axis: no overlap at all.
        assert!(clip_line(&ray(Point::new(-50.0, 50.0), Vector2::new(0.0, 1.0)), &rect).is_none());
    }

    #[test]
    fn unanchored_rays_clip_as_full_lines() {
        let rect = Rect::sized(100.0, 100.0);
        let mut map = HalfEdgeMap::new();
        map.open(
            pair(),
            Point::new(50.0, 50.0),
            0.0,
            Vector2::new(0.0, 1.0),
            false,
        );
        let out = map.clip_all(&rect);
        assert_eq!(out.len(), 1);
        assert!((out[0].start.y + 1.0).abs() < 1e-12);
        assert!((out[0].end.y - 101.0).abs() < 1e-12);
    }

    #[test]
    fn clip_segment_clamps_both_ends() {
        let rect = Rect::sized(100.0, 100.0);
        let e = clip_segment(
            Edge {
                start: Point::new(50.0, -500.0),
                end: Point::new(50.0, 500.0),
            },
            &rect,
        )
        .unwrap();
        assert!((e.start.y + 1.0).abs() < 1e-12);
        assert!((e.end.y - 101.0).abs() < 1e-12);
        // Fully inside stays untouched.
        let inner = Edge {
            start: Point::new(10.0, 10.0),
            end: Point::new(20.0, 20.0),
        };
        assert_eq!(clip_segment(inner, &rect), Some(inner));
        // Fully outside is dropped.
        assert!(clip_segment(
            Edge {
                start: Point::new(-50.0, -50.0),
                end: Point::new(-40.0, -50.0),
            },
            &rect
        )
        .is_none());
    }
}
