//! Sweep-side types: arcs, events, site pairs, half-edges, errors.

use nalgebra::Vector2;
use thiserror::Error;

use crate::geom::Point;

/// Stable handle for one beachline arc instance.
///
/// Several arcs can share a site (an arc split leaves the same site on both
/// flanks), so identity is by handle, never by site value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcId(pub u64);

/// One parabolic arc on the beachline.
#[derive(Clone, Copy, Debug)]
pub struct Arc {
    pub id: ArcId,
    pub site: Point,
}

/// Unordered pair of sites, canonicalized so both orientations of an
/// adjacency key the same map slot. Hashing is by coordinate bit pattern.
#[derive(Clone, Copy, Debug)]
pub struct SitePair {
    pub a: Point,
    pub b: Point,
}

impl SitePair {
    pub fn new(p: Point, q: Point) -> Self {
        let flip = match p.x.total_cmp(&q.x) {
            std::cmp::Ordering::Equal => p.y.total_cmp(&q.y) == std::cmp::Ordering::Greater,
            ord => ord == std::cmp::Ordering::Greater,
        };
        if flip {
            Self { a: q, b: p }
        } else {
            Self { a: p, b: q }
        }
    }
}

impl PartialEq for SitePair {
    fn eq(&self, other: &Self) -> bool {
        self.a.to_bits() == other.a.to_bits() && self.b.to_bits() == other.b.to_bits()
    }
}

impl Eq for SitePair {}

impl std::hash::Hash for SitePair {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.a.to_bits().hash(state);
        self.b.to_bits().hash(state);
    }
}

/// An open edge: a ray traced by a breakpoint, waiting for its closing
/// vertex (or for final clipping).
#[derive(Clone, Copy, Debug)]
pub struct HalfEdge {
    /// Where the ray was opened.
    pub start: Point,
    /// Sweep position at which it was opened.
    pub sweep_start: f64,
    /// Unit direction along the pair's bisector.
    pub direction: Vector2<f64>,
    /// The two sites whose cells this edge separates.
    pub pair: SitePair,
    /// True when `start` is a diagram vertex. A breakpoint-born ray
    /// (`anchored == false`) is half of a full bisector line: the edge
    /// continues through `start` in the opposite direction too.
    pub anchored: bool,
}

/// A finished Voronoi edge segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }
}

/// A scheduled sweep event.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// A site whose arc enters the beachline.
    Site { site: Point },
    /// An arc triple whose middle arc vanishes when the sweep reaches the
    /// bottom of their circumcircle.
    Circle {
        center: Point,
        radius: f64,
        triple: [Arc; 3],
    },
}

impl Event {
    /// Primary/secondary ordering key: (y, x) of the event's anchor.
    #[inline]
    pub fn key(&self) -> (f64, f64) {
        match self {
            Event::Site { site } => (site.y, site.x),
            Event::Circle { center, radius, .. } => (center.y + radius, center.x),
        }
    }

    /// Tie-break rank: site events come before circle events at equal keys.
    #[inline]
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Event::Site { .. } => 0,
            Event::Circle { .. } => 1,
        }
    }

    /// Arc handles for circle events; a fixed sentinel for site events.
    #[inline]
    pub(crate) fn triple_ids(&self) -> [ArcId; 3] {
        match self {
            Event::Site { .. } => [ArcId(u64::MAX); 3],
            Event::Circle { triple, .. } => [triple[0].id, triple[1].id, triple[2].id],
        }
    }
}

/// Errors surfaced by the sweep. All are recoverable: the driver logs and
/// skips the offending event and the sweep continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SweepError {
    /// `run_next_event` was called with nothing left to process.
    #[error("event queue is empty")]
    EmptyQueue,
    /// A beachline lookup produced an index outside the arc list.
    #[error("beachline index {index} out of range for {len} arcs")]
    IndexOutOfRange { index: usize, len: usize },
    /// Two input sites coincide exactly.
    #[error("duplicate site at ({x}, {y})")]
    DuplicateSite { x: f64, y: f64 },
}
