//! Beachline: the left-to-right sequence of live parabolic arcs.
//!
//! Arcs are stored in a `Vec` in beachline order. Breakpoints are
//! recomputed from scratch for the current sweep position, then sorted and
//! deduplicated at exact x-equality: a fresh split produces two coincident
//! breakpoints flanking the new arc, and collapsing them is what makes
//! placement indices line up with arc positions.

use crate::geom::{self, GeomCfg, Point};

use super::types::{Arc, ArcId};

/// A breakpoint between two adjacent arcs, at the current sweep position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    pub x: f64,
    pub y: f64,
}

/// Arc sequence plus the breakpoints computed for the last sweep position.
#[derive(Clone, Debug, Default)]
pub struct Beachline {
    arcs: Vec<Arc>,
    breakpoints: Vec<Breakpoint>,
    next_id: u64,
}

impl Beachline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn arc(&self, index: usize) -> Arc {
        self.arcs[index]
    }

    /// Breakpoints from the last `recompute_breakpoints`, sorted by x with
    /// exact-x duplicates collapsed.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    fn mint(&mut self) -> ArcId {
        let id = ArcId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Install the very first arc, with a sentinel breakpoint at the right
    /// edge of the working area so placement queries have an upper bound.
    pub fn push_initial(&mut self, site: Point, right_edge_x: f64) {
        let id = self.mint();
        self.arcs.push(Arc { id, site });
        self.breakpoints.push(Breakpoint {
            x: right_edge_x,
            y: 0.0,
        });
    }

    /// Split the arc at `index` with a new site: the arc is cut in two and
    /// the new site's arc is spliced between the halves. Both halves keep
    /// the split arc's site; the left half keeps its handle, the right half
    /// gets a fresh one. Returns the new arc's index (`index + 1`).
    pub fn split(&mut self, index: usize, site: Point) -> usize {
        let split = self.arcs[index];
        let new_arc = Arc {
            id: self.mint(),
            site,
        };
        let right_half = Arc {
            id: self.mint(),
            site: split.site,
        };
        self.arcs.insert(index + 1, right_half);
        self.arcs.insert(index + 1, new_arc);
        index + 1
    }

    /// Remove the arc at `index` (the middle of a vanished triple).
    pub fn remove(&mut self, index: usize) -> Arc {
        self.arcs.remove(index)
    }

    /// Index of the arc vertically under `site`: the number of breakpoints
    /// strictly left of (or at) `site.x`.
    pub fn placement_index(&self, site: Point) -> usize {
        self.breakpoints
            .iter()
            .position(|bp| bp.x > site.x)
            .unwrap_or(self.breakpoints.len())
    }

    /// Recompute all breakpoints for `sweep_y`, one per adjacent arc pair,
    /// then sort by x and collapse exact-x duplicates.
    pub fn recompute_breakpoints(&mut self, sweep_y: f64, cfg: &GeomCfg) {
        self.breakpoints.clear();
        for pair in self.arcs.windows(2) {
            let x = geom::breakpoint_x(pair[0].site, pair[1].site, sweep_y, cfg);
            let y = geom::parabola_y(x, pair[0].site, sweep_y);
            self.breakpoints.push(Breakpoint { x, y });
        }
        self.breakpoints.sort_by(|a, b| a.x.total_cmp(&b.x));
        self.breakpoints.dedup_by(|a, b| a.x == b.x);
    }

    /// Position of the middle arc if these three handles are consecutive in
    /// beachline order; `None` means the event that named them is stale.
    pub fn find_triple(&self, ids: &[ArcId; 3]) -> Option<usize> {
        self.arcs
            .windows(3)
            .position(|w| w[0].id == ids[0] && w[1].id == ids[1] && w[2].id == ids[2])
            .map(|i| i + 1)
    }
}
