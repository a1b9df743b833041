//! Sweep driver: pops events, mutates the beachline, assembles edges.
//!
//! Event flow
//! - Site event: locate the arc under the site via the deduplicated
//!   breakpoint list, split it, open the ray for the new site/split-site
//!   pair, and (re)schedule circle events around the insertion.
//! - Circle event: if the named arc triple is still consecutive, remove the
//!   middle arc, close the two dying adjacencies at the circumcenter, open
//!   a ray for the newly adjacent outer pair, and reschedule neighbors.
//! - Drained queue: surviving rays are genuine infinite edges; clip them,
//!   the finished segments, and the far halves of edges that only ever met
//!   one vertex to the working rectangle.
//!
//! All numeric tolerances come from `GeomCfg`; the sweep position always
//! sits `sweep_advance` past the last event key so every live arc keeps
//! `site.y < sweep_y` strictly.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::geom::{self, GeomCfg, GeomError, Point, Rect};

use super::beachline::Beachline;
use super::edges::{clip_ray, clip_segment, HalfEdgeMap, CLIP_MARGIN};
use super::queue::EventQueue;
use super::types::{Arc, Edge, Event, HalfEdge, SitePair, SweepError};

/// Where the sweep currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepPhase {
    /// No event processed yet.
    Initial,
    /// Events pending.
    Running,
    /// Queue drained, final clipping not yet applied.
    Draining,
    /// `complete` ran; `edges` is the final clipped set.
    Done,
}

/// Fortune sweep over a fixed site set.
#[derive(Clone, Debug)]
pub struct VoronoiSweep {
    queue: EventQueue,
    beachline: Beachline,
    half_edges: HalfEdgeMap,
    edges: Vec<Edge>,
    /// Pairs whose edge was recorded with only one true vertex so far;
    /// value is the index into `edges`.
    single_ended: HashMap<SitePair, usize>,
    rect: Rect,
    cfg: GeomCfg,
    /// Raw key of the last processed event (no advance applied).
    event_key_y: f64,
    sweep_y: f64,
    started: bool,
    completed: bool,
}

impl VoronoiSweep {
    /// Build a sweep over `sites`. Rejects exactly coincident sites; sites
    /// outside the working area are kept here and discarded at dequeue.
    pub fn new(sites: &[Point], rect: Rect, cfg: GeomCfg) -> Result<Self, SweepError> {
        let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(sites.len());
        let mut queue = EventQueue::new();
        for site in sites {
            if !seen.insert(site.to_bits()) {
                return Err(SweepError::DuplicateSite {
                    x: site.x,
                    y: site.y,
                });
            }
            queue.insert(Event::Site { site: *site });
        }
        Ok(Self {
            queue,
            beachline: Beachline::new(),
            half_edges: HalfEdgeMap::new(),
            edges: Vec::new(),
            single_ended: HashMap::new(),
            rect,
            cfg,
            event_key_y: f64::NEG_INFINITY,
            sweep_y: f64::NEG_INFINITY,
            started: false,
            completed: false,
        })
    }

    /// Sweep over `count` seeded uniform sites in `rect`.
    pub fn with_random_sites(
        count: usize,
        rect: Rect,
        seed: u64,
        cfg: GeomCfg,
    ) -> Result<Self, SweepError> {
        Self::new(&geom::uniform_sites(count, rect, seed), rect, cfg)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn cfg(&self) -> GeomCfg {
        self.cfg
    }

    /// Current sweep position (last event key plus the configured advance).
    pub fn sweep_y(&self) -> f64 {
        self.sweep_y
    }

    pub fn phase(&self) -> SweepPhase {
        if self.completed {
            SweepPhase::Done
        } else if !self.started {
            SweepPhase::Initial
        } else if self.queue.is_empty() {
            SweepPhase::Draining
        } else {
            SweepPhase::Running
        }
    }

    pub fn beachline(&self) -> &Beachline {
        &self.beachline
    }

    pub fn pending_events(&self) -> &EventQueue {
        &self.queue
    }

    pub fn open_half_edges(&self) -> &HalfEdgeMap {
        &self.half_edges
    }

    /// Edges recorded so far. Interior segments only until `complete`; the
    /// final clipped set afterwards.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Process every remaining event, then clip. Recoverable per-event
    /// errors are logged and skipped.
    pub fn run_to_completion(&mut self) {
        while !self.queue.is_empty() {
            if let Err(err) = self.run_next_event() {
                warn!(%err, "skipping event after recoverable sweep error");
            }
        }
        self.complete();
    }

    /// Handle the next event. `EmptyQueue` if nothing is pending; the
    /// diagram state is untouched in that case.
    pub fn run_next_event(&mut self) -> Result<(), SweepError> {
        if self.queue.is_empty() {
            return Err(SweepError::EmptyQueue);
        }
        let Some(event) = self.dequeue() else {
            // Everything left was out of the working area.
            return Ok(());
        };
        self.started = true;
        self.event_key_y = event.key().0;
        self.sweep_y = self.event_key_y + self.cfg.sweep_advance;
        if !self.beachline.is_empty() {
            self.beachline.recompute_breakpoints(self.sweep_y, &self.cfg);
        }
        match event {
            Event::Site { site } => self.handle_site(site),
            Event::Circle {
                center, triple, ..
            } => {
                self.handle_circle(center, triple);
                Ok(())
            }
        }
    }

    /// Final clipping pass: clamp finished segments to the working area and
    /// convert surviving rays into boundary-to-boundary edges. Idempotent.
    pub fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        let rect = self.rect;
        let mut clipped: Vec<Edge> = self
            .edges
            .iter()
            .filter_map(|e| clip_segment(*e, &rect))
            .collect();
        // A single-ended record only covers its breakpoint birth up to the
        // one vertex that arrived; the edge keeps going through the birth
        // point on the far side. Births already outside the working area
        // produce rays that never enter and drop out here.
        for (pair, &index) in &self.single_ended {
            let edge = self.edges[index];
            let far = HalfEdge {
                start: edge.start,
                sweep_start: self.sweep_y,
                direction: geom::unit_or_zero(edge.start - edge.end),
                pair: *pair,
                anchored: true,
            };
            if let Some(e) = clip_ray(&far, &rect) {
                clipped.push(e);
            }
        }
        clipped.extend(self.half_edges.clip_all(&rect));
        self.edges = clipped;
        self.single_ended.clear();
        debug!(edges = self.edges.len(), "sweep complete");
    }

    /// Next in-area event, discarding sites outside the working area.
    fn dequeue(&mut self) -> Option<Event> {
        while let Some(event) = self.queue.pop() {
            if let Event::Site { site } = event {
                if !self.site_in_working_area(site) {
                    debug!(x = site.x, y = site.y, "site outside working area discarded");
                    continue;
                }
            }
            return Some(event);
        }
        None
    }

    fn site_in_working_area(&self, site: Point) -> bool {
        site.y <= self.rect.max_y + CLIP_MARGIN
            && site.x <= self.rect.max_x + CLIP_MARGIN
            && site.x >= self.rect.min_x - CLIP_MARGIN
    }

    fn handle_site(&mut self, site: Point) -> Result<(), SweepError> {
        if self.beachline.is_empty() {
            self.beachline.push_initial(site, self.rect.max_x);
            debug!(x = site.x, y = site.y, "first arc installed");
            return Ok(());
        }
        let index = self.beachline.placement_index(site);
        if index >= self.beachline.len() {
            warn!(
                index,
                len = self.beachline.len(),
                "placement index out of range; site skipped"
            );
            return Err(SweepError::IndexOutOfRange {
                index,
                len: self.beachline.len(),
            });
        }
        let split_site = self.beachline.arc(index).site;
        let new_idx = self.beachline.split(index, site);

        // The split creates one coincident breakpoint pair that will drift
        // apart, tracing the bisector of (site, split_site) in both
        // directions; the downward half is the open ray, the upward half is
        // recovered when the pair's edge gains its second vertex.
        if site.to_bits() != split_site.to_bits() {
            let bx = geom::breakpoint_x(site, split_site, self.sweep_y, &self.cfg);
            let by = geom::parabola_y(bx, split_site, self.sweep_y);
            self.half_edges.open(
                SitePair::new(site, split_site),
                Point::new(bx, by),
                self.sweep_y,
                split_ray_direction(site, split_site),
                false,
            );
        }

        self.beachline.recompute_breakpoints(self.sweep_y, &self.cfg);
        self.reschedule_after_split(new_idx);
        Ok(())
    }

    fn handle_circle(&mut self, center: Point, triple: [Arc; 3]) {
        let ids = [triple[0].id, triple[1].id, triple[2].id];
        let Some(mid) = self.beachline.find_triple(&ids) else {
            debug!("stale circle event dropped");
            return;
        };
        let removed = self.beachline.remove(mid);
        debug!(
            x = center.x,
            y = center.y,
            arc = removed.id.0,
            "arc vanished at vertex"
        );

        let [left, _, right] = triple;
        self.account_vanished_pair(SitePair::new(left.site, removed.site), right.site, center);
        self.account_vanished_pair(SitePair::new(removed.site, right.site), left.site, center);

        // The outer arcs are adjacent now; their breakpoint leaves the
        // vertex along the pair's bisector, away from the vanished site.
        self.half_edges.open(
            SitePair::new(left.site, right.site),
            center,
            self.sweep_y,
            outward_direction(SitePair::new(left.site, right.site), removed.site, center),
            true,
        );

        self.beachline.recompute_breakpoints(self.sweep_y, &self.cfg);
        self.reschedule_after_removal(mid, removed);
    }

    /// Settle the edge of an adjacency that just died at `vertex`.
    ///
    /// - an open ray born at this very vertex is degenerate, so it is
    ///   re-opened pointing outward instead;
    /// - an open ray anchored at an earlier vertex closes into a complete
    ///   vertex-to-vertex edge;
    /// - a breakpoint-born ray closes into a single-ended segment whose
    ///   far half may still gain a second vertex, or is emitted at
    ///   completion;
    /// - no ray but a single-ended recorded segment: the second vertex
    ///   arrived, and the segment is rewritten to span vertex to vertex.
    ///   When the twin breakpoint dies at the vertex already recorded,
    ///   the record stays as it is;
    /// - nothing at all: the adjacency died on its far side earlier, so
    ///   the remaining piece is an outward ray from this vertex.
    fn account_vanished_pair(&mut self, pair: SitePair, third: Point, vertex: Point) {
        let (born_here, anchored) = self
            .half_edges
            .get(&pair)
            .map_or((false, false), |he| {
                (he.sweep_start == self.sweep_y, he.anchored)
            });
        match self.half_edges.close(&pair, vertex) {
            Some(edge) if born_here && edge.length() < self.cfg.vertex_merge => {
                self.half_edges.open(
                    pair,
                    vertex,
                    self.sweep_y,
                    outward_direction(pair, third, vertex),
                    true,
                );
            }
            Some(edge) if anchored => {
                self.edges.push(edge);
            }
            Some(edge) => {
                self.single_ended.insert(pair, self.edges.len());
                self.edges.push(edge);
            }
            None => {
                if let Some(&index) = self.single_ended.get(&pair) {
                    let first_vertex = self.edges[index].end;
                    if (vertex - first_vertex).norm() < self.cfg.vertex_merge {
                        return;
                    }
                    self.single_ended.remove(&pair);
                    self.edges[index] = Edge {
                        start: first_vertex,
                        end: vertex,
                    };
                } else {
                    self.half_edges.open(
                        pair,
                        vertex,
                        self.sweep_y,
                        outward_direction(pair, third, vertex),
                        true,
                    );
                }
            }
        }
    }

    /// Drop the circle event the split arc was part of, then examine the
    /// two fresh triples around the inserted arc.
    fn reschedule_after_split(&mut self, new_idx: usize) {
        let len = self.beachline.len();
        let has_left = new_idx >= 2;
        let has_right = new_idx + 2 < len;
        if has_left && has_right {
            let stale = [
                self.beachline.arc(new_idx - 2).id,
                self.beachline.arc(new_idx - 1).id,
                self.beachline.arc(new_idx + 2).id,
            ];
            if self.queue.remove_circle(&stale) {
                debug!("circle event invalidated by arc split");
            }
        }
        // The split arc may also be the left arc of a pending triple. Its
        // flank toward that triple now belongs to the fresh right half, so
        // the pending handles are dead; reissue the triple with the new id.
        if new_idx + 3 < len {
            let rerouted = [
                self.beachline.arc(new_idx - 1).id,
                self.beachline.arc(new_idx + 2).id,
                self.beachline.arc(new_idx + 3).id,
            ];
            if self.queue.remove_circle(&rerouted) {
                debug!("circle event reissued for the split arc's right half");
            }
            self.schedule_circle(
                [
                    self.beachline.arc(new_idx + 1),
                    self.beachline.arc(new_idx + 2),
                    self.beachline.arc(new_idx + 3),
                ],
                true,
            );
        }
        if has_left {
            self.schedule_circle(
                [
                    self.beachline.arc(new_idx - 2),
                    self.beachline.arc(new_idx - 1),
                    self.beachline.arc(new_idx),
                ],
                true,
            );
        }
        if has_right {
            self.schedule_circle(
                [
                    self.beachline.arc(new_idx),
                    self.beachline.arc(new_idx + 1),
                    self.beachline.arc(new_idx + 2),
                ],
                true,
            );
        }
    }

    /// Drop circle events that named the removed arc, then examine the two
    /// triples made consecutive by the removal. `mid` is the index the arc
    /// was removed at.
    fn reschedule_after_removal(&mut self, mid: usize, removed: Arc) {
        let len = self.beachline.len();
        if mid >= 2 {
            self.queue.remove_circle(&[
                self.beachline.arc(mid - 2).id,
                self.beachline.arc(mid - 1).id,
                removed.id,
            ]);
            if mid < len {
                self.schedule_circle(
                    [
                        self.beachline.arc(mid - 2),
                        self.beachline.arc(mid - 1),
                        self.beachline.arc(mid),
                    ],
                    false,
                );
            }
        }
        if mid + 1 < len {
            self.queue.remove_circle(&[
                removed.id,
                self.beachline.arc(mid).id,
                self.beachline.arc(mid + 1).id,
            ]);
            if mid >= 1 {
                self.schedule_circle(
                    [
                        self.beachline.arc(mid - 1),
                        self.beachline.arc(mid),
                        self.beachline.arc(mid + 1),
                    ],
                    false,
                );
            }
        }
    }

    /// Schedule a circle event for a consecutive arc triple, unless it is
    /// degenerate, behind the sweep, or already pending.
    ///
    /// `allow_current` admits a vanish coordinate equal to the current
    /// event key: a site event can create a vertex exactly on the sweep
    /// (the site sits on the bottom of the circumcircle). Circle
    /// processing passes `false`, since a same-coordinate triple there is
    /// an echo of the vertex being processed.
    fn schedule_circle(&mut self, mut triple: [Arc; 3], allow_current: bool) {
        let (p1, p2, p3) = (triple[0].site, triple[1].site, triple[2].site);
        if p1.to_bits() == p2.to_bits()
            || p2.to_bits() == p3.to_bits()
            || p1.to_bits() == p3.to_bits()
        {
            return;
        }
        let circle = match geom::circumcircle(p1, p2, p3) {
            Ok(c) => c,
            Err(GeomError::DegenerateGeometry) => {
                debug!("collinear triple has no circle event");
                return;
            }
        };
        let vanish = circle.vanish_y();
        let ahead = if allow_current {
            vanish >= self.event_key_y
        } else {
            vanish > self.event_key_y
        };
        if !ahead {
            return;
        }

        // Order the triple as the beachline will read at the vanish
        // position: by parabola slope at the circumcenter. For a triple
        // that genuinely vanishes this is a no-op; for junk it produces an
        // order that never matches and the event dies as stale. NaN slopes
        // (a site on the circle bottom) compare false and keep their slot.
        let slope =
            |p: Point| geom::parabola_derivative(circle.center.x, p, vanish);
        if slope(triple[0].site) > slope(triple[1].site) {
            triple.swap(0, 1);
        }
        if slope(triple[0].site) > slope(triple[2].site) {
            triple.swap(0, 2);
        }
        if slope(triple[1].site) > slope(triple[2].site) {
            triple.swap(1, 2);
        }

        let ids = [triple[0].id, triple[1].id, triple[2].id];
        if self.queue.contains_triple(&ids) {
            return;
        }
        debug!(
            x = circle.center.x,
            y = circle.center.y,
            vanish,
            "circle event scheduled"
        );
        self.queue.insert(Event::Circle {
            center: circle.center,
            radius: circle.radius,
            triple,
        });
    }
}

/// Direction of the ray opened by an arc split: along the bisector of the
/// two sites, oriented downward on screen (ties broken rightward).
fn split_ray_direction(new_site: Point, split_site: Point) -> Vector2<f64> {
    let d = geom::perp(split_site - new_site);
    let d = if d.y < 0.0 || (d.y == 0.0 && d.x < 0.0) {
        -d
    } else {
        d
    };
    geom::unit_or_zero(d)
}

/// Direction of a ray leaving `vertex` along the bisector of `pair`,
/// pointing away from `third` (the site on the far side of the vertex).
fn outward_direction(pair: SitePair, third: Point, vertex: Point) -> Vector2<f64> {
    let d = geom::perp(pair.b - pair.a);
    let d = if d.dot(&(vertex - third)) < 0.0 { -d } else { d };
    geom::unit_or_zero(d)
}
