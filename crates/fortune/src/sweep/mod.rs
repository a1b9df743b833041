//! Fortune's sweepline: events, beachline, half-edge assembly, driver.
//!
//! Purpose
//! - Run a horizontal sweepline down the plane (increasing y). Site events
//!   split beachline arcs; circle events remove arcs and emit Voronoi
//!   vertices. Breakpoints between adjacent arcs trace the edges.
//! - Arcs carry stable `ArcId` handles so circle events name the exact arc
//!   instances they were scheduled against; stale events are dropped when
//!   their triple is no longer consecutive.
//!
//! Entry point is `VoronoiSweep`: construct with validated sites, then
//! either `run_to_completion` or step event by event and inspect the
//! intermediate state.

mod beachline;
mod driver;
mod edges;
mod queue;
mod types;

pub use beachline::{Beachline, Breakpoint};
pub use driver::{SweepPhase, VoronoiSweep};
pub use edges::{clip_line, clip_ray, clip_segment, HalfEdgeMap};
pub use queue::EventQueue;
pub use types::{Arc, ArcId, Edge, Event, HalfEdge, SitePair, SweepError};
